//! Priority algorithm: beam search over team partitions.
//!
//! # Algorithm
//!
//! 1. Build a seed partition from the team slots ([`StartType`])
//! 2. Score it against the ordered priority list
//! 3. Each round, clone every kept candidate `max_spread` times and apply
//!    the mutation schedule
//! 4. Score the children, merge with the kept set, keep the best `max_keep`
//! 5. Stop on the round limit, the time budget or cancellation
//!
//! # Usage
//!
//! ```
//! use u_teamform::model::{Student, TeamGenerationOptions};
//! use u_teamform::priority::{CustomPriority, Priority};
//! use u_teamform::priority_algorithm::{generate, PriorityConfig};
//!
//! let students: Vec<Student> = (1..=8).map(Student::new).collect();
//! let options = TeamGenerationOptions::new(4, 4, 2);
//! let priorities: Vec<Priority> =
//!     vec![CustomPriority::all_members("even", |s| s.id % 2 == 0).into()];
//! let config = PriorityConfig::fast().with_seed(42);
//!
//! let assignment = generate(students, &options, &priorities, &config).unwrap();
//! assert_eq!(assignment.teams.len(), 2);
//! assert_eq!(assignment.satisfaction, vec![0.5]);
//! ```

mod config;
mod runner;
mod seed;

pub use config::{PriorityConfig, StartType};
pub use runner::{PriorityResult, PriorityRunner, StopReason};

use crate::candidate::PriorityTeamSet;
use crate::error::Result;
use crate::model::{Student, StudentId, StudentIndex, TeamGenerationOptions, TeamShell};
use crate::mutation::MutationContext;
use crate::priority::Priority;
use crate::random::create_rng;
use crate::scoring::{Score, Scorer};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// One output team: the caller's shell and its final members.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignedTeam {
    pub shell: TeamShell,
    pub student_ids: Vec<StudentId>,
}

/// Final assignment returned by [`generate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamAssignment {
    /// Teams in slot order: initial teams first, then generated ones.
    pub teams: Vec<AssignedTeam>,

    /// Lexicographic score of the partition.
    pub score: Score,

    /// Per-priority satisfaction in priority order.
    pub satisfaction: Vec<f64>,

    /// Search rounds completed.
    pub rounds: usize,

    pub stop_reason: StopReason,
}

impl TeamAssignment {
    /// The team holding `student`, if any.
    pub fn team_of(&self, student: StudentId) -> Option<&AssignedTeam> {
        self.teams.iter().find(|t| t.student_ids.contains(&student))
    }
}

/// Forms teams from `students` under the ordered `priorities`.
///
/// Earlier priorities dominate later ones. Fails before searching if the
/// configuration, the options or any priority is invalid, or if an
/// initial team references an unknown student.
pub fn generate(
    students: Vec<Student>,
    options: &TeamGenerationOptions,
    priorities: &[Priority],
    config: &PriorityConfig,
) -> Result<TeamAssignment> {
    generate_with_cancel(students, options, priorities, config, None)
}

/// [`generate`] with an optional cancellation token, checked between rounds.
pub fn generate_with_cancel(
    students: Vec<Student>,
    options: &TeamGenerationOptions,
    priorities: &[Priority],
    config: &PriorityConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<TeamAssignment> {
    config.validate()?;
    let students = StudentIndex::new(students)?;
    options.validate(students.len())?;
    let scorer = Scorer::new(priorities, &students)?;
    let ctx = MutationContext::new(&scorer, options.min_size, options.max_size)
        .with_combination_limit(config.combination_limit);

    let mut rng = match config.seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    };
    let seed = seed::build_seed(options, &students, &ctx, config.start_type, &mut rng)?;
    let result = PriorityRunner::search(seed, &ctx, config, &mut rng, cancel)?;

    let satisfaction = scorer.satisfaction_array(&result.best)?;
    Ok(TeamAssignment {
        teams: into_assigned(result.best),
        score: result.best_score,
        satisfaction,
        rounds: result.rounds,
        stop_reason: result.stop_reason,
    })
}

fn into_assigned(team_set: PriorityTeamSet) -> Vec<AssignedTeam> {
    team_set
        .teams()
        .iter()
        .map(|team| AssignedTeam {
            shell: team.shell().clone(),
            student_ids: team.student_ids.clone(),
        })
        .collect()
}
