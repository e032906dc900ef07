//! Lexicographic scoring of teams and partitions.
//!
//! Each priority's satisfaction ratio is quantized into one of
//! [`BUCKETS`] tiers, and the tiers are combined as digits of a base-25
//! number with the first priority as the most significant digit:
//!
//! ```text
//! score = Σ bucket_i * 25^(N - 1 - i)
//! ```
//!
//! Since `24 * Σ_{j>i} 25^(N-1-j) < 25^(N-1-i)`, one extra tier on a
//! higher priority outweighs any combination of lower tiers.
//!
//! A partition's ratio for one priority is the arithmetic mean of its
//! teams' satisfactions. A single team is scored with the same encoding
//! applied to its own satisfactions.
//!
//! # Examples
//!
//! ```
//! use u_teamform::scoring::{bucket, get_multipliers};
//!
//! assert_eq!(get_multipliers(3), vec![625, 25, 1]);
//! assert_eq!(bucket(0.0), 0);
//! assert_eq!(bucket(0.5), 12);
//! assert_eq!(bucket(1.0), 24);
//! ```

use crate::candidate::{PriorityTeam, PriorityTeamSet};
use crate::error::{ConfigError, Result};
use crate::model::{StudentId, StudentIndex, TeamShell};
use crate::priority::Priority;

/// Lexicographic score; higher is better.
pub type Score = u128;

/// Number of satisfaction tiers per priority.
pub const BUCKETS: u32 = 25;

/// Largest priority count whose scores fit in a [`Score`].
pub const MAX_PRIORITIES: usize = 27;

/// Quantizes a ratio in `[0, 1]` into `0..BUCKETS`.
pub fn bucket(ratio: f64) -> u32 {
    if ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    if ratio >= 1.0 {
        return BUCKETS - 1;
    }
    ((ratio * BUCKETS as f64).floor() as u32).min(BUCKETS - 1)
}

/// Positional weights in priority order, most significant first.
pub fn get_multipliers(priority_count: usize) -> Vec<Score> {
    let base = BUCKETS as Score;
    (0..priority_count)
        .map(|i| base.pow((priority_count - 1 - i) as u32))
        .collect()
}

/// Combines per-priority ratios into one score.
pub fn combine(ratios: &[f64], multipliers: &[Score]) -> Score {
    ratios
        .iter()
        .zip(multipliers)
        .map(|(&r, &m)| bucket(r) as Score * m)
        .sum()
}

/// Scores teams and partitions against an ordered priority list.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    priorities: &'a [Priority],
    students: &'a StudentIndex,
    multipliers: Vec<Score>,
}

impl<'a> Scorer<'a> {
    /// Validates every priority and precomputes the multipliers.
    pub fn new(
        priorities: &'a [Priority],
        students: &'a StudentIndex,
    ) -> std::result::Result<Self, ConfigError> {
        if priorities.len() > MAX_PRIORITIES {
            return Err(ConfigError::TooManyPriorities {
                count: priorities.len(),
                max: MAX_PRIORITIES,
            });
        }
        for priority in priorities {
            priority.validate()?;
        }
        Ok(Self {
            priorities,
            students,
            multipliers: get_multipliers(priorities.len()),
        })
    }

    pub fn priorities(&self) -> &'a [Priority] {
        self.priorities
    }

    pub fn students(&self) -> &'a StudentIndex {
        self.students
    }

    pub fn multipliers(&self) -> &[Score] {
        &self.multipliers
    }

    /// Satisfaction of `priority` for a member list under `shell`.
    pub fn member_satisfaction(
        &self,
        priority: &Priority,
        ids: &[StudentId],
        shell: &TeamShell,
    ) -> Result<f64> {
        let students = self.students.resolve(ids)?;
        Ok(priority.satisfaction(&students, shell))
    }

    /// Satisfaction of every priority for a member list under `shell`.
    pub fn member_satisfactions(&self, ids: &[StudentId], shell: &TeamShell) -> Result<Vec<f64>> {
        let students = self.students.resolve(ids)?;
        Ok(self
            .priorities
            .iter()
            .map(|p| p.satisfaction(&students, shell))
            .collect())
    }

    /// Lexicographic score of a hypothetical member list under `shell`.
    pub fn members_score(&self, ids: &[StudentId], shell: &TeamShell) -> Result<Score> {
        let ratios = self.member_satisfactions(ids, shell)?;
        Ok(combine(&ratios, &self.multipliers))
    }

    /// Lexicographic score of one team on its own.
    pub fn team_score(&self, team: &PriorityTeam) -> Result<Score> {
        self.members_score(&team.student_ids, team.shell())
    }

    /// Per-priority mean satisfaction over all teams, clamped to `[0, 1]`.
    pub fn satisfaction_array(&self, team_set: &PriorityTeamSet) -> Result<Vec<f64>> {
        let mut totals = vec![0.0; self.priorities.len()];
        if team_set.is_empty() {
            return Ok(totals);
        }
        for team in team_set.teams() {
            let ratios = self.member_satisfactions(&team.student_ids, team.shell())?;
            for (total, r) in totals.iter_mut().zip(ratios) {
                *total += r;
            }
        }
        let n = team_set.len() as f64;
        Ok(totals.into_iter().map(|t| (t / n).clamp(0.0, 1.0)).collect())
    }

    /// Lexicographic score of a whole partition. Does not touch the cache;
    /// see [`PriorityTeamSet::calculate_score`].
    pub fn team_set_score(&self, team_set: &PriorityTeamSet) -> Result<Score> {
        let ratios = self.satisfaction_array(team_set)?;
        Ok(combine(&ratios, &self.multipliers))
    }
}
