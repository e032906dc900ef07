//! Initial partition construction.
//!
//! Every team slot from [`TeamGenerationOptions::team_slots`] becomes one
//! team. Pre-assigned members stay where the caller put them, and the
//! remaining students are spread over the unlocked teams with balanced
//! target sizes.

use super::config::StartType;
use crate::candidate::{PriorityTeam, PriorityTeamSet};
use crate::error::{ConfigError, Result, TeamFormError};
use crate::model::{StudentId, StudentIndex, TeamGenerationOptions};
use crate::mutation::{greedy_assign, MutationContext};
use crate::random::shuffle;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Builds the seed partition for a run.
///
/// Fails if a pre-assigned id is unknown or assigned twice, or if the
/// finished partition does not hold every student exactly once.
pub(crate) fn build_seed<R: Rng>(
    options: &TeamGenerationOptions,
    students: &StudentIndex,
    ctx: &MutationContext<'_>,
    start_type: StartType,
    rng: &mut R,
) -> Result<PriorityTeamSet> {
    let slots = options.team_slots();

    let mut placed: HashSet<StudentId> = HashSet::new();
    for &id in slots.iter().flat_map(|s| &s.student_ids) {
        if !students.contains(id) {
            return Err(TeamFormError::UnknownStudent(id));
        }
        if !placed.insert(id) {
            return Err(ConfigError::DuplicateStudent(id).into());
        }
    }

    let mut free: Vec<StudentId> = students
        .ids()
        .into_iter()
        .filter(|id| !placed.contains(id))
        .collect();
    shuffle(&mut free, rng);

    let mut team_set = PriorityTeamSet::new(
        slots
            .into_iter()
            .map(|slot| PriorityTeam::new(Arc::new(slot.shell), slot.student_ids))
            .collect(),
    );

    let targets = team_set.unlocked_indices();
    let capacities =
        bounded_capacities(&team_set, &targets, free.len(), options.min_size, options.max_size)
            .ok_or(ConfigError::InfeasibleTeamCount {
                students: students.len(),
                teams: options.total_teams,
                min: options.min_size,
                max: options.max_size,
            })?;
    if !free.is_empty() {
        match start_type {
            StartType::Random => deal(&mut team_set, &targets, &capacities, free),
            StartType::WeightHeuristic => {
                greedy_assign(&mut team_set, &targets, &capacities, free, ctx)?
            }
        }
    }

    check_conservation(&team_set, students)?;
    Ok(team_set)
}

/// Final size for each unlocked team, within `min..=max` and never below
/// the members already present, summing to those members plus `free`.
///
/// Sizes start at their lower bound and grow one at a time, smallest
/// first, so they differ by at most one where pre-assigned members allow
/// it. `None` when no such sizes exist.
fn bounded_capacities(
    team_set: &PriorityTeamSet,
    targets: &[usize],
    free: usize,
    min: usize,
    max: usize,
) -> Option<Vec<usize>> {
    let present: usize = targets.iter().map(|&i| team_set.team(i).len()).sum();
    let total = present + free;
    let mut capacities: Vec<usize> = targets
        .iter()
        .map(|&i| team_set.team(i).len().max(min))
        .collect();
    if capacities.iter().any(|&c| c > max) {
        return None;
    }
    let mut assigned: usize = capacities.iter().sum();
    if assigned > total {
        return None;
    }
    while assigned < total {
        let slot = (0..capacities.len())
            .filter(|&slot| capacities[slot] < max)
            .min_by_key(|&slot| capacities[slot])?;
        capacities[slot] += 1;
        assigned += 1;
    }
    Some(capacities)
}

/// Hands out `pool` to the emptiest team that still has room.
fn deal(team_set: &mut PriorityTeamSet, targets: &[usize], capacities: &[usize], pool: Vec<StudentId>) {
    for id in pool {
        let slot = (0..targets.len())
            .filter(|&slot| team_set.team(targets[slot]).len() < capacities[slot])
            .min_by_key(|&slot| team_set.team(targets[slot]).len());
        if let Some(slot) = slot {
            team_set.team_mut(targets[slot]).student_ids.push(id);
        }
    }
}

fn check_conservation(team_set: &PriorityTeamSet, students: &StudentIndex) -> Result<()> {
    let ids = team_set.student_ids();
    if ids != students.ids() {
        return Err(TeamFormError::ConservationViolated {
            expected: students.len(),
            found: ids.len(),
        });
    }
    Ok(())
}
