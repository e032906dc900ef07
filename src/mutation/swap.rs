//! Purely random moves: single swap and slice redistribution.

use super::MutationOutcome;
use crate::candidate::PriorityTeamSet;
use crate::random::{sample_distinct, shuffle};
use rand::Rng;

/// Unlocked teams that currently have at least one member.
fn populated_unlocked(team_set: &PriorityTeamSet) -> Vec<usize> {
    team_set
        .unlocked_indices()
        .into_iter()
        .filter(|&i| !team_set.team(i).is_empty())
        .collect()
}

/// Swaps one random member between two random unlocked teams.
pub(crate) fn random_swap<R: Rng>(team_set: &mut PriorityTeamSet, rng: &mut R) -> MutationOutcome {
    let candidates = populated_unlocked(team_set);
    let Some(pair) = sample_distinct(&candidates, 2, rng) else {
        return MutationOutcome::Infeasible;
    };
    let (a, b) = (pair[0], pair[1]);
    let ia = rng.random_range(0..team_set.team(a).len());
    let ib = rng.random_range(0..team_set.team(b).len());

    let teams = team_set.teams_mut();
    let moved_a = teams[a].student_ids[ia];
    teams[a].student_ids[ia] = teams[b].student_ids[ib];
    teams[b].student_ids[ib] = moved_a;
    MutationOutcome::Mutated
}

/// Pops one random member from every unlocked team, shuffles the popped
/// pool and deals one back to each team. Team sizes are preserved.
pub(crate) fn random_slice<R: Rng>(team_set: &mut PriorityTeamSet, rng: &mut R) -> MutationOutcome {
    let candidates = populated_unlocked(team_set);
    if candidates.len() < 2 {
        return MutationOutcome::Infeasible;
    }

    let mut pool = Vec::with_capacity(candidates.len());
    for &i in &candidates {
        let team = team_set.team_mut(i);
        let idx = rng.random_range(0..team.len());
        pool.push(team.student_ids.remove(idx));
    }
    shuffle(&mut pool, rng);
    for (&i, id) in candidates.iter().zip(pool) {
        team_set.team_mut(i).student_ids.push(id);
    }
    MutationOutcome::Mutated
}
