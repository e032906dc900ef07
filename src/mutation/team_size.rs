//! Team-size rebalancing.

use super::{MutationContext, MutationOutcome};
use crate::candidate::PriorityTeamSet;
use crate::model::StudentId;
use crate::random::sample_distinct;
use rand::Rng;

/// Draws new target sizes for `teams` random unlocked teams and moves
/// members from teams above their target to teams below it.
///
/// Targets are uniform in `min_team_size..=max_team_size`, then nudged one
/// step at a time until they sum to the members currently held by the
/// chosen teams. No team ever leaves the size bounds. With equal bounds
/// there is nothing to rebalance.
pub(crate) fn rebalance<R: Rng>(
    team_set: &mut PriorityTeamSet,
    teams: usize,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> MutationOutcome {
    let (min, max) = (ctx.min_team_size, ctx.max_team_size);
    if min >= max {
        return MutationOutcome::Unchanged;
    }
    let unlocked = team_set.unlocked_indices();
    let k = teams.clamp(2, unlocked.len().max(2));
    let Some(chosen) = sample_distinct(&unlocked, k, rng) else {
        return MutationOutcome::Infeasible;
    };

    let total: usize = chosen.iter().map(|&i| team_set.team(i).len()).sum();
    if total < k * min || total > k * max {
        return MutationOutcome::Infeasible;
    }

    let targets = draw_targets(k, total, min, max, rng);
    let unchanged = chosen
        .iter()
        .zip(&targets)
        .all(|(&i, &t)| team_set.team(i).len() == t);
    if unchanged {
        return MutationOutcome::Unchanged;
    }

    let mut surplus: Vec<StudentId> = Vec::new();
    for (&i, &target) in chosen.iter().zip(&targets) {
        let team = team_set.team_mut(i);
        while team.len() > target {
            let idx = rng.random_range(0..team.len());
            surplus.push(team.student_ids.swap_remove(idx));
        }
    }
    for (&i, &target) in chosen.iter().zip(&targets) {
        let team = team_set.team_mut(i);
        while team.len() < target {
            match surplus.pop() {
                Some(id) => team.student_ids.push(id),
                None => break,
            }
        }
    }
    MutationOutcome::Mutated
}

/// `k` sizes in `min..=max` summing to `total`.
///
/// Requires `k * min <= total <= k * max`.
fn draw_targets<R: Rng>(k: usize, total: usize, min: usize, max: usize, rng: &mut R) -> Vec<usize> {
    let mut targets: Vec<usize> = (0..k).map(|_| rng.random_range(min..=max)).collect();
    let mut sum: usize = targets.iter().sum();
    while sum > total {
        let shrinkable: Vec<usize> = (0..k).filter(|&i| targets[i] > min).collect();
        let i = shrinkable[rng.random_range(0..shrinkable.len())];
        targets[i] -= 1;
        sum -= 1;
    }
    while sum < total {
        let growable: Vec<usize> = (0..k).filter(|&i| targets[i] < max).collect();
        let i = growable[rng.random_range(0..growable.len())];
        targets[i] += 1;
        sum += 1;
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::PriorityTeam;
    use crate::model::{Student, StudentIndex, TeamShell};
    use crate::random::create_rng;
    use crate::scoring::Scorer;
    use std::sync::Arc;

    fn set(groups: &[&[u32]]) -> PriorityTeamSet {
        PriorityTeamSet::new(
            groups
                .iter()
                .enumerate()
                .map(|(i, ids)| PriorityTeam::new(Arc::new(TeamShell::new(i as u32)), ids.to_vec()))
                .collect(),
        )
    }

    #[test]
    fn test_draw_targets_sum_and_bounds() {
        let mut rng = create_rng(8);
        for total in 6..=15 {
            let t = draw_targets(3, total, 2, 5, &mut rng);
            assert_eq!(t.iter().sum::<usize>(), total);
            assert!(t.iter().all(|&x| (2..=5).contains(&x)));
        }
    }

    #[test]
    fn test_rebalance_stays_in_bounds() {
        let students = StudentIndex::new((1..=12).map(Student::new).collect()).unwrap();
        let scorer = Scorer::new(&[], &students).unwrap();
        let ctx = MutationContext::new(&scorer, 3, 5);

        for seed in 0..30 {
            let mut rng = create_rng(seed);
            let mut ts = set(&[&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12]]);
            rebalance(&mut ts, 3, &ctx, &mut rng);
            assert!(ts.teams().iter().all(|t| (3..=5).contains(&t.len())));
            assert_eq!(ts.student_ids(), (1..=12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_rebalance_noop_on_fixed_size() {
        let students = StudentIndex::new((1..=4).map(Student::new).collect()).unwrap();
        let scorer = Scorer::new(&[], &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 2);
        let mut rng = create_rng(0);

        let mut ts = set(&[&[1, 2], &[3, 4]]);
        let before = ts.clone();
        assert_eq!(rebalance(&mut ts, 2, &ctx, &mut rng), MutationOutcome::Unchanged);
        assert_eq!(ts, before);
    }

    #[test]
    fn test_rebalance_infeasible_when_out_of_range() {
        let students = StudentIndex::new((1..=4).map(Student::new).collect()).unwrap();
        let scorer = Scorer::new(&[], &students).unwrap();
        // two teams holding 4 members cannot both reach size 3
        let ctx = MutationContext::new(&scorer, 3, 4);
        let mut rng = create_rng(0);

        let mut ts = set(&[&[1, 2], &[3, 4]]);
        assert_eq!(rebalance(&mut ts, 2, &ctx, &mut rng), MutationOutcome::Infeasible);
    }
}
