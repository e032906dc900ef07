//! Robinhood moves: recombine a team that satisfies a priority with one
//! that does not, keeping the result only if the whole partition improves.
//!
//! Trials always start from the input partition, so at most one pair of
//! teams differs from it afterwards: either nothing changed or exactly
//! two teams did.

use super::local_max::{local_max_pair, rank_by_team_score};
use super::{MutationContext, MutationOutcome};
use crate::candidate::PriorityTeamSet;
use crate::error::Result;
use crate::random::{choose, sample_distinct};
use rand::Rng;

/// Satisfaction at or above which a team counts as satisfying a priority.
pub const SATISFIED_THRESHOLD: f64 = 0.8;

pub(crate) fn robinhood<R: Rng>(
    team_set: &mut PriorityTeamSet,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Result<MutationOutcome> {
    let unlocked = team_set.unlocked_indices();
    if unlocked.len() < 2 {
        return Ok(MutationOutcome::Infeasible);
    }
    let scorer = ctx.scorer;
    let mut best_score = team_set.calculate_score(scorer)?;
    let mut best: Option<PriorityTeamSet> = None;

    for priority in scorer.priorities() {
        let mut satisfied = Vec::new();
        let mut unsatisfied = Vec::new();
        for &i in &unlocked {
            let team = team_set.team(i);
            let s = scorer.member_satisfaction(priority, &team.student_ids, team.shell())?;
            if s >= SATISFIED_THRESHOLD {
                satisfied.push(i);
            } else {
                unsatisfied.push(i);
            }
        }

        let pair = match (choose(&satisfied, rng), choose(&unsatisfied, rng)) {
            (Some(rich), Some(poor)) => Some((rich, poor)),
            _ => sample_distinct(&unlocked, 2, rng).map(|p| (p[0], p[1])),
        };
        let Some((a, b)) = pair else {
            continue;
        };

        let mut trial = team_set.clone();
        if local_max_pair(&mut trial, a, b, ctx, rng)? != MutationOutcome::Mutated {
            continue;
        }
        let score = trial.calculate_score(scorer)?;
        if score > best_score {
            best_score = score;
            best = Some(trial);
        }
    }

    Ok(adopt(team_set, best))
}

/// Like [`robinhood`], but pairs the lowest and highest scoring unlocked
/// teams overall instead of iterating priorities.
pub(crate) fn robinhood_holistic<R: Rng>(
    team_set: &mut PriorityTeamSet,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Result<MutationOutcome> {
    let unlocked = team_set.unlocked_indices();
    if unlocked.len() < 2 {
        return Ok(MutationOutcome::Infeasible);
    }
    let scorer = ctx.scorer;
    let base_score = team_set.calculate_score(scorer)?;

    let ranked = rank_by_team_score(team_set, &unlocked, ctx)?;
    let (poorest, richest) = (ranked[0], ranked[ranked.len() - 1]);

    let mut trial = team_set.clone();
    if local_max_pair(&mut trial, poorest, richest, ctx, rng)? != MutationOutcome::Mutated {
        return Ok(MutationOutcome::Unchanged);
    }
    let best = if trial.calculate_score(scorer)? > base_score {
        Some(trial)
    } else {
        None
    };
    Ok(adopt(team_set, best))
}

fn adopt(team_set: &mut PriorityTeamSet, best: Option<PriorityTeamSet>) -> MutationOutcome {
    match best {
        Some(better) => {
            *team_set = better;
            MutationOutcome::Mutated
        }
        None => MutationOutcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::PriorityTeam;
    use crate::model::{Student, StudentIndex, TeamShell};
    use crate::priority::{CustomPriority, Priority};
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

    fn changed_teams(a: &PriorityTeamSet, b: &PriorityTeamSet) -> usize {
        a.teams()
            .iter()
            .zip(b.teams())
            .filter(|(x, y)| x.student_ids != y.student_ids)
            .count()
    }

    fn multiple_of_three() -> Vec<Priority> {
        vec![CustomPriority::all_members("triple", |s| s.id % 3 == 0).into()]
    }

    #[test]
    fn test_robinhood_changes_zero_or_two_teams() {
        let students = StudentIndex::new((1..=9).map(Student::new).collect()).unwrap();
        let priorities = multiple_of_three();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 3, 3);

        for seed in 0..20 {
            let mut rng = create_rng(seed);
            let original = set(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
            let mut ts = original.clone();
            let outcome = robinhood(&mut ts, &ctx, &mut rng).unwrap();
            let changed = changed_teams(&original, &ts);
            assert!(changed == 0 || changed == 2, "seed {seed}: {changed} teams changed");
            assert_eq!(outcome == MutationOutcome::Mutated, changed == 2);
            assert_eq!(ts.student_ids(), (1..=9).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_robinhood_holistic_changes_zero_or_two_teams() {
        let students = StudentIndex::new((1..=9).map(Student::new).collect()).unwrap();
        let priorities = multiple_of_three();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 3, 3);

        for seed in 0..10 {
            let mut rng = create_rng(seed);
            let original = set(&[&[1, 2, 4], &[3, 5, 7], &[6, 8, 9]]);
            let mut ts = original.clone();
            robinhood_holistic(&mut ts, &ctx, &mut rng).unwrap();
            let changed = changed_teams(&original, &ts);
            assert!(changed == 0 || changed == 2);
        }
    }

    #[test]
    fn test_robinhood_only_keeps_improvements() {
        let students = StudentIndex::new((1..=9).map(Student::new).collect()).unwrap();
        let priorities = multiple_of_three();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 3, 3);
        let mut rng = create_rng(1);

        let mut ts = set(&[&[1, 2, 4], &[3, 6, 9], &[5, 7, 8]]);
        let before = ts.calculate_score(&scorer).unwrap();
        robinhood(&mut ts, &ctx, &mut rng).unwrap();
        assert!(ts.calculate_score(&scorer).unwrap() >= before);
    }

    #[test]
    fn test_robinhood_infeasible_single_unlocked() {
        let students = StudentIndex::new((1..=4).map(Student::new).collect()).unwrap();
        let priorities = multiple_of_three();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 2);
        let mut rng = create_rng(1);

        let mut ts = PriorityTeamSet::new(vec![
            PriorityTeam::new(Arc::new(TeamShell::new(0)), vec![1, 2]),
            PriorityTeam::new(Arc::new(TeamShell::new(1).locked()), vec![3, 4]),
        ]);
        assert_eq!(
            robinhood(&mut ts, &ctx, &mut rng).unwrap(),
            MutationOutcome::Infeasible
        );
        assert_eq!(
            robinhood_holistic(&mut ts, &ctx, &mut rng).unwrap(),
            MutationOutcome::Infeasible
        );
    }
}
