//! Local-Max recombination and greedy reassignment.
//!
//! Local-Max pools the members of two teams and tries every way of
//! splitting the pool back into teams of the original sizes, keeping the
//! split whose better half scores highest, i.e. it maximizes
//! `max(score_a, score_b)`, not the sum. The other team may regress; the
//! whole-partition score decides later whether the child survives.
//!
//! Enumeration costs `C(n_a + n_b, n_a)` team evaluations. Above
//! [`MutationContext::combination_limit`] splits, that many random splits
//! are sampled instead.

use super::{LocalMaxVariant, MutationContext, MutationOutcome};
use crate::candidate::PriorityTeamSet;
use crate::error::Result;
use crate::model::StudentId;
use crate::random::{choose, sample_distinct, shuffle};
use crate::scoring::Score;
use rand::Rng;

/// Picks two teams according to `variant` and recombines them.
pub(crate) fn local_max<R: Rng>(
    team_set: &mut PriorityTeamSet,
    variant: LocalMaxVariant,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Result<MutationOutcome> {
    let unlocked = team_set.unlocked_indices();
    if unlocked.len() < 2 {
        return Ok(MutationOutcome::Infeasible);
    }

    let (a, b) = match variant {
        LocalMaxVariant::RandomPair => match sample_distinct(&unlocked, 2, rng) {
            Some(pair) => (pair[0], pair[1]),
            None => return Ok(MutationOutcome::Infeasible),
        },
        LocalMaxVariant::LowestPair => {
            let ranked = rank_by_team_score(team_set, &unlocked, ctx)?;
            (ranked[0], ranked[1])
        }
        LocalMaxVariant::LowestAndRandom => {
            let ranked = rank_by_team_score(team_set, &unlocked, ctx)?;
            let lowest = ranked[0];
            let others: Vec<usize> = unlocked.iter().copied().filter(|&i| i != lowest).collect();
            match choose(&others, rng) {
                Some(other) => (lowest, other),
                None => return Ok(MutationOutcome::Infeasible),
            }
        }
    };
    local_max_pair(team_set, a, b, ctx, rng)
}

/// Unlocked team indices, lowest team score first (stable on ties).
pub(crate) fn rank_by_team_score(
    team_set: &PriorityTeamSet,
    indices: &[usize],
    ctx: &MutationContext<'_>,
) -> Result<Vec<usize>> {
    let mut scored: Vec<(Score, usize)> = indices
        .iter()
        .map(|&i| Ok((ctx.scorer.team_score(team_set.team(i))?, i)))
        .collect::<Result<_>>()?;
    scored.sort_by_key(|&(score, _)| score);
    Ok(scored.into_iter().map(|(_, i)| i).collect())
}

/// Re-splits the members of teams `a` and `b`.
///
/// The current split is the baseline; only a strictly better split
/// replaces it, so `Unchanged` means both member lists are untouched.
pub(crate) fn local_max_pair<R: Rng>(
    team_set: &mut PriorityTeamSet,
    a: usize,
    b: usize,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Result<MutationOutcome> {
    let scorer = ctx.scorer;
    let team_a = team_set.team(a);
    let team_b = team_set.team(b);
    let size_a = team_a.len();
    let pool: Vec<StudentId> = team_a
        .student_ids
        .iter()
        .chain(&team_b.student_ids)
        .copied()
        .collect();

    let split_value = |left: &[StudentId], right: &[StudentId]| -> Result<Score> {
        let sa = scorer.members_score(left, team_set.team(a).shell())?;
        let sb = scorer.members_score(right, team_set.team(b).shell())?;
        Ok(sa.max(sb))
    };

    let mut best_value = split_value(&team_a.student_ids, &team_b.student_ids)?;
    let mut best_split: Option<(Vec<StudentId>, Vec<StudentId>)> = None;

    let mut consider = |chosen: &[usize]| -> Result<()> {
        let (left, right) = split_pool(&pool, chosen);
        let value = split_value(&left, &right)?;
        if value > best_value {
            best_value = value;
            best_split = Some((left, right));
        }
        Ok(())
    };

    let limit = ctx.combination_limit;
    if binomial_capped(pool.len(), size_a, limit).is_some() {
        let mut combos = Combinations::new(pool.len(), size_a);
        while let Some(chosen) = combos.next_combination() {
            consider(chosen)?;
        }
    } else {
        for _ in 0..limit {
            let mut chosen = rand::seq::index::sample(rng, pool.len(), size_a).into_vec();
            chosen.sort_unstable();
            consider(&chosen)?;
        }
    }

    match best_split {
        Some((left, right)) => {
            team_set.team_mut(a).student_ids = left;
            team_set.team_mut(b).student_ids = right;
            Ok(MutationOutcome::Mutated)
        }
        None => Ok(MutationOutcome::Unchanged),
    }
}

/// Pools `teams` random unlocked teams and reassigns their members one at
/// a time, in shuffled order, to the team whose own score gains the most.
/// Each team is refilled to exactly its previous size.
pub(crate) fn greedy_local_max<R: Rng>(
    team_set: &mut PriorityTeamSet,
    teams: usize,
    ctx: &MutationContext<'_>,
    rng: &mut R,
) -> Result<MutationOutcome> {
    let unlocked = team_set.unlocked_indices();
    let k = teams.clamp(2, unlocked.len().max(2));
    let Some(chosen) = sample_distinct(&unlocked, k, rng) else {
        return Ok(MutationOutcome::Infeasible);
    };

    let capacities: Vec<usize> = chosen.iter().map(|&i| team_set.team(i).len()).collect();
    let mut pool = Vec::with_capacity(capacities.iter().sum());
    for &i in &chosen {
        pool.append(&mut team_set.team_mut(i).student_ids);
    }
    shuffle(&mut pool, rng);
    greedy_assign(team_set, &chosen, &capacities, pool, ctx)?;
    Ok(MutationOutcome::Mutated)
}

/// Places each id of `pool`, in order, into the target team with spare
/// capacity whose team score increases the most (first target wins ties).
///
/// `capacities` must sum to at least `pool.len()`.
pub(crate) fn greedy_assign(
    team_set: &mut PriorityTeamSet,
    targets: &[usize],
    capacities: &[usize],
    pool: Vec<StudentId>,
    ctx: &MutationContext<'_>,
) -> Result<()> {
    let scorer = ctx.scorer;
    let mut current: Vec<Score> = targets
        .iter()
        .map(|&i| scorer.team_score(team_set.team(i)))
        .collect::<Result<_>>()?;

    for id in pool {
        let mut best: Option<(i128, usize, Score)> = None;
        for (slot, &i) in targets.iter().enumerate() {
            let team = team_set.team(i);
            if team.len() >= capacities[slot] {
                continue;
            }
            let mut trial = team.student_ids.clone();
            trial.push(id);
            let with = scorer.members_score(&trial, team.shell())?;
            let gain = with as i128 - current[slot] as i128;
            if best.is_none_or(|(g, _, _)| gain > g) {
                best = Some((gain, slot, with));
            }
        }
        // capacities cover the pool, so a slot is always found
        if let Some((_, slot, with)) = best {
            team_set.team_mut(targets[slot]).student_ids.push(id);
            current[slot] = with;
        }
    }
    Ok(())
}

fn split_pool(pool: &[StudentId], chosen: &[usize]) -> (Vec<StudentId>, Vec<StudentId>) {
    let mut left = Vec::with_capacity(chosen.len());
    let mut right = Vec::with_capacity(pool.len() - chosen.len());
    let mut next = chosen.iter().peekable();
    for (i, &id) in pool.iter().enumerate() {
        if next.peek() == Some(&&i) {
            left.push(id);
            next.next();
        } else {
            right.push(id);
        }
    }
    (left, right)
}

/// `C(n, k)` if it does not exceed `limit`.
fn binomial_capped(n: usize, k: usize, limit: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > limit as u128 {
            return None;
        }
    }
    Some(acc as usize)
}

/// Lexicographic k-combinations of `0..n`.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
        }
    }

    fn next_combination(&mut self) -> Option<&[usize]> {
        let k = self.indices.len();
        if k > self.n {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }
        // rightmost index that can still move
        let mut i = k;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(&self.indices)
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

    fn even() -> Vec<Priority> {
        vec![CustomPriority::all_members("even", |s| s.id % 2 == 0).into()]
    }

    #[test]
    fn test_combinations_count() {
        let mut c = Combinations::new(5, 2);
        let mut seen = Vec::new();
        while let Some(x) = c.next_combination() {
            seen.push(x.to_vec());
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(seen[0], vec![0, 1]);
        assert_eq!(seen[9], vec![3, 4]);

        let mut empty = Combinations::new(3, 0);
        assert_eq!(empty.next_combination(), Some(&[][..]));
        assert_eq!(empty.next_combination(), None);
    }

    #[test]
    fn test_binomial_capped() {
        assert_eq!(binomial_capped(4, 2, 100), Some(6));
        assert_eq!(binomial_capped(14, 7, 5000), Some(3432));
        assert_eq!(binomial_capped(30, 15, 5000), None);
        assert_eq!(binomial_capped(3, 0, 1), Some(1));
    }

    #[test]
    fn test_split_pool() {
        let (l, r) = split_pool(&[10, 11, 12, 13], &[1, 3]);
        assert_eq!(l, vec![11, 13]);
        assert_eq!(r, vec![10, 12]);
    }

    #[test]
    fn test_local_max_separates_even_ids() {
        let students = StudentIndex::new((1..=4).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 2);
        let mut rng = create_rng(0);

        let mut ts = set(&[&[1, 2], &[3, 4]]);
        let before = ts.calculate_score(&scorer).unwrap();
        assert_eq!(before, 0);

        let outcome = local_max_pair(&mut ts, 0, 1, &ctx, &mut rng).unwrap();
        assert_eq!(outcome, MutationOutcome::Mutated);
        let after = ts.calculate_score(&scorer).unwrap();
        assert_eq!(after, 12);
        assert!(after > before);

        let mut evens: Vec<Vec<u32>> = ts.teams().iter().map(|t| t.student_ids.clone()).collect();
        evens.iter_mut().for_each(|v| v.sort_unstable());
        assert!(evens.contains(&vec![2, 4]));
        assert!(evens.contains(&vec![1, 3]));
    }

    #[test]
    fn test_local_max_keeps_optimal_split() {
        let students = StudentIndex::new((1..=4).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 2);
        let mut rng = create_rng(0);

        let mut ts = set(&[&[2, 4], &[1, 3]]);
        let before = ts.clone();
        let outcome = local_max_pair(&mut ts, 0, 1, &ctx, &mut rng).unwrap();
        assert_eq!(outcome, MutationOutcome::Unchanged);
        assert_eq!(ts, before);
    }

    #[test]
    fn test_local_max_sampling_above_limit() {
        let students = StudentIndex::new((1..=12).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        // C(12, 6) = 924 > 50
        let ctx = MutationContext::new(&scorer, 6, 6).with_combination_limit(50);
        let mut rng = create_rng(9);

        let mut ts = set(&[&[1, 2, 3, 4, 5, 6], &[7, 8, 9, 10, 11, 12]]);
        local_max_pair(&mut ts, 0, 1, &ctx, &mut rng).unwrap();
        assert_eq!(ts.team(0).len(), 6);
        assert_eq!(ts.team(1).len(), 6);
        assert_eq!(ts.student_ids(), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_lowest_pair_skips_locked() {
        let students = StudentIndex::new((1..=6).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 2);
        let mut rng = create_rng(2);

        let mut ts = PriorityTeamSet::new(vec![
            PriorityTeam::new(Arc::new(TeamShell::new(0).locked()), vec![1, 3]),
            PriorityTeam::new(Arc::new(TeamShell::new(1)), vec![2, 5]),
            PriorityTeam::new(Arc::new(TeamShell::new(2)), vec![4, 6]),
        ]);
        local_max(&mut ts, LocalMaxVariant::LowestPair, &ctx, &mut rng).unwrap();
        assert_eq!(ts.team(0).student_ids, vec![1, 3]);
    }

    #[test]
    fn test_greedy_preserves_sizes() {
        let students = StudentIndex::new((1..=9).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 2, 4);
        let mut rng = create_rng(4);

        let mut ts = set(&[&[1, 2], &[3, 4, 5, 6], &[7, 8, 9]]);
        let outcome = greedy_local_max(&mut ts, 3, &ctx, &mut rng).unwrap();
        assert_eq!(outcome, MutationOutcome::Mutated);
        let sizes: Vec<usize> = ts.teams().iter().map(|t| t.len()).collect();
        assert_eq!(sizes, vec![2, 4, 3]);
        assert_eq!(ts.student_ids(), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_greedy_infeasible_with_one_team() {
        let students = StudentIndex::new((1..=2).map(Student::new).collect()).unwrap();
        let priorities = even();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 1, 2);
        let mut rng = create_rng(4);

        let mut ts = set(&[&[1, 2]]);
        let outcome = greedy_local_max(&mut ts, 2, &ctx, &mut rng).unwrap();
        assert_eq!(outcome, MutationOutcome::Infeasible);
        assert_eq!(ts.team(0).student_ids, vec![1, 2]);
    }
}
