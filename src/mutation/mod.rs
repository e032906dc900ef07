//! Mutation operators over candidate partitions.
//!
//! Each operator turns a partition into a neighbouring one. All of them:
//!
//! - leave locked teams untouched,
//! - conserve the multiset of student ids,
//! - report [`MutationOutcome::Infeasible`] rather than erroring when the
//!   partition offers nothing to act on.
//!
//! | Operator | Move |
//! |---|---|
//! | [`MutationOperator::RandomSwap`] | swap one member between two teams |
//! | [`MutationOperator::LocalMax`] | best re-split of two teams' members |
//! | [`MutationOperator::Robinhood`] | per priority, re-split a satisfied and an unsatisfied team |
//! | [`MutationOperator::RobinhoodHolistic`] | re-split the lowest and highest scoring teams |
//! | [`MutationOperator::GreedyLocalMax`] | greedy reassignment across N teams |
//! | [`MutationOperator::RandomSlice`] | rotate one random member out of every team |
//! | [`MutationOperator::TeamSizeRebalance`] | move members to new random sizes |

mod local_max;
mod robinhood;
mod swap;
mod team_size;
mod types;

pub(crate) use local_max::greedy_assign;
pub use robinhood::SATISFIED_THRESHOLD;
pub use types::{
    LocalMaxVariant, MutationContext, MutationOperator, MutationOutcome, DEFAULT_COMBINATION_LIMIT,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{PriorityTeam, PriorityTeamSet};
    use crate::model::{Student, StudentIndex, TeamShell};
    use crate::priority::{CustomPriority, Priority};
    use crate::random::create_rng;
    use crate::scoring::Scorer;
    use proptest::prelude::*;
    use std::sync::Arc;

    const ALL: [MutationOperator; 9] = [
        MutationOperator::RandomSwap,
        MutationOperator::LocalMax(LocalMaxVariant::LowestPair),
        MutationOperator::LocalMax(LocalMaxVariant::LowestAndRandom),
        MutationOperator::LocalMax(LocalMaxVariant::RandomPair),
        MutationOperator::Robinhood,
        MutationOperator::RobinhoodHolistic,
        MutationOperator::GreedyLocalMax { teams: 3 },
        MutationOperator::RandomSlice,
        MutationOperator::TeamSizeRebalance { teams: 3 },
    ];

    /// Splits `n` ids into `sizes.len()` teams; `locked[i]` locks team i.
    fn build(sizes: &[usize], locked: &[bool]) -> PriorityTeamSet {
        let mut next = 1u32;
        let teams = sizes
            .iter()
            .zip(locked)
            .enumerate()
            .map(|(i, (&size, &lock))| {
                let ids: Vec<u32> = (next..next + size as u32).collect();
                next += size as u32;
                let mut shell = TeamShell::new(i as u32);
                shell.is_locked = lock;
                PriorityTeam::new(Arc::new(shell), ids)
            })
            .collect();
        PriorityTeamSet::new(teams)
    }

    fn priorities() -> Vec<Priority> {
        vec![
            CustomPriority::all_members("even", |s| s.id % 2 == 0).into(),
            CustomPriority::new("small ids", |students: &[&Student], _: &TeamShell| {
                let low = students.iter().filter(|s| s.id <= 6).count();
                if students.is_empty() {
                    1.0
                } else {
                    low as f64 / students.len() as f64
                }
            })
            .into(),
        ]
    }

    proptest! {
        #[test]
        fn prop_conservation_and_locks(
            sizes in proptest::collection::vec(2usize..5, 2..5),
            lock_mask in proptest::collection::vec(any::<bool>(), 5),
            op_index in 0usize..ALL.len(),
            seed in any::<u64>(),
        ) {
            let locked = &lock_mask[..sizes.len()];
            let original = build(&sizes, locked);
            let n: usize = sizes.iter().sum();
            let students = StudentIndex::new((1..=n as u32).map(Student::new).collect()).unwrap();
            let priorities = priorities();
            let scorer = Scorer::new(&priorities, &students).unwrap();
            let ctx = MutationContext::new(&scorer, 2, 4);
            let mut rng = create_rng(seed);

            let mut ts = original.clone();
            ALL[op_index].apply(&mut ts, &ctx, &mut rng).unwrap();

            prop_assert_eq!(ts.student_ids(), original.student_ids());
            for (before, after) in original.teams().iter().zip(ts.teams()) {
                if before.is_locked() {
                    prop_assert_eq!(&before.student_ids, &after.student_ids);
                }
                prop_assert_eq!(before.shell().id, after.shell().id);
            }
        }

        #[test]
        fn prop_infeasible_leaves_input_untouched(
            op_index in 0usize..ALL.len(),
            seed in any::<u64>(),
        ) {
            // one unlocked team: nothing to pair it with
            let original = build(&[3, 3], &[false, true]);
            let students = StudentIndex::new((1..=6).map(Student::new).collect()).unwrap();
            let priorities = priorities();
            let scorer = Scorer::new(&priorities, &students).unwrap();
            let ctx = MutationContext::new(&scorer, 2, 4);
            let mut rng = create_rng(seed);

            let mut ts = original.clone();
            let outcome = ALL[op_index].apply(&mut ts, &ctx, &mut rng).unwrap();
            prop_assert_ne!(outcome, MutationOutcome::Mutated);
            prop_assert_eq!(ts.teams(), original.teams());
        }
    }

    #[test]
    fn test_mutation_invalidates_score() {
        let students = StudentIndex::new((1..=6).map(Student::new).collect()).unwrap();
        let priorities = priorities();
        let scorer = Scorer::new(&priorities, &students).unwrap();
        let ctx = MutationContext::new(&scorer, 3, 3);
        let mut rng = create_rng(3);

        let mut ts = build(&[3, 3], &[false, false]);
        ts.calculate_score(&scorer).unwrap();
        let outcome = MutationOperator::RandomSwap.apply(&mut ts, &ctx, &mut rng).unwrap();
        assert_eq!(outcome, MutationOutcome::Mutated);
        assert_eq!(ts.cached_score(), None);
        assert_eq!(
            ts.calculate_score(&scorer).unwrap(),
            scorer.team_set_score(&ts).unwrap()
        );
    }

    #[test]
    fn test_operator_names_unique() {
        let mut names: Vec<&str> = ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }
}
