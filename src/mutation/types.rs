//! Operator catalogue and shared mutation context.

use super::{local_max, robinhood, swap, team_size};
use crate::candidate::PriorityTeamSet;
use crate::error::Result;
use crate::scoring::Scorer;
use rand::Rng;

/// What an operator did to the partition it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Membership changed.
    Mutated,
    /// The operator ran but kept the current membership.
    Unchanged,
    /// The operator could not act (e.g. fewer than two unlocked teams).
    /// The partition is untouched.
    Infeasible,
}

/// How Local-Max picks the two teams it recombines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalMaxVariant {
    /// The two lowest-scoring unlocked teams.
    LowestPair,
    /// The lowest-scoring unlocked team and one other at random.
    LowestAndRandom,
    /// Two unlocked teams at random.
    RandomPair,
}

/// A neighbourhood move over candidate partitions.
///
/// Every operator skips locked teams, conserves the multiset of student
/// ids, and reports [`MutationOutcome::Infeasible`] instead of failing
/// when there is nothing it can do. Errors are reserved for malformed
/// input (a member missing from the student index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationOperator {
    /// Swap one random member between two random unlocked teams.
    RandomSwap,
    /// Exhaustively re-split the members of two teams.
    LocalMax(LocalMaxVariant),
    /// Per priority, recombine a satisfied team with an unsatisfied one.
    Robinhood,
    /// Recombine the globally lowest and highest scoring teams.
    RobinhoodHolistic,
    /// Pool `teams` unlocked teams and greedily reassign their members.
    GreedyLocalMax { teams: usize },
    /// Pop one member from every unlocked team and deal them back shuffled.
    RandomSlice,
    /// Draw new sizes for `teams` unlocked teams and move members to match.
    TeamSizeRebalance { teams: usize },
}

impl MutationOperator {
    pub fn name(&self) -> &'static str {
        match self {
            MutationOperator::RandomSwap => "random_swap",
            MutationOperator::LocalMax(_) => "local_max",
            MutationOperator::Robinhood => "robinhood",
            MutationOperator::RobinhoodHolistic => "robinhood_holistic",
            MutationOperator::GreedyLocalMax { .. } => "greedy_local_max",
            MutationOperator::RandomSlice => "random_slice",
            MutationOperator::TeamSizeRebalance { .. } => "team_size_rebalance",
        }
    }

    /// Applies the operator in place.
    ///
    /// The caller passes a partition it owns (usually a fresh clone of a
    /// kept candidate). On `Infeasible` and `Unchanged` the membership is
    /// left as it was.
    pub fn apply<R: Rng>(
        &self,
        team_set: &mut PriorityTeamSet,
        ctx: &MutationContext<'_>,
        rng: &mut R,
    ) -> Result<MutationOutcome> {
        let outcome = match *self {
            MutationOperator::RandomSwap => swap::random_swap(team_set, rng),
            MutationOperator::LocalMax(variant) => local_max::local_max(team_set, variant, ctx, rng)?,
            MutationOperator::Robinhood => robinhood::robinhood(team_set, ctx, rng)?,
            MutationOperator::RobinhoodHolistic => {
                robinhood::robinhood_holistic(team_set, ctx, rng)?
            }
            MutationOperator::GreedyLocalMax { teams } => {
                local_max::greedy_local_max(team_set, teams, ctx, rng)?
            }
            MutationOperator::RandomSlice => swap::random_slice(team_set, rng),
            MutationOperator::TeamSizeRebalance { teams } => {
                team_size::rebalance(team_set, teams, ctx, rng)
            }
        };
        if outcome == MutationOutcome::Infeasible {
            tracing::trace!(operator = self.name(), "mutation infeasible");
        }
        Ok(outcome)
    }
}

/// Read-only inputs every operator may need.
#[derive(Debug, Clone)]
pub struct MutationContext<'a> {
    pub scorer: &'a Scorer<'a>,
    pub min_team_size: usize,
    pub max_team_size: usize,
    /// Upper bound on the splits Local-Max evaluates per call. Above it,
    /// that many random splits are sampled instead of enumerating all.
    pub combination_limit: usize,
}

impl<'a> MutationContext<'a> {
    pub fn new(scorer: &'a Scorer<'a>, min_team_size: usize, max_team_size: usize) -> Self {
        Self {
            scorer,
            min_team_size,
            max_team_size,
            combination_limit: DEFAULT_COMBINATION_LIMIT,
        }
    }

    pub fn with_combination_limit(mut self, limit: usize) -> Self {
        self.combination_limit = limit.max(1);
        self
    }
}

/// Default cap on Local-Max splits (C(14, 7) = 3432 fits under it).
pub const DEFAULT_COMBINATION_LIMIT: usize = 5000;
