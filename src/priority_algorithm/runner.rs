//! Keep / spread / iterate search loop.
//!
//! [`PriorityRunner`] drives a seed partition through rounds of
//! clone → mutate → score → truncate until the round limit, the time
//! budget or an external cancel stops it. Every clone runs the whole
//! mutation schedule in order.

use super::config::PriorityConfig;
use crate::candidate::PriorityTeamSet;
use crate::error::Result;
use crate::mutation::MutationContext;
use crate::random::create_rng;
use crate::scoring::{Score, Scorer};
use rand::Rng;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_iterate` rounds completed.
    IterationLimit,
    /// `max_time_ms` elapsed.
    TimeLimit,
    /// The cancel flag was raised.
    Cancelled,
}

/// Result of a priority algorithm run.
#[derive(Debug, Clone)]
pub struct PriorityResult {
    /// The best partition kept at the end of the run.
    pub best: PriorityTeamSet,

    /// Score of `best`.
    pub best_score: Score,

    /// Completed rounds.
    pub rounds: usize,

    /// Wall-clock time spent searching.
    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Best kept score after seeding and after every round.
    ///
    /// Never decreases, since the kept set only ever loses candidates to
    /// better ones.
    pub score_history: Vec<Score>,
}

/// Executes the priority algorithm search loop.
///
/// # Usage
///
/// ```ignore
/// let scorer = Scorer::new(&priorities, &students)?;
/// let ctx = MutationContext::new(&scorer, 3, 4);
/// let config = PriorityConfig::default().with_seed(42);
/// let result = PriorityRunner::run(seed_partition, &ctx, &config)?;
/// println!("Best score: {}", result.best_score);
/// ```
pub struct PriorityRunner;

impl PriorityRunner {
    /// Runs the search from `seed`.
    pub fn run(
        seed: PriorityTeamSet,
        ctx: &MutationContext<'_>,
        config: &PriorityConfig,
    ) -> Result<PriorityResult> {
        Self::run_with_cancel(seed, ctx, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next round and returns the best partition kept so far.
    pub fn run_with_cancel(
        seed: PriorityTeamSet,
        ctx: &MutationContext<'_>,
        config: &PriorityConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PriorityResult> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::search(seed, ctx, config, &mut rng, cancel)
    }

    /// The loop itself, on a caller-owned RNG.
    ///
    /// Expects a validated `config`.
    pub(crate) fn search<R: Rng>(
        mut seed: PriorityTeamSet,
        ctx: &MutationContext<'_>,
        config: &PriorityConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PriorityResult> {
        let start = Instant::now();
        let time_limit = Duration::from_millis(config.max_time_ms);
        let schedule = config.mutation_schedule();
        let scorer = ctx.scorer;

        let seed_score = seed.calculate_score(scorer)?;
        info!(
            event = "search_start",
            teams = seed.len(),
            students = scorer.students().len(),
            priorities = scorer.priorities().len(),
            seed_score = %seed_score,
        );

        let mut kept = vec![seed];
        let mut best_score = seed_score;
        let mut score_history = Vec::with_capacity(config.max_iterate.min(4096) + 1);
        score_history.push(best_score);
        let mut rounds = 0usize;

        let stop_reason = loop {
            if rounds >= config.max_iterate {
                break StopReason::IterationLimit;
            }
            if start.elapsed() >= time_limit {
                break StopReason::TimeLimit;
            }
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break StopReason::Cancelled;
            }

            let mut children = Vec::with_capacity(kept.len() * config.max_spread);
            for parent in &kept {
                for _ in 0..config.max_spread {
                    let mut child = parent.clone();
                    for op in &schedule {
                        op.apply(&mut child, ctx, rng)?;
                    }
                    children.push(child);
                }
            }
            score_all(&mut children, scorer, config.parallel)?;

            // parents first, so ties keep the older candidate
            kept.extend(children);
            kept.sort_by_key(|c| Reverse(c.cached_score()));
            kept.truncate(config.max_keep);
            rounds += 1;

            let round_best = kept[0].cached_score().unwrap_or(best_score);
            if round_best > best_score {
                debug!(round = rounds, best_score = %round_best, "improved");
            }
            best_score = round_best;
            score_history.push(best_score);
        };

        let elapsed = start.elapsed();
        info!(
            event = "search_end",
            rounds,
            elapsed_ms = elapsed.as_millis() as u64,
            best_score = %best_score,
            stop_reason = ?stop_reason,
        );

        let best = kept.swap_remove(0);
        Ok(PriorityResult {
            best,
            best_score,
            rounds,
            elapsed,
            stop_reason,
            score_history,
        })
    }
}

fn score_sequential(children: &mut [PriorityTeamSet], scorer: &Scorer<'_>) -> Result<()> {
    for child in children {
        child.calculate_score(scorer)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn score_all(children: &mut [PriorityTeamSet], scorer: &Scorer<'_>, parallel: bool) -> Result<()> {
    use rayon::prelude::*;
    if parallel {
        children
            .par_iter_mut()
            .try_for_each(|child| child.calculate_score(scorer).map(drop))
    } else {
        score_sequential(children, scorer)
    }
}

#[cfg(not(feature = "parallel"))]
fn score_all(children: &mut [PriorityTeamSet], scorer: &Scorer<'_>, _parallel: bool) -> Result<()> {
    score_sequential(children, scorer)
}
