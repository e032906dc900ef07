//! Priority algorithm configuration.
//!
//! [`PriorityConfig`] holds the beam-search budget (keep / spread /
//! iterate / time), the seeding strategy and the mutation schedule.

use crate::error::ConfigError;
use crate::mutation::{LocalMaxVariant, MutationOperator, DEFAULT_COMBINATION_LIMIT};

/// How the initial partition is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartType {
    /// Shuffle free students into the unlocked teams.
    Random,
    /// Place free students one by one where they raise their team's score most.
    #[default]
    WeightHeuristic,
}

/// Configuration for the priority algorithm.
///
/// # Defaults
///
/// ```
/// use u_teamform::priority_algorithm::PriorityConfig;
///
/// let config = PriorityConfig::default();
/// assert_eq!(config.max_keep, 3);
/// assert_eq!(config.max_spread, 3);
/// assert_eq!(config.max_iterate, 1500);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_teamform::mutation::MutationOperator;
/// use u_teamform::priority_algorithm::{PriorityConfig, StartType};
///
/// let config = PriorityConfig::default()
///     .with_max_keep(5)
///     .with_max_iterate(300)
///     .with_start_type(StartType::Random)
///     .with_mutations(vec![
///         (MutationOperator::RandomSwap, 2),
///         (MutationOperator::RobinhoodHolistic, 1),
///     ])
///     .with_seed(42);
/// assert_eq!(config.mutation_schedule().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityConfig {
    /// Number of best candidates kept between rounds.
    pub max_keep: usize,

    /// Children generated from every kept candidate per round.
    pub max_spread: usize,

    /// Round limit.
    pub max_iterate: usize,

    /// Wall-clock budget in milliseconds.
    ///
    /// Checked between rounds only, so a run may overshoot by at most
    /// one round.
    pub max_time_ms: u64,

    /// Seeding strategy.
    pub start_type: StartType,

    /// Operators and how many times each runs on every child.
    ///
    /// Each of the `max_spread` clones of a kept candidate runs the list
    /// expanded by count, in order; see [`mutation_schedule`](Self::mutation_schedule).
    pub mutations: Vec<(MutationOperator, usize)>,

    /// Upper bound on the splits Local-Max evaluates per call.
    pub combination_limit: usize,

    /// Whether to score each round's children in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature. Scoring is pure, so the
    /// result is the same either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            max_keep: 3,
            max_spread: 3,
            max_iterate: 1500,
            max_time_ms: 1000,
            start_type: StartType::default(),
            mutations: vec![
                (MutationOperator::LocalMax(LocalMaxVariant::LowestPair), 1),
                (MutationOperator::RandomSwap, 1),
                (MutationOperator::RobinhoodHolistic, 1),
            ],
            combination_limit: DEFAULT_COMBINATION_LIMIT,
            parallel: false,
            seed: None,
        }
    }
}

impl PriorityConfig {
    pub fn with_max_keep(mut self, n: usize) -> Self {
        self.max_keep = n;
        self
    }

    pub fn with_max_spread(mut self, n: usize) -> Self {
        self.max_spread = n;
        self
    }

    pub fn with_max_iterate(mut self, n: usize) -> Self {
        self.max_iterate = n;
        self
    }

    pub fn with_max_time_ms(mut self, ms: u64) -> Self {
        self.max_time_ms = ms;
        self
    }

    pub fn with_start_type(mut self, start_type: StartType) -> Self {
        self.start_type = start_type;
        self
    }

    pub fn with_mutations(mut self, mutations: Vec<(MutationOperator, usize)>) -> Self {
        self.mutations = mutations;
        self
    }

    pub fn with_combination_limit(mut self, limit: usize) -> Self {
        self.combination_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for interactive use: small beam, short budget.
    ///
    /// - Keep: 2, Spread: 3, Rounds: 200, Time limit: 200ms
    pub fn fast() -> Self {
        Self {
            max_keep: 2,
            max_spread: 3,
            max_iterate: 200,
            max_time_ms: 200,
            ..Self::default()
        }
    }

    /// Same as [`Default`].
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for offline runs: wider beam and every operator family.
    ///
    /// - Keep: 8, Spread: 8, Rounds: 5000, Time limit: 10s
    pub fn quality() -> Self {
        Self {
            max_keep: 8,
            max_spread: 8,
            max_iterate: 5000,
            max_time_ms: 10_000,
            mutations: vec![
                (MutationOperator::LocalMax(LocalMaxVariant::LowestPair), 1),
                (MutationOperator::LocalMax(LocalMaxVariant::LowestAndRandom), 1),
                (MutationOperator::Robinhood, 1),
                (MutationOperator::RobinhoodHolistic, 1),
                (MutationOperator::GreedyLocalMax { teams: 3 }, 1),
                (MutationOperator::RandomSwap, 1),
                (MutationOperator::RandomSlice, 1),
                (MutationOperator::TeamSizeRebalance { teams: 3 }, 1),
            ],
            ..Self::default()
        }
    }

    /// The mutation list expanded by count, in order.
    pub fn mutation_schedule(&self) -> Vec<MutationOperator> {
        self.mutations
            .iter()
            .flat_map(|&(op, count)| std::iter::repeat_n(op, count))
            .collect()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let err = |msg: &str| Err(ConfigError::InvalidAlgorithmConfig(msg.into()));
        if self.max_keep == 0 {
            return err("max_keep must be at least 1");
        }
        if self.max_spread == 0 {
            return err("max_spread must be at least 1");
        }
        if self.max_iterate == 0 {
            return err("max_iterate must be at least 1");
        }
        if self.max_time_ms == 0 {
            return err("max_time_ms must be positive");
        }
        if self.mutation_schedule().is_empty() {
            return err("at least one mutation with a positive count is required");
        }
        if self.combination_limit == 0 {
            return err("combination_limit must be positive");
        }
        Ok(())
    }
}
