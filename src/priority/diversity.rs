//! Thresholdless diversity / concentration of one attribute.

use super::{invalid, DiversityStrategy};
use crate::error::ConfigError;
use crate::model::{AttributeId, AttributeValue, Student};
use std::collections::{BTreeMap, BTreeSet};

/// Rewards teams whose members share (`Concentrate`) or spread
/// (`Diversify`) their values for one attribute.
///
/// # Concentrate
///
/// Each member is a binary vector over the attribute's values. The
/// satisfaction is the sum of dot products over all unordered member
/// pairs, divided by `pairs * max_choices`.
///
/// # Diversify
///
/// Blau heterogeneity `1 - Σ p_v²` over the team's value distribution,
/// normalized by its maximum `1 - 1/T` for `T` value occurrences.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiversityPriority {
    pub attribute: AttributeId,
    pub strategy: DiversityStrategy,
    /// Largest number of values a single student may hold for the attribute.
    pub max_choices: usize,
}

impl DiversityPriority {
    pub fn new(
        attribute: AttributeId,
        strategy: DiversityStrategy,
        max_choices: usize,
    ) -> Result<Self, ConfigError> {
        let priority = Self {
            attribute,
            strategy,
            max_choices,
        };
        priority.validate()?;
        Ok(priority)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_choices == 0 {
            return Err(invalid("diversity", "max_choices must be positive"));
        }
        Ok(())
    }

    pub fn satisfaction(&self, students: &[&Student]) -> f64 {
        let vectors: Vec<BTreeSet<AttributeValue>> = students
            .iter()
            .map(|s| s.attribute_values(self.attribute).iter().copied().collect())
            .collect();
        match self.strategy {
            DiversityStrategy::Concentrate => self.concentration(&vectors),
            DiversityStrategy::Diversify => blau_index(&vectors),
        }
    }

    fn concentration(&self, vectors: &[BTreeSet<AttributeValue>]) -> f64 {
        let n = vectors.len();
        if n < 2 {
            return 1.0;
        }
        let pairs = n * (n - 1) / 2;
        let mut shared = 0usize;
        for (i, a) in vectors.iter().enumerate() {
            for b in &vectors[i + 1..] {
                shared += a.intersection(b).count();
            }
        }
        (shared as f64 / (pairs * self.max_choices) as f64).clamp(0.0, 1.0)
    }
}

fn blau_index(vectors: &[BTreeSet<AttributeValue>]) -> f64 {
    let mut counts: BTreeMap<AttributeValue, usize> = BTreeMap::new();
    for value in vectors.iter().flatten() {
        *counts.entry(*value).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    if total < 2 {
        return 1.0;
    }
    let t = total as f64;
    let blau = 1.0 - counts.values().map(|&c| (c as f64 / t).powi(2)).sum::<f64>();
    (blau / (1.0 - 1.0 / t)).clamp(0.0, 1.0)
}
