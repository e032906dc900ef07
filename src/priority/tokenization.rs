//! Threshold priority on the presence of one attribute value.

use super::{invalid, DiversityStrategy};
use crate::error::ConfigError;
use crate::model::{AttributeId, AttributeValue, Student};

/// Satisfaction floor of the linear penalty region.
pub const THETA: f64 = 0.2;

/// Counts team members holding `value` for `attribute` and compares the
/// count against `threshold`.
///
/// - `Diversify` (min-of-k): a team holding the value should hold it at
///   least `threshold` times, so no member is the lone representative.
///   Satisfied when `count >= threshold`; drifts linearly from 1 at the
///   threshold down to [`THETA`] when every member holds it.
/// - `Concentrate` (max-of-k): satisfied when `count <= threshold`;
///   climbs linearly from [`THETA`] toward 1 as the count approaches the
///   threshold.
///
/// A team without any holder passes vacuously. Outside the satisfied
/// region the satisfaction is 0.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenizationPriority {
    pub attribute: AttributeId,
    pub value: AttributeValue,
    pub strategy: DiversityStrategy,
    pub threshold: usize,
}

impl TokenizationPriority {
    pub fn new(
        attribute: AttributeId,
        value: AttributeValue,
        strategy: DiversityStrategy,
        threshold: usize,
    ) -> Result<Self, ConfigError> {
        let priority = Self {
            attribute,
            value,
            strategy,
            threshold,
        };
        priority.validate()?;
        Ok(priority)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold == 0 {
            return Err(invalid("tokenization", "threshold must be positive"));
        }
        Ok(())
    }

    /// Number of students holding the value of interest.
    pub fn student_count_meets_threshold(&self, students: &[&Student]) -> usize {
        students
            .iter()
            .filter(|s| s.has_value(self.attribute, self.value))
            .count()
    }

    pub fn satisfaction(&self, students: &[&Student]) -> f64 {
        let count = self.student_count_meets_threshold(students);
        if count == 0 || count == self.threshold {
            return 1.0;
        }
        let k = self.threshold as f64;
        let c = count as f64;
        match self.strategy {
            DiversityStrategy::Diversify => {
                if count < self.threshold {
                    return 0.0;
                }
                let n = students.len() as f64;
                // count > threshold implies n > threshold
                1.0 - (1.0 - THETA) * (c - k) / (n - k)
            }
            DiversityStrategy::Concentrate => {
                if count > self.threshold {
                    return 0.0;
                }
                THETA + (1.0 - THETA) * c / k
            }
        }
    }
}
