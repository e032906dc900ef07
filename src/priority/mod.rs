//! Priorities: weighted soft constraints on a single team.
//!
//! Every priority maps a team (its members plus its shell) to a
//! satisfaction in `[0, 1]`, where 1 means fully satisfied. Priorities are
//! immutable and validated once, when they are built.
//!
//! The variants form a closed set ([`Priority`]); [`CustomPriority`] is
//! the escape hatch for criteria that only exist in a caller's domain.
//!
//! # Examples
//!
//! ```
//! use u_teamform::model::{Student, TeamShell};
//! use u_teamform::priority::{DiversityStrategy, Priority, TokenizationPriority};
//!
//! let p: Priority = TokenizationPriority::new(1, 5, DiversityStrategy::Diversify, 2)
//!     .unwrap()
//!     .into();
//!
//! let a = Student::new(1).with_attribute(1, vec![5]);
//! let b = Student::new(2).with_attribute(1, vec![5]);
//! assert_eq!(p.satisfaction(&[&a, &b], &TeamShell::new(0)), 1.0);
//! ```

mod diversity;
mod preference;
mod requirement;
mod tokenization;

pub use diversity::DiversityPriority;
pub use preference::{PreferenceDirection, ProjectPreferencePriority, SocialPreferencePriority};
pub use requirement::RequirementPriority;
pub use tokenization::{TokenizationPriority, THETA};

use crate::error::ConfigError;
use crate::model::{Student, TeamShell};
use std::fmt;
use std::sync::Arc;

/// Whether a priority wants an attribute spread across teams or gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiversityStrategy {
    Diversify,
    Concentrate,
}

type SatisfactionFn = dyn Fn(&[&Student], &TeamShell) -> f64 + Send + Sync;

/// A caller-defined satisfaction function.
///
/// The function must be pure; its output is clamped to `[0, 1]`.
#[derive(Clone)]
pub struct CustomPriority {
    name: String,
    func: Arc<SatisfactionFn>,
}

impl CustomPriority {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[&Student], &TeamShell) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Satisfied (1) when every member passes `predicate`, else 0.
    pub fn all_members<P>(name: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&Student) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |students: &[&Student], _: &TeamShell| {
            if students.iter().all(|&s| predicate(s)) {
                1.0
            } else {
                0.0
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPriority")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One soft constraint in the ordered priority list.
#[derive(Debug, Clone)]
pub enum Priority {
    Tokenization(TokenizationPriority),
    Diversity(DiversityPriority),
    Requirement(RequirementPriority),
    ProjectPreference(ProjectPreferencePriority),
    SocialPreference(SocialPreferencePriority),
    Custom(CustomPriority),
}

impl Priority {
    pub fn name(&self) -> &str {
        match self {
            Priority::Tokenization(_) => "tokenization",
            Priority::Diversity(_) => "diversity",
            Priority::Requirement(_) => "requirement",
            Priority::ProjectPreference(_) => "project preference",
            Priority::SocialPreference(_) => "social preference",
            Priority::Custom(p) => p.name(),
        }
    }

    /// Rejects contradictory parameters.
    ///
    /// The variant constructors already call this; it is exposed for
    /// priorities assembled field by field (e.g. deserialized).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Priority::Tokenization(p) => p.validate(),
            Priority::Diversity(p) => p.validate(),
            Priority::ProjectPreference(p) => p.validate(),
            Priority::SocialPreference(p) => p.validate(),
            Priority::Requirement(_) | Priority::Custom(_) => Ok(()),
        }
    }

    /// Satisfaction of one team in `[0, 1]`.
    pub fn satisfaction(&self, students: &[&Student], shell: &TeamShell) -> f64 {
        let raw = match self {
            Priority::Tokenization(p) => p.satisfaction(students),
            Priority::Diversity(p) => p.satisfaction(students),
            Priority::Requirement(p) => p.satisfaction(students, shell),
            Priority::ProjectPreference(p) => p.satisfaction(students, shell),
            Priority::SocialPreference(p) => p.satisfaction(students),
            Priority::Custom(p) => (p.func)(students, shell),
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }
}

impl From<TokenizationPriority> for Priority {
    fn from(p: TokenizationPriority) -> Self {
        Priority::Tokenization(p)
    }
}

impl From<DiversityPriority> for Priority {
    fn from(p: DiversityPriority) -> Self {
        Priority::Diversity(p)
    }
}

impl From<RequirementPriority> for Priority {
    fn from(p: RequirementPriority) -> Self {
        Priority::Requirement(p)
    }
}

impl From<ProjectPreferencePriority> for Priority {
    fn from(p: ProjectPreferencePriority) -> Self {
        Priority::ProjectPreference(p)
    }
}

impl From<SocialPreferencePriority> for Priority {
    fn from(p: SocialPreferencePriority) -> Self {
        Priority::SocialPreference(p)
    }
}

impl From<CustomPriority> for Priority {
    fn from(p: CustomPriority) -> Self {
        Priority::Custom(p)
    }
}

pub(crate) fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidPriority {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
