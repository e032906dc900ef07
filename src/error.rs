//! Error types for team formation.
//!
//! Configuration problems are reported once, at construction time, through
//! [`ConfigError`]. Everything that can go wrong during a run is a
//! [`TeamFormError`]. Operators that cannot act on a partition do not
//! produce errors at all; see [`MutationOutcome`](crate::mutation::MutationOutcome).

use crate::model::{StudentId, TeamId};
use thiserror::Error;

/// Invalid configuration detected before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A priority was constructed with contradictory parameters.
    #[error("invalid priority `{name}`: {reason}")]
    InvalidPriority { name: String, reason: String },

    /// Team size bounds are inverted.
    #[error("min team size {min} exceeds max team size {max}")]
    InvalidTeamSize { min: usize, max: usize },

    /// The students cannot be spread over the requested teams within the size bounds.
    #[error("cannot place {students} students into {teams} teams of size {min}..={max}")]
    InfeasibleTeamCount {
        students: usize,
        teams: usize,
        min: usize,
        max: usize,
    },

    /// Scores are encoded in a `u128`, which bounds the number of priorities.
    #[error("{count} priorities exceed the supported maximum of {max}")]
    TooManyPriorities { count: usize, max: usize },

    /// The same student id appears more than once in the input.
    #[error("student {0} appears more than once")]
    DuplicateStudent(StudentId),

    /// Two initial teams share a shell id.
    #[error("team {0} is defined more than once")]
    DuplicateTeam(TeamId),

    /// An unlocked initial team already holds more members than `max_size`.
    #[error("initial team {team} holds {size} students, more than max team size {max}")]
    OversizedInitialTeam { team: TeamId, size: usize, max: usize },

    /// Search parameters are out of range.
    #[error("invalid algorithm configuration: {0}")]
    InvalidAlgorithmConfig(String),
}

/// Main error type for team formation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TeamFormError {
    /// Configuration rejected before the run.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A team references a student the lookup does not contain.
    #[error("student {0} is referenced by a team but missing from the student set")]
    UnknownStudent(StudentId),

    /// A partition does not hold every student exactly once.
    #[error("partition holds {found} student slots, expected {expected} distinct students")]
    ConservationViolated { expected: usize, found: usize },
}

/// Result type alias for team formation operations.
pub type Result<T> = std::result::Result<T, TeamFormError>;
