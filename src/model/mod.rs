//! Data model: students, team shells and run options.
//!
//! These types carry no optimizer state. Candidate partitions live in
//! [`candidate`](crate::candidate) and only hold shared handles to the
//! shells defined here.

mod options;
mod student;
mod team;

pub use options::{InitialTeam, TeamGenerationOptions};
pub use student::{Relationship, Student, StudentIndex};
pub use team::{Requirement, RequirementOperator, TeamShell};

pub type StudentId = u32;
pub type TeamId = u32;
pub type ProjectId = u32;
pub type AttributeId = u32;
pub type AttributeValue = i32;
