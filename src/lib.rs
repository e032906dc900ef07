//! Priority-driven team formation.
//!
//! Partitions a set of students into teams so that an ordered list of
//! soft constraints ([`Priority`](priority::Priority)) is satisfied as well
//! as possible. Earlier priorities strictly dominate later ones.
//!
//! - **Model**: students with attributes, relationships and project
//!   preferences; team shells with requirements and locks.
//! - **Priorities**: tokenization, diversity, requirement, project and
//!   social preference, plus caller-supplied custom criteria. Each maps a
//!   team to a satisfaction in `[0, 1]`.
//! - **Scoring**: per-priority satisfaction is quantized into 25 buckets
//!   and combined positionally into one `u128`, so comparing scores
//!   compares priorities lexicographically.
//! - **Mutation**: membership-changing operators (random swap, Local-Max,
//!   Robinhood, greedy reassignment, slicing, size rebalancing) that
//!   respect locked teams and never lose or duplicate a student.
//! - **Priority algorithm**: keep / spread / iterate beam search under a
//!   round and wall-clock budget.
//!
//! # Quick start
//!
//! ```
//! use u_teamform::model::{Student, TeamGenerationOptions};
//! use u_teamform::priority::{DiversityPriority, DiversityStrategy, Priority};
//! use u_teamform::priority_algorithm::{generate, PriorityConfig};
//!
//! let students: Vec<Student> = (1..=9)
//!     .map(|id| Student::new(id).with_attribute(0, vec![(id % 3) as i32]))
//!     .collect();
//! let priorities: Vec<Priority> =
//!     vec![DiversityPriority::new(0, DiversityStrategy::Diversify, 3).unwrap().into()];
//!
//! let assignment = generate(
//!     students,
//!     &TeamGenerationOptions::new(3, 3, 3),
//!     &priorities,
//!     &PriorityConfig::fast().with_seed(7),
//! )
//! .unwrap();
//! assert_eq!(assignment.teams.len(), 3);
//! ```
//!
//! # Logging
//!
//! Runs emit `tracing` events (`search_start`, `search_end` at info,
//! improvements at debug). The crate never installs a subscriber.

pub mod candidate;
pub mod error;
pub mod model;
pub mod mutation;
pub mod priority;
pub mod priority_algorithm;
pub mod random;
pub mod scoring;

pub use error::{ConfigError, Result, TeamFormError};
pub use priority_algorithm::{generate, PriorityConfig, TeamAssignment};
