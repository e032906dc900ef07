//! Project requirement coverage.

use crate::model::{Student, TeamShell};

/// Average, over the shell's requirements, of the fraction of members
/// meeting each one. A shell without requirements is fully satisfied;
/// an empty team meets none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequirementPriority;

impl RequirementPriority {
    pub fn satisfaction(&self, students: &[&Student], shell: &TeamShell) -> f64 {
        if shell.requirements.is_empty() {
            return 1.0;
        }
        if students.is_empty() {
            return 0.0;
        }
        let n = students.len() as f64;
        let total: f64 = shell
            .requirements
            .iter()
            .map(|req| students.iter().filter(|s| req.is_met_by(s)).count() as f64 / n)
            .sum();
        total / shell.requirements.len() as f64
    }
}
