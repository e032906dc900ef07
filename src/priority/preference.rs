//! Project and social preference priorities.

use super::invalid;
use crate::error::ConfigError;
use crate::model::{Relationship, Student, TeamShell};

/// Whether students should land on (`Include`) or away from (`Exclude`)
/// the projects they list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreferenceDirection {
    Include,
    Exclude,
}

/// Rewards teams whose project ranks high in its members' preference lists.
///
/// A member ranking the team's project at zero-based position `r` (within
/// the first `max_preferences` entries) contributes `max_preferences - r`.
/// The sum is normalized by `team_size * max_preferences`; `Exclude`
/// takes the complement. Teams without a project are fully satisfied.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectPreferencePriority {
    pub direction: PreferenceDirection,
    pub max_preferences: usize,
}

impl ProjectPreferencePriority {
    pub fn new(direction: PreferenceDirection, max_preferences: usize) -> Result<Self, ConfigError> {
        let priority = Self {
            direction,
            max_preferences,
        };
        priority.validate()?;
        Ok(priority)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_preferences == 0 {
            return Err(invalid("project preference", "max_preferences must be positive"));
        }
        Ok(())
    }

    pub fn satisfaction(&self, students: &[&Student], shell: &TeamShell) -> f64 {
        let Some(project) = shell.project_id else {
            return 1.0;
        };
        if students.is_empty() {
            return 1.0;
        }
        let earned: usize = students
            .iter()
            .filter_map(|s| s.preference_rank(project))
            .filter(|&rank| rank < self.max_preferences)
            .map(|rank| self.max_preferences - rank)
            .sum();
        let inclusion = earned as f64 / (students.len() * self.max_preferences) as f64;
        match self.direction {
            PreferenceDirection::Include => inclusion,
            PreferenceDirection::Exclude => 1.0 - inclusion,
        }
    }
}

/// Rewards friends placed together and enemies kept apart.
///
/// Sums the directed relationship strengths over all ordered pairs of
/// members and rescales the sum from its theoretical range into [0, 1].
/// The lower bound assumes every member has `max_friends` friends in the
/// team, the upper bound `max_enemies` enemies. Since friendship is
/// negative, the lower bound maps to 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocialPreferencePriority {
    pub max_friends: usize,
    pub max_enemies: usize,
}

impl SocialPreferencePriority {
    pub fn new(max_friends: usize, max_enemies: usize) -> Result<Self, ConfigError> {
        let priority = Self {
            max_friends,
            max_enemies,
        };
        priority.validate()?;
        Ok(priority)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_friends == 0 && self.max_enemies == 0 {
            return Err(invalid(
                "social preference",
                "max_friends and max_enemies cannot both be zero",
            ));
        }
        Ok(())
    }

    pub fn satisfaction(&self, students: &[&Student]) -> f64 {
        let n = students.len();
        if n < 2 {
            return 1.0;
        }
        let mut total = 0.0;
        for a in students {
            for b in students {
                if a.id != b.id {
                    total += a.relationship_to(b.id);
                }
            }
        }

        let others = n - 1;
        let min = (n * self.max_friends.min(others)) as f64 * Relationship::Friend.strength();
        let max = (n * self.max_enemies.min(others)) as f64 * Relationship::Enemy.strength();
        if max <= min {
            return 1.0;
        }
        let clamped = total.clamp(min, max);
        (max - clamped) / (max - min)
    }
}
