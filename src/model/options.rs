//! Team generation options supplied by the caller.

use super::{StudentId, TeamId, TeamShell};
use crate::error::ConfigError;
use std::collections::HashSet;

/// A team the caller defines up front, optionally with members.
///
/// Members of a locked team stay exactly where they are for the whole run.
/// Members of an unlocked team only seed the starting partition.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialTeam {
    pub shell: TeamShell,
    pub student_ids: Vec<StudentId>,
}

impl InitialTeam {
    pub fn new(shell: TeamShell) -> Self {
        Self {
            shell,
            student_ids: Vec::new(),
        }
    }

    pub fn with_students(mut self, student_ids: Vec<StudentId>) -> Self {
        self.student_ids = student_ids;
        self
    }
}

/// Size bounds and team count for a run.
///
/// # Examples
///
/// ```
/// use u_teamform::model::TeamGenerationOptions;
///
/// let options = TeamGenerationOptions::new(3, 4, 5);
/// assert!(options.validate(18).is_ok());
/// assert!(options.validate(30).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamGenerationOptions {
    pub min_size: usize,
    pub max_size: usize,
    pub total_teams: usize,
    pub initial_teams: Vec<InitialTeam>,
}

impl TeamGenerationOptions {
    pub fn new(min_size: usize, max_size: usize, total_teams: usize) -> Self {
        Self {
            min_size,
            max_size,
            total_teams,
            initial_teams: Vec::new(),
        }
    }

    pub fn with_initial_teams(mut self, teams: Vec<InitialTeam>) -> Self {
        self.initial_teams = teams;
        self
    }

    /// Checks the bounds against the number of students to place.
    ///
    /// Locked teams keep their members regardless of size; the remaining
    /// students must fit into the unlocked teams within `min_size..=max_size`.
    /// Initial teams need distinct ids, and an unlocked one may not start
    /// above `max_size`.
    pub fn validate(&self, student_count: usize) -> Result<(), ConfigError> {
        if self.min_size > self.max_size {
            return Err(ConfigError::InvalidTeamSize {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.total_teams == 0 {
            return Err(ConfigError::InvalidAlgorithmConfig(
                "total_teams must be positive".into(),
            ));
        }
        if self.initial_teams.len() > self.total_teams {
            return Err(ConfigError::InvalidAlgorithmConfig(format!(
                "{} initial teams exceed total_teams {}",
                self.initial_teams.len(),
                self.total_teams
            )));
        }

        let mut seen = HashSet::new();
        for team in &self.initial_teams {
            if !seen.insert(team.shell.id) {
                return Err(ConfigError::DuplicateTeam(team.shell.id));
            }
            if !team.shell.is_locked && team.student_ids.len() > self.max_size {
                return Err(ConfigError::OversizedInitialTeam {
                    team: team.shell.id,
                    size: team.student_ids.len(),
                    max: self.max_size,
                });
            }
        }

        let locked = self.initial_teams.iter().filter(|t| t.shell.is_locked);
        let locked_teams = locked.clone().count();
        let locked_students: usize = locked.map(|t| t.student_ids.len()).sum();
        let free_students = student_count.saturating_sub(locked_students);
        let free_teams = self.total_teams - locked_teams;

        let fits = free_teams * self.min_size <= free_students
            && free_students <= free_teams * self.max_size;
        if !fits {
            return Err(ConfigError::InfeasibleTeamCount {
                students: student_count,
                teams: self.total_teams,
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Every team shell for the run with its pre-assigned members.
    ///
    /// Initial teams come first in the order given; the rest are blank
    /// shells with fresh ids above the largest initial id.
    pub fn team_slots(&self) -> Vec<InitialTeam> {
        let mut slots = self.initial_teams.clone();
        let mut next_id: TeamId = slots
            .iter()
            .map(|t| t.shell.id + 1)
            .max()
            .unwrap_or(0);
        while slots.len() < self.total_teams {
            slots.push(InitialTeam::new(TeamShell::new(next_id)));
            next_id += 1;
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_bounds() {
        let err = TeamGenerationOptions::new(5, 3, 2).validate(8).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTeamSize { min: 5, max: 3 });
    }

    #[test]
    fn test_capacity() {
        let options = TeamGenerationOptions::new(2, 3, 3);
        assert!(options.validate(6).is_ok());
        assert!(options.validate(9).is_ok());
        assert!(options.validate(5).is_err());
        assert!(options.validate(10).is_err());
    }

    #[test]
    fn test_locked_members_excluded_from_capacity() {
        let locked = InitialTeam::new(TeamShell::new(9).locked()).with_students(vec![1, 2, 3, 4, 5]);
        let options = TeamGenerationOptions::new(2, 2, 3).with_initial_teams(vec![locked]);
        // 5 locked + 2 free teams of exactly 2
        assert!(options.validate(9).is_ok());
        assert!(options.validate(10).is_err());
    }

    #[test]
    fn test_oversized_unlocked_initial_team() {
        let options = TeamGenerationOptions::new(3, 3, 2).with_initial_teams(vec![
            InitialTeam::new(TeamShell::new(0)).with_students(vec![1, 2, 3, 4]),
        ]);
        assert_eq!(
            options.validate(6).unwrap_err(),
            ConfigError::OversizedInitialTeam { team: 0, size: 4, max: 3 }
        );
    }

    #[test]
    fn test_oversized_locked_team_allowed() {
        let options = TeamGenerationOptions::new(2, 2, 2).with_initial_teams(vec![
            InitialTeam::new(TeamShell::new(0).locked()).with_students(vec![1, 2, 3]),
        ]);
        assert!(options.validate(5).is_ok());
    }

    #[test]
    fn test_duplicate_team_id() {
        let options = TeamGenerationOptions::new(2, 2, 3).with_initial_teams(vec![
            InitialTeam::new(TeamShell::new(3)),
            InitialTeam::new(TeamShell::new(3).with_name("again")),
        ]);
        assert_eq!(options.validate(6).unwrap_err(), ConfigError::DuplicateTeam(3));
    }

    #[test]
    fn test_team_slots_fresh_ids() {
        let options = TeamGenerationOptions::new(1, 4, 3)
            .with_initial_teams(vec![InitialTeam::new(TeamShell::new(4).with_project(7))]);
        let slots = options.team_slots();
        let ids: Vec<TeamId> = slots.iter().map(|t| t.shell.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(slots[0].shell.project_id, Some(7));
    }
}
