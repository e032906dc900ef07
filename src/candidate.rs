//! Candidate partitions explored by the search.
//!
//! A [`PriorityTeam`] pairs a shared, read-only [`TeamShell`] handle with
//! an owned member list. A [`PriorityTeamSet`] is one complete assignment
//! plus its cached score. Cloning a set deep-copies every member list
//! while the shells stay shared, so sibling candidates never alias.
//!
//! Mutable access goes through [`PriorityTeamSet::team_mut`] and
//! [`PriorityTeamSet::teams_mut`], which clear the cached score. The shell
//! itself is never handed out mutably.

use crate::error::Result;
use crate::model::{StudentId, TeamShell};
use crate::scoring::{Score, Scorer};
use std::sync::Arc;

/// One team inside a candidate partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTeam {
    shell: Arc<TeamShell>,
    pub student_ids: Vec<StudentId>,
}

impl PriorityTeam {
    pub fn new(shell: Arc<TeamShell>, student_ids: Vec<StudentId>) -> Self {
        Self { shell, student_ids }
    }

    pub fn shell(&self) -> &TeamShell {
        &self.shell
    }

    /// The shared shell handle, for building output teams.
    pub fn shell_handle(&self) -> Arc<TeamShell> {
        Arc::clone(&self.shell)
    }

    pub fn is_locked(&self) -> bool {
        self.shell.is_locked
    }

    pub fn len(&self) -> usize {
        self.student_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.student_ids.is_empty()
    }
}

/// A complete candidate assignment of students to teams.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTeamSet {
    teams: Vec<PriorityTeam>,
    score: Option<Score>,
}

impl PriorityTeamSet {
    pub fn new(teams: Vec<PriorityTeam>) -> Self {
        Self { teams, score: None }
    }

    pub fn teams(&self) -> &[PriorityTeam] {
        &self.teams
    }

    pub fn team(&self, index: usize) -> &PriorityTeam {
        &self.teams[index]
    }

    /// Mutable access to one team; invalidates the cached score.
    pub fn team_mut(&mut self, index: usize) -> &mut PriorityTeam {
        self.score = None;
        &mut self.teams[index]
    }

    /// Mutable access to every team; invalidates the cached score.
    pub fn teams_mut(&mut self) -> &mut [PriorityTeam] {
        self.score = None;
        &mut self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Indices of the teams operators may touch.
    pub fn unlocked_indices(&self) -> Vec<usize> {
        self.teams
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_locked())
            .map(|(i, _)| i)
            .collect()
    }

    /// The cached score, `None` until computed or after a mutation.
    pub fn cached_score(&self) -> Option<Score> {
        self.score
    }

    /// Returns the cached score or computes and caches it.
    pub fn calculate_score(&mut self, scorer: &Scorer<'_>) -> Result<Score> {
        if let Some(score) = self.score {
            return Ok(score);
        }
        let score = scorer.team_set_score(self)?;
        self.score = Some(score);
        Ok(score)
    }

    /// Every assigned student id, sorted.
    pub fn student_ids(&self) -> Vec<StudentId> {
        let mut ids: Vec<StudentId> = self
            .teams
            .iter()
            .flat_map(|t| t.student_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids
    }
}
