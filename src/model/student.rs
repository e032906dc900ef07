//! Students and the lookup the optimizer resolves ids through.

use super::{AttributeId, AttributeValue, ProjectId, StudentId};
use crate::error::{ConfigError, Result, TeamFormError};
use std::collections::HashMap;

/// How one student feels about another.
///
/// The numeric encoding is inverted from intuition: affinity is negative,
/// conflict is positive. Social scoring relies on this sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relationship {
    Friend,
    Neutral,
    Enemy,
}

impl Relationship {
    /// Signed strength stored on the student.
    pub const fn strength(self) -> f64 {
        match self {
            Relationship::Friend => -1.0,
            Relationship::Neutral => 0.0,
            Relationship::Enemy => 1.0,
        }
    }
}

/// A student to be placed in exactly one team.
///
/// # Examples
///
/// ```
/// use u_teamform::model::{Relationship, Student};
///
/// let s = Student::new(7)
///     .with_attribute(1, vec![3])
///     .with_relationship(8, Relationship::Friend)
///     .with_preferences(vec![100, 101]);
///
/// assert_eq!(s.attribute_values(1), &[3]);
/// assert_eq!(s.relationship_to(8), -1.0);
/// assert_eq!(s.preference_rank(101), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Student {
    pub id: StudentId,

    /// Attribute id to the student's values for it. A student may hold
    /// several values for the same attribute.
    pub attributes: HashMap<AttributeId, Vec<AttributeValue>>,

    /// Other student id to signed relationship strength
    /// (negative = friend, positive = enemy).
    pub relationships: HashMap<StudentId, f64>,

    /// Preferred project ids, most preferred first.
    pub preferences: Vec<ProjectId>,
}

impl Student {
    pub fn new(id: StudentId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeId, values: Vec<AttributeValue>) -> Self {
        self.attributes.insert(attribute, values);
        self
    }

    pub fn with_relationship(self, other: StudentId, relationship: Relationship) -> Self {
        self.with_relationship_strength(other, relationship.strength())
    }

    pub fn with_relationship_strength(mut self, other: StudentId, strength: f64) -> Self {
        self.relationships.insert(other, strength);
        self
    }

    pub fn with_preferences(mut self, preferences: Vec<ProjectId>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Values held for `attribute`, empty if the student has none.
    pub fn attribute_values(&self, attribute: AttributeId) -> &[AttributeValue] {
        self.attributes
            .get(&attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_value(&self, attribute: AttributeId, value: AttributeValue) -> bool {
        self.attribute_values(attribute).contains(&value)
    }

    /// Relationship strength toward `other`; neutral when unspecified.
    pub fn relationship_to(&self, other: StudentId) -> f64 {
        self.relationships
            .get(&other)
            .copied()
            .unwrap_or(Relationship::Neutral.strength())
    }

    /// Zero-based position of `project` in the preference list.
    pub fn preference_rank(&self, project: ProjectId) -> Option<usize> {
        self.preferences.iter().position(|&p| p == project)
    }
}

/// Read-only id → student lookup shared by the whole run.
#[derive(Debug, Clone, Default)]
pub struct StudentIndex {
    students: HashMap<StudentId, Student>,
}

impl StudentIndex {
    /// Builds the index, rejecting duplicate ids.
    pub fn new(students: Vec<Student>) -> std::result::Result<Self, ConfigError> {
        let mut map = HashMap::with_capacity(students.len());
        for student in students {
            let id = student.id;
            if map.insert(id, student).is_some() {
                return Err(ConfigError::DuplicateStudent(id));
            }
        }
        Ok(Self { students: map })
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.students.contains_key(&id)
    }

    pub fn get(&self, id: StudentId) -> Result<&Student> {
        self.students
            .get(&id)
            .ok_or(TeamFormError::UnknownStudent(id))
    }

    /// Resolves a list of ids, failing on the first unknown one.
    pub fn resolve(&self, ids: &[StudentId]) -> Result<Vec<&Student>> {
        ids.iter().map(|&id| self.get(id)).collect()
    }

    /// All student ids in ascending order.
    pub fn ids(&self) -> Vec<StudentId> {
        let mut ids: Vec<StudentId> = self.students.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
