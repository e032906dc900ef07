//! Team shells: the fixed, membership-free description of each team.

use super::{AttributeId, AttributeValue, ProjectId, Student, TeamId};

/// Comparison applied by a [`Requirement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequirementOperator {
    LessThan,
    MoreThan,
    Exactly,
}

impl RequirementOperator {
    pub fn holds(self, actual: AttributeValue, threshold: AttributeValue) -> bool {
        match self {
            RequirementOperator::LessThan => actual < threshold,
            RequirementOperator::MoreThan => actual > threshold,
            RequirementOperator::Exactly => actual == threshold,
        }
    }
}

/// A project requirement on one attribute, e.g. "skill level more than 2".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirement {
    pub attribute: AttributeId,
    pub operator: RequirementOperator,
    pub value: AttributeValue,
}

impl Requirement {
    pub fn new(attribute: AttributeId, operator: RequirementOperator, value: AttributeValue) -> Self {
        Self {
            attribute,
            operator,
            value,
        }
    }

    /// A student meets the requirement if any of its values for the attribute does.
    pub fn is_met_by(&self, student: &Student) -> bool {
        student
            .attribute_values(self.attribute)
            .iter()
            .any(|&v| self.operator.holds(v, self.value))
    }
}

/// Identity, project and requirements of one team.
///
/// Shells are created once per run and shared read-only between every
/// candidate partition; only the member list varies between candidates.
/// A locked shell's members are never moved by any operator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamShell {
    pub id: TeamId,
    pub name: Option<String>,
    pub project_id: Option<ProjectId>,
    pub requirements: Vec<Requirement>,
    pub is_locked: bool,
}

impl TeamShell {
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        assert!(RequirementOperator::LessThan.holds(1, 2));
        assert!(!RequirementOperator::LessThan.holds(2, 2));
        assert!(RequirementOperator::MoreThan.holds(3, 2));
        assert!(RequirementOperator::Exactly.holds(2, 2));
        assert!(!RequirementOperator::Exactly.holds(1, 2));
    }

    #[test]
    fn test_requirement_any_value() {
        let req = Requirement::new(1, RequirementOperator::MoreThan, 4);
        let s = Student::new(1).with_attribute(1, vec![2, 5]);
        assert!(req.is_met_by(&s));
        assert!(!req.is_met_by(&Student::new(2).with_attribute(1, vec![4])));
        assert!(!req.is_met_by(&Student::new(3)));
    }
}
