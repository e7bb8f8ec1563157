//! Team domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamType {
    /// Time-boxed delivery team, department-bound when a department is
    /// set.
    Project,
    /// Standing department-bound team.
    Permanent,
    /// Exempt from department scoping; any active user is eligible.
    CrossFunctional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamStatus {
    Active,
    Inactive,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// Unique short code (e.g. `PLT-CORE`).
    pub code: String,
    pub team_type: TeamType,
    pub department_id: Option<Uuid>,
    /// Must reference a current membership when set; lead members
    /// cannot be removed until leadership is cleared or reassigned.
    pub team_lead_id: Option<Uuid>,
    /// `None` means unbounded.
    pub max_members: Option<u32>,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// The department membership is restricted to, if any.
    ///
    /// Cross-functional teams are never scoped, even when they carry a
    /// home department.
    pub fn scope_department(&self) -> Option<Uuid> {
        match self.team_type {
            TeamType::CrossFunctional => None,
            TeamType::Project | TeamType::Permanent => self.department_id,
        }
    }

    pub fn is_scoped(&self) -> bool {
        self.scope_department().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub code: String,
    pub team_type: TeamType,
    pub department_id: Option<Uuid>,
    pub max_members: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub status: Option<TeamStatus>,
    /// `Some(Some(n))` = set, `Some(None)` = unbounded, `None` = no change.
    pub max_members: Option<Option<u32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(team_type: TeamType, department_id: Option<Uuid>) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Platform".into(),
            code: "PLT".into(),
            team_type,
            department_id,
            team_lead_id: None,
            max_members: None,
            status: TeamStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn department_bound_teams_are_scoped() {
        let dept = Uuid::new_v4();
        assert_eq!(
            team(TeamType::Project, Some(dept)).scope_department(),
            Some(dept)
        );
        assert_eq!(
            team(TeamType::Permanent, Some(dept)).scope_department(),
            Some(dept)
        );
    }

    #[test]
    fn cross_functional_teams_are_never_scoped() {
        let dept = Uuid::new_v4();
        assert_eq!(
            team(TeamType::CrossFunctional, Some(dept)).scope_department(),
            None
        );
    }

    #[test]
    fn departmentless_teams_are_unscoped() {
        assert!(!team(TeamType::Project, None).is_scoped());
    }
}
