//! Pure precondition guards for assignment and membership mutations.
//!
//! Every guard is stateless over the snapshots it is handed, so each
//! can be unit-tested with literal fixtures and shared between the
//! bulk coordinator and the membership manager. Guards return the
//! first violated invariant.

use orgdir_core::models::membership::TeamMembership;
use orgdir_core::models::position::Position;
use orgdir_core::models::team::Team;
use orgdir_core::models::user::User;
use uuid::Uuid;

use crate::error::EngineError;

/// Guard for re-parenting a department.
///
/// `parent_ancestors` is the proposed parent's ancestor chain (the
/// parent itself excluded). Self-parenting and any chain that already
/// contains the department are cycles.
pub fn check_department_parent(
    department_id: Uuid,
    new_parent_id: Option<Uuid>,
    parent_ancestors: &[Uuid],
) -> Result<(), EngineError> {
    let Some(parent_id) = new_parent_id else {
        return Ok(());
    };
    if parent_id == department_id {
        return Err(EngineError::Cycle {
            message: format!("department {department_id} cannot be its own parent"),
        });
    }
    if parent_ancestors.contains(&department_id) {
        return Err(EngineError::Cycle {
            message: format!(
                "department {department_id} is an ancestor of proposed parent {parent_id}"
            ),
        });
    }
    Ok(())
}

/// Guard for binding a user to a department, with the position the
/// user would end up holding (target position, or the retained current
/// one).
pub fn check_assignment(
    user: &User,
    department_id: Uuid,
    position: Option<&Position>,
) -> Result<(), EngineError> {
    if !user.is_active {
        return Err(EngineError::InactiveUser { user_id: user.id });
    }
    if let Some(position) = position {
        if let Some(position_dept) = position.department_id {
            if position_dept != department_id {
                return Err(EngineError::ScopeMismatch {
                    message: format!(
                        "position {} is scoped to department {position_dept}, not {department_id}",
                        position.code
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Guard for adding `user` to `team`, given the team's current
/// memberships. Checks duplicate membership, active status, department
/// scope, then capacity.
pub fn check_team_candidate(
    team: &Team,
    user: &User,
    members: &[TeamMembership],
) -> Result<(), EngineError> {
    if members.iter().any(|m| m.user_id == user.id) {
        return Err(EngineError::DuplicateMembership {
            team_id: team.id,
            user_id: user.id,
        });
    }
    if !user.is_active {
        return Err(EngineError::InactiveUser { user_id: user.id });
    }
    if let Some(scope) = team.scope_department() {
        if user.department_id != Some(scope) {
            return Err(EngineError::ScopeMismatch {
                message: format!(
                    "team {} is scoped to department {scope}; user {} is not in it",
                    team.code, user.id
                ),
            });
        }
    }
    if let Some(max) = team.max_members {
        if members.len() as u32 >= max {
            return Err(EngineError::CapacityExceeded {
                team_id: team.id,
                limit: max,
            });
        }
    }
    Ok(())
}

/// Guard for removing a member: the current lead must be cleared or
/// reassigned first.
pub fn check_member_removal(team: &Team, user_id: Uuid) -> Result<(), EngineError> {
    if team.team_lead_id == Some(user_id) {
        return Err(EngineError::LeadRemoval {
            team_id: team.id,
            user_id,
        });
    }
    Ok(())
}

/// Users who may legally be added to `team` right now: active, not
/// already members, and inside the team's department when the team is
/// scoped.
pub fn eligible_users(team: &Team, users: &[User], members: &[TeamMembership]) -> Vec<User> {
    let scope = team.scope_department();
    users
        .iter()
        .filter(|user| user.is_active)
        .filter(|user| !members.iter().any(|m| m.user_id == user.id))
        .filter(|user| match scope {
            Some(dept) => user.department_id == Some(dept),
            None => true,
        })
        .cloned()
        .collect()
}
