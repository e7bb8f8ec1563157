//! Team membership management — the `NONE → MEMBER → NONE` state
//! machine, lead protection, eligibility, and restore re-validation.

use orgdir_core::error::OrgdirResult;
use orgdir_core::models::membership::TeamMembership;
use orgdir_core::models::team::Team;
use orgdir_core::models::user::User;
use orgdir_core::repository::{TeamRepository, UserRepository};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::EngineError;
use crate::validator;

/// Team membership manager.
///
/// Generic over repository implementations so the engine has no
/// dependency on the database crate.
pub struct MembershipService<T, U> {
    team_repo: T,
    user_repo: U,
}

impl<T, U> MembershipService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    pub fn new(team_repo: T, user_repo: U) -> Self {
        Self {
            team_repo,
            user_repo,
        }
    }

    /// Add a user to a team.
    ///
    /// Runs the full candidate check (duplicate, active status,
    /// department scope, capacity) and fails without mutating.
    pub async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> OrgdirResult<TeamMembership> {
        let team = self.team_repo.get_by_id(team_id).await?;
        let user = self.user_repo.get_by_id(user_id).await?;
        let members = self.team_repo.get_members(team_id).await?;

        validator::check_team_candidate(&team, &user, &members)?;

        debug!(team = %team.code, user_id = %user_id, "adding team member");
        self.team_repo.add_member(team_id, user_id, role_in_team).await
    }

    /// Change an existing member's role within the team.
    ///
    /// No capacity or scope re-check: the membership already exists.
    pub async fn update_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> OrgdirResult<TeamMembership> {
        self.team_repo.get_by_id(team_id).await?;
        let members = self.team_repo.get_members(team_id).await?;
        if !members.iter().any(|m| m.user_id == user_id) {
            return Err(EngineError::NotAMember { team_id, user_id }.into());
        }
        self.team_repo
            .update_member_role(team_id, user_id, role_in_team)
            .await
    }

    /// Remove a member, refusing to remove the current team lead.
    pub async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> OrgdirResult<()> {
        let team = self.team_repo.get_by_id(team_id).await?;
        let members = self.team_repo.get_members(team_id).await?;
        if !members.iter().any(|m| m.user_id == user_id) {
            return Err(EngineError::NotAMember { team_id, user_id }.into());
        }

        validator::check_member_removal(&team, user_id)?;

        debug!(team = %team.code, user_id = %user_id, "removing team member");
        self.team_repo.remove_member(team_id, user_id).await
    }

    /// Set or clear the team lead. `Some(lead)` must name a current
    /// member.
    pub async fn set_team_lead(&self, team_id: Uuid, lead_id: Option<Uuid>) -> OrgdirResult<Team> {
        self.team_repo.get_by_id(team_id).await?;
        if let Some(lead) = lead_id {
            let members = self.team_repo.get_members(team_id).await?;
            if !members.iter().any(|m| m.user_id == lead) {
                return Err(EngineError::NotAMember {
                    team_id,
                    user_id: lead,
                }
                .into());
            }
        }
        self.team_repo.set_lead(team_id, lead_id).await
    }

    /// Users who may legally be added to the team right now.
    ///
    /// The single source of the scoping rule: scoped teams draw from
    /// their department's active users, everything else from all
    /// active users; current members are excluded either way.
    pub async fn eligible_users(&self, team_id: Uuid) -> OrgdirResult<Vec<User>> {
        let team = self.team_repo.get_by_id(team_id).await?;
        let members = self.team_repo.get_members(team_id).await?;
        let candidates = match team.scope_department() {
            Some(department_id) => self.user_repo.list_by_department(department_id).await?,
            None => self.user_repo.list_active().await?,
        };
        Ok(validator::eligible_users(&team, &candidates, &members))
    }

    /// Restore a soft-deleted team, re-checking the invariants its
    /// stored membership must still satisfy (capacity may have been
    /// tightened and members may have changed department while the
    /// team was inactive).
    pub async fn restore_team(&self, team_id: Uuid) -> OrgdirResult<Team> {
        let team = self.team_repo.get_by_id(team_id).await?;
        let members = self.team_repo.get_members(team_id).await?;

        if let Some(max) = team.max_members {
            if members.len() as u32 > max {
                return Err(EngineError::CapacityExceeded {
                    team_id,
                    limit: max,
                }
                .into());
            }
        }
        if let Some(scope) = team.scope_department() {
            for member in &members {
                let user = self.user_repo.get_by_id(member.user_id).await?;
                if user.department_id != Some(scope) {
                    return Err(EngineError::ScopeMismatch {
                        message: format!(
                            "member {} left department {scope}; restore would violate team scope",
                            user.id
                        ),
                    }
                    .into());
                }
            }
        }

        info!(team = %team.code, "restoring team");
        self.team_repo.restore(team_id).await
    }
}
