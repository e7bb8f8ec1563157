//! Repository trait definitions — the read ports and write intents the
//! engine is built against.
//!
//! All operations are async. Implementations persist what the engine
//! has already validated; they do not re-derive engine invariants
//! (with the exception of data-shape checks such as salary bounds,
//! which are enforced at the model level).

use uuid::Uuid;

use crate::error::OrgdirResult;
use crate::models::{
    department::{CreateDepartment, Department, UpdateDepartment},
    membership::TeamMembership,
    position::{CreatePosition, Position, UpdatePosition},
    role::{CreateRole, Role, UpdateRole},
    team::{CreateTeam, Team, UpdateTeam},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = OrgdirResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgdirResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = OrgdirResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = OrgdirResult<User>> + Send;
    /// Soft-delete: clears `is_active`.
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgdirResult<()>> + Send;
    /// Reactivate a soft-deleted user.
    fn restore(&self, id: Uuid) -> impl Future<Output = OrgdirResult<User>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgdirResult<PaginatedResult<User>>> + Send;
    /// Active users of one department.
    fn list_by_department(
        &self,
        department_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<Vec<User>>> + Send;
    /// All active users.
    fn list_active(&self) -> impl Future<Output = OrgdirResult<Vec<User>>> + Send;

    /// Write intent: set the (department, position) pair in one
    /// operation. `(None, None)` is the cascading unassign — the store
    /// must never observe a position without its department.
    fn set_assignment(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
        position_id: Option<Uuid>,
    ) -> impl Future<Output = OrgdirResult<User>> + Send;
}

pub trait DepartmentRepository: Send + Sync {
    fn create(
        &self,
        input: CreateDepartment,
    ) -> impl Future<Output = OrgdirResult<Department>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Department>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = OrgdirResult<Department>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateDepartment,
    ) -> impl Future<Output = OrgdirResult<Department>> + Send;
    /// Soft-delete: clears `is_active`.
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgdirResult<()>> + Send;
    fn restore(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Department>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgdirResult<PaginatedResult<Department>>> + Send;

    /// Write intent: re-parent the department. The engine has already
    /// run the cycle guard.
    fn set_parent(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> impl Future<Output = OrgdirResult<Department>> + Send;

    /// All ancestors of a department, nearest first, walking up the
    /// tree (depth-capped by the implementation).
    fn get_ancestors(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Vec<Department>>> + Send;
}

pub trait PositionRepository: Send + Sync {
    fn create(&self, input: CreatePosition) -> impl Future<Output = OrgdirResult<Position>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Position>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdatePosition,
    ) -> impl Future<Output = OrgdirResult<Position>> + Send;
    /// Soft-delete: clears `is_active`.
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgdirResult<()>> + Send;
    fn restore(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Position>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgdirResult<PaginatedResult<Position>>> + Send;
    fn list_by_department(
        &self,
        department_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<Vec<Position>>> + Send;
}

pub trait TeamRepository: Send + Sync {
    fn create(&self, input: CreateTeam) -> impl Future<Output = OrgdirResult<Team>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Team>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = OrgdirResult<Team>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTeam,
    ) -> impl Future<Output = OrgdirResult<Team>> + Send;
    /// Soft-delete: sets status to Inactive.
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgdirResult<()>> + Send;
    /// Sets status back to Active. Invariant re-validation happens in
    /// the engine before this intent runs.
    fn restore(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Team>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgdirResult<PaginatedResult<Team>>> + Send;

    /// Write intent: set or clear the team lead.
    fn set_lead(
        &self,
        id: Uuid,
        lead_id: Option<Uuid>,
    ) -> impl Future<Output = OrgdirResult<Team>> + Send;

    /// Write intent: create a membership with `joined_at = now`.
    fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> impl Future<Output = OrgdirResult<TeamMembership>> + Send;
    fn update_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> impl Future<Output = OrgdirResult<TeamMembership>> + Send;
    fn remove_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<()>> + Send;
    /// Current memberships of a team, oldest first.
    fn get_members(
        &self,
        team_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<Vec<TeamMembership>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = OrgdirResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgdirResult<Role>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = OrgdirResult<Role>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgdirResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgdirResult<PaginatedResult<Role>>> + Send;

    /// Grant a role to a user (creates a `has_role` edge).
    fn assign_to_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<()>> + Send;
    /// Revoke a role grant from a user.
    fn unassign_from_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = OrgdirResult<()>> + Send;
    /// All roles currently granted to a user.
    fn get_user_roles(&self, user_id: Uuid) -> impl Future<Output = OrgdirResult<Vec<Role>>> + Send;
}
