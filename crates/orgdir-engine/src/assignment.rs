//! Assignment coordination — single and bulk user → (department,
//! position) bindings, plus department re-parenting.

use std::collections::BTreeMap;

use orgdir_core::error::OrgdirResult;
use orgdir_core::models::department::Department;
use orgdir_core::models::position::Position;
use orgdir_core::models::user::User;
use orgdir_core::repository::{DepartmentRepository, PositionRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::validator;

/// Input for a bulk assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAssignInput {
    pub user_ids: Vec<Uuid>,
    pub department_id: Uuid,
    pub position_id: Option<Uuid>,
    /// Free-text audit reason recorded with the operation.
    pub reason: String,
}

/// Per-item outcome report for a bulk assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAssignReport {
    pub success_count: usize,
    pub failed_count: usize,
    /// User ids applied, in input order.
    pub applied: Vec<Uuid>,
    pub errors: BTreeMap<Uuid, String>,
}

/// The three outcomes a caller renders differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Every item applied.
    Complete,
    /// Some items applied, some failed.
    Partial,
    /// No item applied.
    Failed,
}

impl BulkAssignReport {
    pub fn outcome(&self) -> BulkOutcome {
        if self.success_count == 0 {
            BulkOutcome::Failed
        } else if self.failed_count > 0 {
            BulkOutcome::Partial
        } else {
            BulkOutcome::Complete
        }
    }
}

/// Assignment coordinator.
///
/// Generic over repository implementations so the engine has no
/// dependency on the database crate.
pub struct AssignmentService<U, D, P> {
    user_repo: U,
    department_repo: D,
    position_repo: P,
    config: EngineConfig,
}

impl<U, D, P> AssignmentService<U, D, P>
where
    U: UserRepository,
    D: DepartmentRepository,
    P: PositionRepository,
{
    pub fn new(user_repo: U, department_repo: D, position_repo: P, config: EngineConfig) -> Self {
        Self {
            user_repo,
            department_repo,
            position_repo,
            config,
        }
    }

    /// Bind one user to a department and optionally a position.
    ///
    /// Fails fast with the first violated invariant, then issues a
    /// single `set_assignment` write intent.
    pub async fn assign(
        &self,
        user_id: Uuid,
        department_id: Uuid,
        position_id: Option<Uuid>,
    ) -> OrgdirResult<User> {
        let department = self.department_repo.get_by_id(department_id).await?;
        let position = match position_id {
            Some(id) => Some(self.position_repo.get_by_id(id).await?),
            None => None,
        };
        self.assign_one(user_id, department.id, position.as_ref())
            .await
    }

    /// Clear a user's department and position together.
    ///
    /// The pair is one write intent: the store never observes a
    /// department-scoped position outliving the department binding.
    pub async fn unassign(&self, user_id: Uuid, reason: &str) -> OrgdirResult<User> {
        info!(user_id = %user_id, reason, "unassigning user from department and position");
        self.user_repo.set_assignment(user_id, None, None).await
    }

    /// Execute a batch of user → (department, position) bindings.
    ///
    /// Items are evaluated independently, in input order; a failed
    /// item never aborts the rest. If the caller abandons the batch
    /// mid-flight, already-applied items stay applied. Only an empty
    /// batch, an oversized batch, or a missing target entity is
    /// rejected outright.
    pub async fn bulk_assign(&self, input: BulkAssignInput) -> OrgdirResult<BulkAssignReport> {
        if input.user_ids.is_empty() {
            return Err(EngineError::EmptyBatch.into());
        }
        if input.user_ids.len() > self.config.max_batch_size {
            return Err(EngineError::BatchTooLarge {
                limit: self.config.max_batch_size,
            }
            .into());
        }

        let department = self.department_repo.get_by_id(input.department_id).await?;
        let position = match input.position_id {
            Some(id) => Some(self.position_repo.get_by_id(id).await?),
            None => None,
        };

        info!(
            department = %department.code,
            users = input.user_ids.len(),
            reason = %input.reason,
            "starting bulk assignment"
        );

        let mut report = BulkAssignReport {
            success_count: 0,
            failed_count: 0,
            applied: Vec::new(),
            errors: BTreeMap::new(),
        };

        for user_id in input.user_ids {
            match self.assign_one(user_id, department.id, position.as_ref()).await {
                Ok(_) => {
                    report.success_count += 1;
                    report.applied.push(user_id);
                }
                Err(err) => {
                    debug!(user_id = %user_id, error = %err, "bulk assignment item failed");
                    report.failed_count += 1;
                    report.errors.insert(user_id, err.to_string());
                }
            }
        }

        info!(
            succeeded = report.success_count,
            failed = report.failed_count,
            "bulk assignment finished"
        );
        Ok(report)
    }

    /// Validate and apply one binding. When no target position is
    /// given, the user's current position is retained — and must
    /// itself fit the new department, so a dangling scoped position
    /// can never survive the move.
    async fn assign_one(
        &self,
        user_id: Uuid,
        department_id: Uuid,
        target_position: Option<&Position>,
    ) -> OrgdirResult<User> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let retained;
        let position = match target_position {
            Some(position) => Some(position),
            None => match user.position_id {
                Some(position_id) => {
                    retained = self.position_repo.get_by_id(position_id).await?;
                    Some(&retained)
                }
                None => None,
            },
        };

        validator::check_assignment(&user, department_id, position)?;
        self.user_repo
            .set_assignment(user_id, Some(department_id), position.map(|p| p.id))
            .await
    }

    /// Re-parent a department, rejecting self-parenting and cycles.
    pub async fn set_department_parent(
        &self,
        department_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> OrgdirResult<Department> {
        self.department_repo.get_by_id(department_id).await?;

        if let Some(parent) = parent_id {
            // Self-parenting is caught by the guard before the
            // ancestor walk matters.
            let ancestors = if parent == department_id {
                Vec::new()
            } else {
                self.department_repo.get_by_id(parent).await?;
                self.department_repo
                    .get_ancestors(parent)
                    .await?
                    .into_iter()
                    .map(|d| d.id)
                    .collect()
            };
            validator::check_department_parent(department_id, Some(parent), &ancestors)?;
        }

        debug!(department_id = %department_id, parent_id = ?parent_id, "re-parenting department");
        self.department_repo.set_parent(department_id, parent_id).await
    }
}
