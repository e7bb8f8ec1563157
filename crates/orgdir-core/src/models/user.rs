//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Soft-delete flag. Inactive users stay in the directory and can
    /// be restored; they are never eligible for new assignments.
    pub is_active: bool,
    pub department_id: Option<Uuid>,
    /// Invariant: when set together with `department_id`, the
    /// position's department (if any) must match it.
    pub position_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
}

/// Profile fields only. Department/position changes go through the
/// `set_assignment` write intent so the pair moves atomically.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}
