//! Department domain model.
//!
//! Departments form a tree via `parent_id`. Cycle rejection happens in
//! the engine validator before the `set_parent` write intent runs; the
//! store never sees a self-referencing chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    /// Unique short code (e.g. `ENG`).
    pub code: String,
    pub parent_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    pub code: String,
    pub parent_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub manager_id: Option<Option<Uuid>>,
}
