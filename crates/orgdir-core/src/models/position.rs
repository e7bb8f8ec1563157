//! Position domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OrgdirError, OrgdirResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,
    pub name: String,
    /// Unique short code (e.g. `SWE-2`).
    pub code: String,
    /// `None` means the position is unscoped and may be held by any
    /// user regardless of department.
    pub department_id: Option<Uuid>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePosition {
    pub name: String,
    pub code: String,
    pub department_id: Option<Uuid>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

impl CreatePosition {
    pub fn validate(&self) -> OrgdirResult<()> {
        validate_salary_bounds(self.min_salary, self.max_salary)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePosition {
    pub name: Option<String>,
    /// `Some(Some(v))` = set, `Some(None)` = clear, `None` = no change.
    pub min_salary: Option<Option<i64>>,
    pub max_salary: Option<Option<i64>>,
}

/// Salary bounds must satisfy `min <= max` when both are present.
pub fn validate_salary_bounds(min: Option<i64>, max: Option<i64>) -> OrgdirResult<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(OrgdirError::Validation {
                message: format!("min salary {min} exceeds max salary {max}"),
            });
        }
    }
    Ok(())
}
