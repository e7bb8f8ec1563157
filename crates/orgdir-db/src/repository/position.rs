//! SurrealDB implementation of [`PositionRepository`].
//!
//! Salary bounds are validated before any write: `create` checks the
//! input directly, `update` checks the bounds the row would end up
//! with after the merge.

use chrono::{DateTime, Utc};
use orgdir_core::error::OrgdirResult;
use orgdir_core::models::position::{
    CreatePosition, Position, UpdatePosition, validate_salary_bounds,
};
use orgdir_core::repository::{PaginatedResult, Pagination, PositionRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PositionRow {
    name: String,
    code: String,
    department_id: Option<String>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PositionRowWithId {
    record_id: String,
    name: String,
    code: String,
    department_id: Option<String>,
    min_salary: Option<i64>,
    max_salary: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_opt_uuid(value: Option<String>, field: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| Uuid::parse_str(&v))
        .transpose()
        .map_err(|e| DbError::Data(format!("invalid {field} UUID: {e}")))
}

impl PositionRow {
    fn into_position(self, id: Uuid) -> Result<Position, DbError> {
        Ok(Position {
            id,
            name: self.name,
            code: self.code,
            department_id: parse_opt_uuid(self.department_id, "department")?,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PositionRowWithId {
    fn try_into_position(self) -> Result<Position, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        Ok(Position {
            id,
            name: self.name,
            code: self.code,
            department_id: parse_opt_uuid(self.department_id, "department")?,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Position repository.
#[derive(Clone)]
pub struct SurrealPositionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPositionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PositionRepository for SurrealPositionRepository<C> {
    async fn create(&self, input: CreatePosition) -> OrgdirResult<Position> {
        input.validate()?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('position', $id) SET \
                 name = $name, code = $code, \
                 department_id = $department_id, \
                 min_salary = $min_salary, \
                 max_salary = $max_salary, \
                 is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("department_id", input.department_id.map(|d| d.to_string())))
            .bind(("min_salary", input.min_salary))
            .bind(("max_salary", input.max_salary))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PositionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "position".into(),
            id: id_str,
        })?;

        Ok(row.into_position(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgdirResult<Position> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('position', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PositionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "position".into(),
            id: id_str,
        })?;

        Ok(row.into_position(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdatePosition) -> OrgdirResult<Position> {
        let id_str = id.to_string();

        // Validate the bounds the row would hold after the merge.
        let current = self.get_by_id(id).await?;
        let merged_min = match input.min_salary {
            Some(v) => v,
            None => current.min_salary,
        };
        let merged_max = match input.max_salary {
            Some(v) => v,
            None => current.max_salary,
        };
        validate_salary_bounds(merged_min, merged_max)?;

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.min_salary.is_some() {
            sets.push("min_salary = $min_salary");
        }
        if input.max_salary.is_some() {
            sets.push("max_salary = $max_salary");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('position', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(min_salary) = input.min_salary {
            // min_salary is Option<Option<i64>>: Some(Some(v)) = set,
            // Some(None) = clear.
            builder = builder.bind(("min_salary", min_salary));
        }
        if let Some(max_salary) = input.max_salary {
            builder = builder.bind(("max_salary", max_salary));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PositionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "position".into(),
            id: id_str,
        })?;

        Ok(row.into_position(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgdirResult<()> {
        // Soft-delete: clear the active flag.
        self.db
            .query(
                "UPDATE type::record('position', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn restore(&self, id: Uuid) -> OrgdirResult<Position> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('position', $id) SET \
                 is_active = true, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PositionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "position".into(),
            id: id_str,
        })?;

        Ok(row.into_position(id)?)
    }

    async fn list(&self, pagination: Pagination) -> OrgdirResult<PaginatedResult<Position>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM position GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM position \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PositionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_position())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_department(&self, department_id: Uuid) -> OrgdirResult<Vec<Position>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM position \
                 WHERE department_id = $department_id \
                 ORDER BY created_at ASC",
            )
            .bind(("department_id", department_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PositionRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_position())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
