//! SurrealDB implementation of [`DepartmentRepository`].

use chrono::{DateTime, Utc};
use orgdir_core::error::OrgdirResult;
use orgdir_core::models::department::{CreateDepartment, Department, UpdateDepartment};
use orgdir_core::repository::{DepartmentRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct DepartmentRow {
    name: String,
    code: String,
    parent_id: Option<String>,
    manager_id: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct DepartmentRowWithId {
    record_id: String,
    name: String,
    code: String,
    parent_id: Option<String>,
    manager_id: Option<String>,
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

impl DepartmentRow {
    fn into_department(self, id: Uuid) -> Result<Department, DbError> {
        Ok(Department {
            id,
            name: self.name,
            code: self.code,
            parent_id: parse_opt_uuid(self.parent_id, "parent")?,
            manager_id: parse_opt_uuid(self.manager_id, "manager")?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DepartmentRowWithId {
    fn try_into_department(self) -> Result<Department, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        Ok(Department {
            id,
            name: self.name,
            code: self.code,
            parent_id: parse_opt_uuid(self.parent_id, "parent")?,
            manager_id: parse_opt_uuid(self.manager_id, "manager")?,
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

/// Maximum depth for ancestor traversal to prevent infinite loops.
const MAX_ANCESTOR_DEPTH: usize = 50;

/// SurrealDB implementation of the Department repository.
#[derive(Clone)]
pub struct SurrealDepartmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDepartmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DepartmentRepository for SurrealDepartmentRepository<C> {
    async fn create(&self, input: CreateDepartment) -> OrgdirResult<Department> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('department', $id) SET \
                 name = $name, code = $code, \
                 parent_id = $parent_id, \
                 manager_id = $manager_id, \
                 is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("parent_id", input.parent_id.map(|p| p.to_string())))
            .bind(("manager_id", input.manager_id.map(|m| m.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: id_str,
        })?;

        Ok(row.into_department(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgdirResult<Department> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('department', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: id_str,
        })?;

        Ok(row.into_department(id)?)
    }

    async fn get_by_code(&self, code: &str) -> OrgdirResult<Department> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM department \
                 WHERE code = $code",
            )
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DepartmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: format!("code={code}"),
        })?;

        Ok(row.try_into_department()?)
    }

    async fn update(&self, id: Uuid, input: UpdateDepartment) -> OrgdirResult<Department> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.manager_id.is_some() {
            sets.push("manager_id = $manager_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('department', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(manager_id) = input.manager_id {
            // manager_id is Option<Option<Uuid>>: Some(Some(v)) = set,
            // Some(None) = clear.
            builder = builder.bind(("manager_id", manager_id.map(|m| m.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: id_str,
        })?;

        Ok(row.into_department(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgdirResult<()> {
        // Soft-delete: clear the active flag.
        self.db
            .query(
                "UPDATE type::record('department', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn restore(&self, id: Uuid) -> OrgdirResult<Department> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('department', $id) SET \
                 is_active = true, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: id_str,
        })?;

        Ok(row.into_department(id)?)
    }

    async fn list(&self, pagination: Pagination) -> OrgdirResult<PaginatedResult<Department>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM department GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM department \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DepartmentRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_department())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn set_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> OrgdirResult<Department> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('department', $id) SET \
                 parent_id = $parent_id, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("parent_id", parent_id.map(|p| p.to_string())))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "department".into(),
            id: id_str,
        })?;

        Ok(row.into_department(id)?)
    }

    async fn get_ancestors(&self, id: Uuid) -> OrgdirResult<Vec<Department>> {
        let mut ancestors = Vec::new();
        let mut current_id = id;

        for _ in 0..MAX_ANCESTOR_DEPTH {
            let current_str = current_id.to_string();

            let mut result = self
                .db
                .query("SELECT * FROM type::record('department', $id)")
                .bind(("id", current_str))
                .await
                .map_err(DbError::from)?;

            let rows: Vec<DepartmentRow> = result.take(0).map_err(DbError::from)?;
            let row = match rows.into_iter().next() {
                Some(r) => r,
                None => break,
            };

            let parent_id_str = row.parent_id.clone();
            let department = row.into_department(current_id)?;

            // Don't include the starting department itself; only ancestors.
            if current_id != id {
                ancestors.push(department);
            }

            match parent_id_str {
                Some(pid) => {
                    current_id = Uuid::parse_str(&pid)
                        .map_err(|e| DbError::Data(format!("invalid parent UUID: {e}")))?;
                }
                None => break,
            }
        }

        Ok(ancestors)
    }
}
