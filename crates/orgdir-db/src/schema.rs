//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Departments (tree via parent_id; the engine rejects cycles before
-- set_parent runs)
-- =======================================================================
DEFINE TABLE department SCHEMAFULL;
DEFINE FIELD name ON TABLE department TYPE string;
DEFINE FIELD code ON TABLE department TYPE string;
DEFINE FIELD parent_id ON TABLE department TYPE option<string>;
DEFINE FIELD manager_id ON TABLE department TYPE option<string>;
DEFINE FIELD is_active ON TABLE department TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE department TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE department TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_department_code ON TABLE department \
    COLUMNS code UNIQUE;

-- =======================================================================
-- Positions (optionally scoped to one department)
-- =======================================================================
DEFINE TABLE position SCHEMAFULL;
DEFINE FIELD name ON TABLE position TYPE string;
DEFINE FIELD code ON TABLE position TYPE string;
DEFINE FIELD department_id ON TABLE position TYPE option<string>;
DEFINE FIELD min_salary ON TABLE position TYPE option<int>;
DEFINE FIELD max_salary ON TABLE position TYPE option<int>;
DEFINE FIELD is_active ON TABLE position TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE position TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE position TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_position_code ON TABLE position \
    COLUMNS code UNIQUE;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD is_active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD department_id ON TABLE user TYPE option<string>;
DEFINE FIELD position_id ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Teams
-- =======================================================================
DEFINE TABLE team SCHEMAFULL;
DEFINE FIELD name ON TABLE team TYPE string;
DEFINE FIELD code ON TABLE team TYPE string;
DEFINE FIELD team_type ON TABLE team TYPE string \
    ASSERT $value IN ['Project', 'Permanent', 'CrossFunctional'];
DEFINE FIELD department_id ON TABLE team TYPE option<string>;
DEFINE FIELD team_lead_id ON TABLE team TYPE option<string>;
DEFINE FIELD max_members ON TABLE team TYPE option<int>;
DEFINE FIELD status ON TABLE team TYPE string \
    ASSERT $value IN ['Active', 'Inactive', 'Completed', 'OnHold'];
DEFINE FIELD created_at ON TABLE team TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE team TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_team_code ON TABLE team COLUMNS code UNIQUE;

-- =======================================================================
-- Team memberships (one row per (team, user) pair)
-- =======================================================================
DEFINE TABLE team_membership SCHEMAFULL;
DEFINE FIELD team_id ON TABLE team_membership TYPE string;
DEFINE FIELD user_id ON TABLE team_membership TYPE string;
DEFINE FIELD role_in_team ON TABLE team_membership TYPE option<string>;
DEFINE FIELD joined_at ON TABLE team_membership TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_membership_team_user ON TABLE team_membership \
    COLUMNS team_id, user_id UNIQUE;

-- =======================================================================
-- Roles (raw permission identifier lists)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD permissions ON TABLE role TYPE array;
DEFINE FIELD permissions.* ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Role grants
DEFINE TABLE has_role TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[tokio::test]
    async fn migrations_apply_to_memory_instance() {
        let db = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        run_migrations(&db).await.unwrap();
        // Re-running is a no-op.
        run_migrations(&db).await.unwrap();
    }
}
