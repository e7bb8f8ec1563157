//! ORGDIR Database — SurrealDB connection management and repository
//! implementations for the `orgdir-core` traits.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - One repository per directory entity

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::{
    SurrealDepartmentRepository, SurrealPositionRepository, SurrealRoleRepository,
    SurrealTeamRepository, SurrealUserRepository,
};
pub use schema::{run_migrations, schema_v1};
