//! ORGDIR Server — Application entry point.
//!
//! Connects to SurrealDB, applies pending migrations, and wires the
//! engine services onto the database repositories.

use std::process;

use orgdir_db::{
    DbConfig, DbManager, SurrealDepartmentRepository, SurrealPositionRepository,
    SurrealRoleRepository, SurrealTeamRepository, SurrealUserRepository, run_migrations,
};
use orgdir_engine::{AssignmentService, EngineConfig, MembershipService, PermissionService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("orgdir=info".parse().expect("valid directive")),
        )
        .json()
        .init();

    tracing::info!("Starting ORGDIR server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to SurrealDB");
            process::exit(1);
        }
    };

    if let Err(err) = run_migrations(manager.client()).await {
        tracing::error!(error = %err, "Failed to run migrations");
        process::exit(1);
    }

    let db = manager.client().clone();
    let _assignments = AssignmentService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealDepartmentRepository::new(db.clone()),
        SurrealPositionRepository::new(db.clone()),
        EngineConfig::default(),
    );
    let _memberships = MembershipService::new(
        SurrealTeamRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
    );
    let _permissions = PermissionService::new(SurrealRoleRepository::new(db));

    tracing::info!("ORGDIR engine services ready");

    tracing::info!("ORGDIR server stopped.");
}
