//! Integration tests for effective-permission aggregation over the
//! role repository.

use orgdir_core::models::role::CreateRole;
use orgdir_core::models::user::CreateUser;
use orgdir_core::repository::{RoleRepository, UserRepository};
use orgdir_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use orgdir_engine::{Action, PermissionService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> (SurrealRoleRepository<Db>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgdir_db::run_migrations(&db).await.unwrap();
    (SurrealRoleRepository::new(db.clone()), db)
}

async fn role(repo: &SurrealRoleRepository<Db>, name: &str, permissions: &[&str]) -> Uuid {
    repo.create(CreateRole {
        name: name.into(),
        description: String::new(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    })
    .await
    .unwrap()
    .id
}

async fn user(db: &Surreal<Db>, email: &str) -> Uuid {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            name: email.into(),
            email: email.into(),
            department_id: None,
            position_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn matrix_merges_grants_across_roles() {
    let (repo, db) = setup().await;
    let uid = user(&db, "alice@example.com").await;

    let viewer = role(&repo, "viewer", &["view_users", "view_departments"]).await;
    let editor = role(&repo, "editor", &["edit_users", "view_users", "approve_leave_requests"]).await;
    repo.assign_to_user(uid, viewer).await.unwrap();
    repo.assign_to_user(uid, editor).await.unwrap();

    let svc = PermissionService::new(repo);
    let matrix = svc.effective_permissions_for_user(uid).await.unwrap();

    let modules: Vec<&str> = matrix.iter().map(|m| m.module.as_str()).collect();
    assert_eq!(modules, vec!["departments", "leave_requests", "users"]);

    let users = matrix.iter().find(|m| m.module == "users").unwrap();
    let cell = &users.documents[0].actions;
    assert!(cell.allows(Action::Read));
    assert!(cell.allows(Action::Write));
    assert!(!cell.allows(Action::Delete));

    let leave = matrix.iter().find(|m| m.module == "leave_requests").unwrap();
    assert!(leave.documents[0].actions.allows(Action::Submit));
}

#[tokio::test]
async fn revoking_a_role_shrinks_the_matrix() {
    let (repo, db) = setup().await;
    let uid = user(&db, "bob@example.com").await;

    let viewer = role(&repo, "viewer", &["view_users"]).await;
    let exporter = role(&repo, "exporter", &["download_reports"]).await;
    repo.assign_to_user(uid, viewer).await.unwrap();
    repo.assign_to_user(uid, exporter).await.unwrap();
    repo.unassign_from_user(uid, exporter).await.unwrap();

    let svc = PermissionService::new(repo);
    let matrix = svc.effective_permissions_for_user(uid).await.unwrap();
    assert_eq!(matrix.len(), 1);
    assert_eq!(matrix[0].module, "users");
}

#[tokio::test]
async fn user_with_no_roles_has_empty_matrix() {
    let (repo, db) = setup().await;
    let uid = user(&db, "nobody@example.com").await;

    let svc = PermissionService::new(repo);
    let matrix = svc.effective_permissions_for_user(uid).await.unwrap();
    assert!(matrix.is_empty());
}

#[tokio::test]
async fn malformed_identifiers_are_skipped_not_fatal() {
    let (repo, db) = setup().await;
    let uid = user(&db, "carol@example.com").await;

    let messy = role(&repo, "messy", &["view_users", "frobnicate_widgets", "nounderscore"]).await;
    repo.assign_to_user(uid, messy).await.unwrap();

    let svc = PermissionService::new(repo);
    let matrix = svc.effective_permissions_for_user(uid).await.unwrap();
    assert_eq!(matrix.len(), 1);
    assert_eq!(matrix[0].module, "users");
}
