//! Integration tests for the role repository and `has_role` grant
//! edges using in-memory SurrealDB.

use orgdir_core::error::OrgdirError;
use orgdir_core::models::role::{CreateRole, UpdateRole};
use orgdir_core::models::user::CreateUser;
use orgdir_core::repository::{Pagination, RoleRepository, UserRepository};
use orgdir_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> (SurrealRoleRepository<Db>, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgdir_db::run_migrations(&db).await.unwrap();
    (SurrealRoleRepository::new(db.clone()), db)
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
async fn create_update_and_delete_role() {
    let (repo, _db) = setup().await;

    let role = repo
        .create(CreateRole {
            name: "hr-admin".into(),
            description: "HR administration".into(),
            permissions: vec!["view_users".into(), "edit_users".into()],
        })
        .await
        .unwrap();
    assert_eq!(role.permissions.len(), 2);

    let updated = repo
        .update(
            role.id,
            UpdateRole {
                permissions: Some(vec!["view_users".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.permissions, vec!["view_users".to_string()]);

    repo.delete(role.id).await.unwrap();
    let err = repo.get_by_id(role.id).await.unwrap_err();
    assert!(matches!(err, OrgdirError::NotFound { .. }));
}

#[tokio::test]
async fn grants_resolve_through_has_role_edges() {
    let (repo, db) = setup().await;
    let uid = user(&db, "alice@example.com").await;

    let viewer = repo
        .create(CreateRole {
            name: "viewer".into(),
            description: String::new(),
            permissions: vec!["view_users".into()],
        })
        .await
        .unwrap();
    let editor = repo
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
            permissions: vec!["edit_users".into()],
        })
        .await
        .unwrap();

    repo.assign_to_user(uid, viewer.id).await.unwrap();
    repo.assign_to_user(uid, editor.id).await.unwrap();

    let mut names: Vec<String> = repo
        .get_user_roles(uid)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["editor".to_string(), "viewer".to_string()]);

    repo.unassign_from_user(uid, viewer.id).await.unwrap();
    let remaining = repo.get_user_roles(uid).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "editor");
}

#[tokio::test]
async fn deleting_a_role_drops_its_grants() {
    let (repo, db) = setup().await;
    let uid = user(&db, "bob@example.com").await;

    let role = repo
        .create(CreateRole {
            name: "temp".into(),
            description: String::new(),
            permissions: vec![],
        })
        .await
        .unwrap();
    repo.assign_to_user(uid, role.id).await.unwrap();

    repo.delete(role.id).await.unwrap();
    assert!(repo.get_user_roles(uid).await.unwrap().is_empty());
}

#[tokio::test]
async fn role_names_are_unique() {
    let (repo, _db) = setup().await;

    let input = CreateRole {
        name: "viewer".into(),
        description: String::new(),
        permissions: vec![],
    };
    repo.create(input.clone()).await.unwrap();
    assert!(repo.create(input).await.is_err());
}

#[tokio::test]
async fn roles_list_with_pagination() {
    let (repo, _db) = setup().await;

    for i in 0..3 {
        repo.create(CreateRole {
            name: format!("role-{i}"),
            description: String::new(),
            permissions: vec![],
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}
