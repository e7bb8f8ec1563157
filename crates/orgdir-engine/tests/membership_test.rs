//! Integration tests for the team membership manager using in-memory
//! SurrealDB.

use orgdir_core::error::OrgdirError;
use orgdir_core::models::department::CreateDepartment;
use orgdir_core::models::team::{CreateTeam, TeamStatus, TeamType, UpdateTeam};
use orgdir_core::models::user::CreateUser;
use orgdir_core::repository::{DepartmentRepository, TeamRepository, UserRepository};
use orgdir_db::repository::{
    SurrealDepartmentRepository, SurrealTeamRepository, SurrealUserRepository,
};
use orgdir_engine::MembershipService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = MembershipService<SurrealTeamRepository<Db>, SurrealUserRepository<Db>>;

async fn setup() -> (Service, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgdir_db::run_migrations(&db).await.unwrap();

    let svc = MembershipService::new(
        SurrealTeamRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
    );
    (svc, db)
}

async fn department(db: &Surreal<Db>, code: &str) -> Uuid {
    SurrealDepartmentRepository::new(db.clone())
        .create(CreateDepartment {
            name: code.into(),
            code: code.into(),
            parent_id: None,
            manager_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn team(
    db: &Surreal<Db>,
    code: &str,
    team_type: TeamType,
    department_id: Option<Uuid>,
    max_members: Option<u32>,
) -> Uuid {
    SurrealTeamRepository::new(db.clone())
        .create(CreateTeam {
            name: code.into(),
            code: code.into(),
            team_type,
            department_id,
            max_members,
        })
        .await
        .unwrap()
        .id
}

async fn user(db: &Surreal<Db>, email: &str, department_id: Option<Uuid>) -> Uuid {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            name: email.into(),
            email: email.into(),
            department_id,
            position_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn add_member_and_list_roster() {
    let (svc, db) = setup().await;
    let dept = department(&db, "ENG").await;
    let t = team(&db, "PLT", TeamType::Project, Some(dept), None).await;
    let u = user(&db, "alice@example.com", Some(dept)).await;

    let membership = svc.add_member(t, u, Some("backend".into())).await.unwrap();
    assert_eq!(membership.team_id, t);
    assert_eq!(membership.user_id, u);
    assert_eq!(membership.role_in_team.as_deref(), Some("backend"));

    let members = SurrealTeamRepository::new(db).get_members(t).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn duplicate_membership_is_rejected() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let u = user(&db, "bob@example.com", None).await;

    svc.add_member(t, u, None).await.unwrap();
    let err = svc.add_member(t, u, None).await.unwrap_err();
    assert!(matches!(err, OrgdirError::DuplicateMembership { .. }));
}

#[tokio::test]
async fn scoped_team_rejects_users_from_other_departments() {
    let (svc, db) = setup().await;
    let eng = department(&db, "ENG").await;
    let sales = department(&db, "SLS").await;
    let t = team(&db, "PLT", TeamType::Permanent, Some(eng), None).await;

    let outsider = user(&db, "outsider@example.com", Some(sales)).await;
    let err = svc.add_member(t, outsider, None).await.unwrap_err();
    assert!(matches!(err, OrgdirError::ScopeMismatch { .. }));

    let insider = user(&db, "insider@example.com", Some(eng)).await;
    svc.add_member(t, insider, None).await.unwrap();
}

#[tokio::test]
async fn cross_functional_team_ignores_departments() {
    let (svc, db) = setup().await;
    let eng = department(&db, "ENG").await;
    let sales = department(&db, "SLS").await;
    // Home department set, but cross-functional teams are unscoped.
    let t = team(&db, "TF", TeamType::CrossFunctional, Some(eng), None).await;

    let u = user(&db, "anyone@example.com", Some(sales)).await;
    svc.add_member(t, u, None).await.unwrap();
}

#[tokio::test]
async fn full_team_rejects_one_more_member() {
    let (svc, db) = setup().await;
    let t = team(&db, "DUO", TeamType::CrossFunctional, None, Some(2)).await;

    let u1 = user(&db, "m1@example.com", None).await;
    let u2 = user(&db, "m2@example.com", None).await;
    let u3 = user(&db, "m3@example.com", None).await;

    svc.add_member(t, u1, None).await.unwrap();
    svc.add_member(t, u2, None).await.unwrap();

    let err = svc.add_member(t, u3, None).await.unwrap_err();
    assert!(matches!(err, OrgdirError::CapacityExceeded { limit: 2, .. }));
}

#[tokio::test]
async fn inactive_user_cannot_join() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let u = user(&db, "gone@example.com", None).await;
    SurrealUserRepository::new(db).delete(u).await.unwrap();

    let err = svc.add_member(t, u, None).await.unwrap_err();
    assert!(matches!(err, OrgdirError::InactiveUser { .. }));
}

#[tokio::test]
async fn lead_cannot_be_removed_until_reassigned() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let lead = user(&db, "lead@example.com", None).await;
    let other = user(&db, "other@example.com", None).await;

    svc.add_member(t, lead, None).await.unwrap();
    svc.add_member(t, other, None).await.unwrap();
    svc.set_team_lead(t, Some(lead)).await.unwrap();

    let err = svc.remove_member(t, lead).await.unwrap_err();
    assert!(matches!(err, OrgdirError::LeadRemoval { .. }));

    // Clearing leadership unblocks the removal.
    svc.set_team_lead(t, None).await.unwrap();
    svc.remove_member(t, lead).await.unwrap();

    let members = SurrealTeamRepository::new(db).get_members(t).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, other);
}

#[tokio::test]
async fn lead_must_be_a_member() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let stranger = user(&db, "stranger@example.com", None).await;

    let err = svc.set_team_lead(t, Some(stranger)).await.unwrap_err();
    assert!(matches!(err, OrgdirError::NotAMember { .. }));
}

#[tokio::test]
async fn member_role_updates_require_membership() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let member = user(&db, "member@example.com", None).await;
    let stranger = user(&db, "stranger@example.com", None).await;

    svc.add_member(t, member, Some("qa".into())).await.unwrap();

    let updated = svc
        .update_member_role(t, member, Some("tech lead".into()))
        .await
        .unwrap();
    assert_eq!(updated.role_in_team.as_deref(), Some("tech lead"));

    let err = svc.update_member_role(t, stranger, None).await.unwrap_err();
    assert!(matches!(err, OrgdirError::NotAMember { .. }));

    let err = svc.remove_member(t, stranger).await.unwrap_err();
    assert!(matches!(err, OrgdirError::NotAMember { .. }));
}

#[tokio::test]
async fn eligible_users_respect_scope_and_roster() {
    let (svc, db) = setup().await;
    let eng = department(&db, "ENG").await;
    let sales = department(&db, "SLS").await;
    let t = team(&db, "PLT", TeamType::Project, Some(eng), None).await;

    let member = user(&db, "member@example.com", Some(eng)).await;
    let candidate = user(&db, "candidate@example.com", Some(eng)).await;
    let _outsider = user(&db, "outsider@example.com", Some(sales)).await;
    let inactive = user(&db, "inactive@example.com", Some(eng)).await;
    SurrealUserRepository::new(db.clone()).delete(inactive).await.unwrap();

    svc.add_member(t, member, None).await.unwrap();

    let eligible = svc.eligible_users(t).await.unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, candidate);
}

#[tokio::test]
async fn eligible_users_for_unscoped_team_span_departments() {
    let (svc, db) = setup().await;
    let eng = department(&db, "ENG").await;
    let sales = department(&db, "SLS").await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;

    user(&db, "a@example.com", Some(eng)).await;
    user(&db, "b@example.com", Some(sales)).await;
    user(&db, "c@example.com", None).await;

    let eligible = svc.eligible_users(t).await.unwrap();
    assert_eq!(eligible.len(), 3);
}

#[tokio::test]
async fn restore_rechecks_capacity() {
    let (svc, db) = setup().await;
    let t = team(&db, "DUO", TeamType::CrossFunctional, None, Some(2)).await;
    let u1 = user(&db, "m1@example.com", None).await;
    let u2 = user(&db, "m2@example.com", None).await;
    svc.add_member(t, u1, None).await.unwrap();
    svc.add_member(t, u2, None).await.unwrap();

    let team_repo = SurrealTeamRepository::new(db.clone());
    team_repo.delete(t).await.unwrap();

    // Capacity tightened below the stored roster while inactive.
    team_repo
        .update(
            t,
            UpdateTeam {
                max_members: Some(Some(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = svc.restore_team(t).await.unwrap_err();
    assert!(matches!(err, OrgdirError::CapacityExceeded { limit: 1, .. }));

    // Loosening the cap lets the restore through.
    team_repo
        .update(
            t,
            UpdateTeam {
                max_members: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let restored = svc.restore_team(t).await.unwrap();
    assert_eq!(restored.status, TeamStatus::Active);
}

#[tokio::test]
async fn restore_rechecks_member_scope() {
    let (svc, db) = setup().await;
    let eng = department(&db, "ENG").await;
    let sales = department(&db, "SLS").await;
    let t = team(&db, "PLT", TeamType::Project, Some(eng), None).await;
    let u = user(&db, "drifter@example.com", Some(eng)).await;
    svc.add_member(t, u, None).await.unwrap();

    let team_repo = SurrealTeamRepository::new(db.clone());
    team_repo.delete(t).await.unwrap();

    // The member changed departments while the team was inactive.
    SurrealUserRepository::new(db.clone())
        .set_assignment(u, Some(sales), None)
        .await
        .unwrap();

    let err = svc.restore_team(t).await.unwrap_err();
    assert!(matches!(err, OrgdirError::ScopeMismatch { .. }));
}

#[tokio::test]
async fn deletion_keeps_the_roster_for_restore() {
    let (svc, db) = setup().await;
    let t = team(&db, "XF", TeamType::CrossFunctional, None, None).await;
    let u = user(&db, "keeper@example.com", None).await;
    svc.add_member(t, u, None).await.unwrap();

    let team_repo = SurrealTeamRepository::new(db);
    team_repo.delete(t).await.unwrap();
    assert_eq!(team_repo.get_by_id(t).await.unwrap().status, TeamStatus::Inactive);

    let restored = svc.restore_team(t).await.unwrap();
    assert_eq!(restored.status, TeamStatus::Active);
    assert_eq!(team_repo.get_members(t).await.unwrap().len(), 1);
}
