//! SurrealDB implementation of [`TeamRepository`].
//!
//! Teams soft-delete by moving to the `Inactive` status; membership
//! rows survive deletion so a restored team comes back with its roster
//! intact. Engine-level invariants (capacity, scope, lead protection)
//! are checked before the write intents here run.

use chrono::{DateTime, Utc};
use orgdir_core::error::OrgdirResult;
use orgdir_core::models::membership::TeamMembership;
use orgdir_core::models::team::{CreateTeam, Team, TeamStatus, TeamType, UpdateTeam};
use orgdir_core::repository::{PaginatedResult, Pagination, TeamRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TeamRow {
    name: String,
    code: String,
    team_type: String,
    department_id: Option<String>,
    team_lead_id: Option<String>,
    max_members: Option<u32>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TeamRowWithId {
    record_id: String,
    name: String,
    code: String,
    team_type: String,
    department_id: Option<String>,
    team_lead_id: Option<String>,
    max_members: Option<u32>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct MembershipRow {
    team_id: String,
    user_id: String,
    role_in_team: Option<String>,
    joined_at: DateTime<Utc>,
}

fn parse_team_type(s: &str) -> Result<TeamType, DbError> {
    match s {
        "Project" => Ok(TeamType::Project),
        "Permanent" => Ok(TeamType::Permanent),
        "CrossFunctional" => Ok(TeamType::CrossFunctional),
        other => Err(DbError::Data(format!("unknown team type: {other}"))),
    }
}

fn team_type_to_string(t: &TeamType) -> &'static str {
    match t {
        TeamType::Project => "Project",
        TeamType::Permanent => "Permanent",
        TeamType::CrossFunctional => "CrossFunctional",
    }
}

fn parse_status(s: &str) -> Result<TeamStatus, DbError> {
    match s {
        "Active" => Ok(TeamStatus::Active),
        "Inactive" => Ok(TeamStatus::Inactive),
        "Completed" => Ok(TeamStatus::Completed),
        "OnHold" => Ok(TeamStatus::OnHold),
        other => Err(DbError::Data(format!("unknown team status: {other}"))),
    }
}

fn status_to_string(s: &TeamStatus) -> &'static str {
    match s {
        TeamStatus::Active => "Active",
        TeamStatus::Inactive => "Inactive",
        TeamStatus::Completed => "Completed",
        TeamStatus::OnHold => "OnHold",
    }
}

fn parse_opt_uuid(value: Option<String>, field: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| Uuid::parse_str(&v))
        .transpose()
        .map_err(|e| DbError::Data(format!("invalid {field} UUID: {e}")))
}

impl TeamRow {
    fn into_team(self, id: Uuid) -> Result<Team, DbError> {
        Ok(Team {
            id,
            name: self.name,
            code: self.code,
            team_type: parse_team_type(&self.team_type)?,
            department_id: parse_opt_uuid(self.department_id, "department")?,
            team_lead_id: parse_opt_uuid(self.team_lead_id, "team lead")?,
            max_members: self.max_members,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TeamRowWithId {
    fn try_into_team(self) -> Result<Team, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        Ok(Team {
            id,
            name: self.name,
            code: self.code,
            team_type: parse_team_type(&self.team_type)?,
            department_id: parse_opt_uuid(self.department_id, "department")?,
            team_lead_id: parse_opt_uuid(self.team_lead_id, "team lead")?,
            max_members: self.max_members,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl MembershipRow {
    fn try_into_membership(self) -> Result<TeamMembership, DbError> {
        let team_id = Uuid::parse_str(&self.team_id)
            .map_err(|e| DbError::Data(format!("invalid team UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Data(format!("invalid user UUID: {e}")))?;
        Ok(TeamMembership {
            team_id,
            user_id,
            role_in_team: self.role_in_team,
            joined_at: self.joined_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Team repository.
#[derive(Clone)]
pub struct SurrealTeamRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTeamRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TeamRepository for SurrealTeamRepository<C> {
    async fn create(&self, input: CreateTeam) -> OrgdirResult<Team> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('team', $id) SET \
                 name = $name, code = $code, \
                 team_type = $team_type, \
                 department_id = $department_id, \
                 team_lead_id = NONE, \
                 max_members = $max_members, \
                 status = 'Active'",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("team_type", team_type_to_string(&input.team_type).to_string()))
            .bind(("department_id", input.department_id.map(|d| d.to_string())))
            .bind(("max_members", input.max_members))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgdirResult<Team> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('team', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn get_by_code(&self, code: &str) -> OrgdirResult<Team> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM team \
                 WHERE code = $code",
            )
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: format!("code={code}"),
        })?;

        Ok(row.try_into_team()?)
    }

    async fn update(&self, id: Uuid, input: UpdateTeam) -> OrgdirResult<Team> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.max_members.is_some() {
            sets.push("max_members = $max_members");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('team', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(max_members) = input.max_members {
            // max_members is Option<Option<u32>>: Some(Some(n)) = set,
            // Some(None) = unbounded.
            builder = builder.bind(("max_members", max_members));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgdirResult<()> {
        // Soft-delete: move to Inactive. Membership rows stay in place
        // for a later restore.
        self.db
            .query(
                "UPDATE type::record('team', $id) SET \
                 status = 'Inactive', updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn restore(&self, id: Uuid) -> OrgdirResult<Team> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('team', $id) SET \
                 status = 'Active', updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn list(&self, pagination: Pagination) -> OrgdirResult<PaginatedResult<Team>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM team GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM team \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_team())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn set_lead(&self, id: Uuid, lead_id: Option<Uuid>) -> OrgdirResult<Team> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('team', $id) SET \
                 team_lead_id = $team_lead_id, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("team_lead_id", lead_id.map(|l| l.to_string())))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeamRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team".into(),
            id: id_str,
        })?;

        Ok(row.into_team(id)?)
    }

    async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> OrgdirResult<TeamMembership> {
        let team_id_str = team_id.to_string();
        let user_id_str = user_id.to_string();

        let result = self
            .db
            .query(
                "CREATE team_membership SET \
                 team_id = $team_id, user_id = $user_id, \
                 role_in_team = $role_in_team",
            )
            .bind(("team_id", team_id_str.clone()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("role_in_team", role_in_team))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team_membership".into(),
            id: format!("team={team_id_str} user={user_id_str}"),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn update_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role_in_team: Option<String>,
    ) -> OrgdirResult<TeamMembership> {
        let team_id_str = team_id.to_string();
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE team_membership SET role_in_team = $role_in_team \
                 WHERE team_id = $team_id AND user_id = $user_id",
            )
            .bind(("team_id", team_id_str.clone()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("role_in_team", role_in_team))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "team_membership".into(),
            id: format!("team={team_id_str} user={user_id_str}"),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> OrgdirResult<()> {
        self.db
            .query(
                "DELETE team_membership \
                 WHERE team_id = $team_id AND user_id = $user_id",
            )
            .bind(("team_id", team_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_members(&self, team_id: Uuid) -> OrgdirResult<Vec<TeamMembership>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM team_membership \
                 WHERE team_id = $team_id \
                 ORDER BY joined_at ASC",
            )
            .bind(("team_id", team_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .map(|row| row.try_into_membership())
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }
}
