//! Error types for the ORGDIR system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrgdirError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Department hierarchy cycle: {message}")]
    Cycle { message: String },

    #[error("Scope mismatch: {message}")]
    ScopeMismatch { message: String },

    #[error("User {user_id} is inactive")]
    InactiveUser { user_id: Uuid },

    #[error("Team {team_id} is at capacity ({limit} members)")]
    CapacityExceeded { team_id: Uuid, limit: u32 },

    #[error("User {user_id} leads team {team_id} and cannot be removed")]
    LeadRemoval { team_id: Uuid, user_id: Uuid },

    #[error("User {user_id} is already a member of team {team_id}")]
    DuplicateMembership { team_id: Uuid, user_id: Uuid },

    #[error("User {user_id} is not a member of team {team_id}")]
    NotAMember { team_id: Uuid, user_id: Uuid },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrgdirResult<T> = Result<T, OrgdirError>;
