//! Engine error taxonomy.
//!
//! Single-entity operations fail fast with the first violated
//! invariant; the bulk coordinator records these per item instead of
//! aborting.

use orgdir_core::error::OrgdirError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("department hierarchy cycle: {message}")]
    Cycle { message: String },

    #[error("scope mismatch: {message}")]
    ScopeMismatch { message: String },

    #[error("user {user_id} is inactive")]
    InactiveUser { user_id: Uuid },

    #[error("team {team_id} is at capacity ({limit} members)")]
    CapacityExceeded { team_id: Uuid, limit: u32 },

    #[error("user {user_id} leads team {team_id}; clear or reassign the lead first")]
    LeadRemoval { team_id: Uuid, user_id: Uuid },

    #[error("user {user_id} is already a member of team {team_id}")]
    DuplicateMembership { team_id: Uuid, user_id: Uuid },

    #[error("user {user_id} is not a member of team {team_id}")]
    NotAMember { team_id: Uuid, user_id: Uuid },

    #[error("bulk request contains no user ids")]
    EmptyBatch,

    #[error("bulk request exceeds the batch limit of {limit}")]
    BatchTooLarge { limit: usize },
}

impl From<EngineError> for OrgdirError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Cycle { message } => OrgdirError::Cycle { message },
            EngineError::ScopeMismatch { message } => OrgdirError::ScopeMismatch { message },
            EngineError::InactiveUser { user_id } => OrgdirError::InactiveUser { user_id },
            EngineError::CapacityExceeded { team_id, limit } => {
                OrgdirError::CapacityExceeded { team_id, limit }
            }
            EngineError::LeadRemoval { team_id, user_id } => {
                OrgdirError::LeadRemoval { team_id, user_id }
            }
            EngineError::DuplicateMembership { team_id, user_id } => {
                OrgdirError::DuplicateMembership { team_id, user_id }
            }
            EngineError::NotAMember { team_id, user_id } => {
                OrgdirError::NotAMember { team_id, user_id }
            }
            EngineError::EmptyBatch | EngineError::BatchTooLarge { .. } => {
                OrgdirError::Validation {
                    message: err.to_string(),
                }
            }
        }
    }
}
