//! Team membership domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One (team, user) binding. A user appears at most once per team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMembership {
    pub team_id: Uuid,
    pub user_id: Uuid,
    /// Free text supplied by the caller; the engine never interprets
    /// it.
    pub role_in_team: Option<String>,
    pub joined_at: DateTime<Utc>,
}
