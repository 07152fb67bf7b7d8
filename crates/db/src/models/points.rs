//! Leaderboard models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A row from the `user_points` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPoints {
    pub user_id: DbId,
    pub total_points: i64,
    pub contributions: i64,
    pub updated_at: Timestamp,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}
