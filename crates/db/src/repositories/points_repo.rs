//! Repository for the `user_points` table (leaderboard totals).

use sqlx::{PgPool, Postgres, Transaction};
use tally_core::pagination::{clamp_limit, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};
use tally_core::types::DbId;

use crate::models::points::UserPoints;

const COLUMNS: &str = "user_id, total_points, contributions, updated_at";

/// Provides leaderboard reads and award accumulation.
pub struct PointsRepo;

impl PointsRepo {
    /// Add `points` to a user's running total inside the caller's transaction,
    /// creating the row on first award. The total saturates at the `BIGINT`
    /// maximum instead of overflowing.
    pub async fn add_points(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        points: i64,
    ) -> Result<UserPoints, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_points (user_id, total_points, contributions)
             VALUES ($1, $2, 1)
             ON CONFLICT (user_id) DO UPDATE SET
                total_points  = LEAST(
                    user_points.total_points::NUMERIC + EXCLUDED.total_points,
                    9223372036854775807
                )::BIGINT,
                contributions = user_points.contributions + 1,
                updated_at    = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPoints>(&query)
            .bind(user_id)
            .bind(points)
            .fetch_one(&mut **tx)
            .await
    }

    /// A single user's totals, if they have ever been awarded points.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPoints>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_points WHERE user_id = $1");
        sqlx::query_as::<_, UserPoints>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Highest totals first.
    pub async fn leaderboard(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<UserPoints>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM user_points
             ORDER BY total_points DESC, user_id
             LIMIT $1"
        );
        sqlx::query_as::<_, UserPoints>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
