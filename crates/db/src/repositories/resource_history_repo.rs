//! Repository for the `resource_history` table.
//!
//! There is no update operation. History rows are written once
//! and only removed together with their resource.

use sqlx::{PgPool, Postgres, Transaction};
use tally_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
use tally_core::types::DbId;

use crate::models::resource_history::{CreateResourceHistory, HistoryQuery, ResourceHistory};

/// Column list for SELECT / RETURNING.
const COLUMNS: &str = "id, resource_id, previous_quantity, new_quantity, change_amount, \
    change_type, updated_by, reason, created_at";

/// Provides append, listing and cascade-delete operations for history.
pub struct ResourceHistoryRepo;

impl ResourceHistoryRepo {
    /// Append a history record inside the caller's transaction.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateResourceHistory,
    ) -> Result<ResourceHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO resource_history
                (resource_id, previous_quantity, new_quantity, change_amount,
                 change_type, updated_by, reason)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ResourceHistory>(&query)
            .bind(input.resource_id)
            .bind(input.previous_quantity)
            .bind(input.new_quantity)
            .bind(input.change_amount)
            .bind(input.change_type)
            .bind(input.updated_by)
            .bind(&input.reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// One page of a resource's history, newest first.
    ///
    /// Ties on `created_at` (several changes in one instant) are broken by
    /// `id` so pages are stable across calls.
    pub async fn list_by_resource(
        pool: &PgPool,
        resource_id: DbId,
        params: &HistoryQuery,
    ) -> Result<Vec<ResourceHistory>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM resource_history
             WHERE resource_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ResourceHistory>(&query)
            .bind(resource_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of history records for a resource.
    pub async fn count_by_resource(pool: &PgPool, resource_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM resource_history WHERE resource_id = $1")
                .bind(resource_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Remove every history record of a resource, as the first half of a
    /// resource deletion. Returns the number of rows removed.
    pub async fn delete_all_for_resource(
        tx: &mut Transaction<'_, Postgres>,
        resource_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resource_history WHERE resource_id = $1")
            .bind(resource_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}
