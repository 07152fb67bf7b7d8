//! Repository for the `resources` table.

use sqlx::{PgPool, Postgres, Transaction};
use tally_core::resource_update::MetadataPatch;
use tally_core::types::DbId;

use crate::models::resource::{CreateResource, Resource};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, description, image_url, quantity, \
    target_quantity, multiplier, last_updated_by, created_at, updated_at";

/// Provides CRUD and locking operations for resources.
pub struct ResourceRepo;

impl ResourceRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new resource, returning the created row.
    ///
    /// Missing `category`, `quantity` and `multiplier` default to `''`, `0`
    /// and `1.0`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateResource,
        created_by: DbId,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources
                (name, category, description, image_url, quantity, target_quantity,
                 multiplier, last_updated_by)
             VALUES ($1, COALESCE($2, ''), $3, $4, COALESCE($5, 0), $6, COALESCE($7, 1.0), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.quantity)
            .bind(input.target_quantity)
            .bind(input.multiplier)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List resources ordered by category then name, optionally filtered to
    /// one category.
    pub async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resources
             WHERE ($1::TEXT IS NULL OR category = $1)
             ORDER BY category, name"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Apply a metadata patch. Only fields present in `patch` are written;
    /// an explicitly provided `None` clears a nullable column.
    ///
    /// Quantity is never touched here. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        patch: &MetadataPatch,
        updated_by: DbId,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let description_provided = patch.description.is_some();
        let description = patch.description.as_ref().and_then(|v| v.as_deref());
        let image_url_provided = patch.image_url.is_some();
        let image_url = patch.image_url.as_ref().and_then(|v| v.as_deref());
        let target_provided = patch.target_quantity.is_some();
        let target = patch.target_quantity.flatten();

        let query = format!(
            "UPDATE resources SET
                name            = COALESCE($2, name),
                category        = COALESCE($3, category),
                description     = CASE WHEN $4 THEN $5 ELSE description END,
                image_url       = CASE WHEN $6 THEN $7 ELSE image_url END,
                target_quantity = CASE WHEN $8 THEN $9 ELSE target_quantity END,
                multiplier      = COALESCE($10, multiplier),
                last_updated_by = $11,
                updated_at      = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.category)
            .bind(description_provided)
            .bind(description)
            .bind(image_url_provided)
            .bind(image_url)
            .bind(target_provided)
            .bind(target)
            .bind(patch.multiplier)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    // ── Transactional operations ─────────────────────────────────────

    /// Load a resource and take a row lock held until the transaction ends.
    ///
    /// Concurrent callers locking the same id wait here, which serialises
    /// read-modify-write sequences per resource.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a new quantity and stamp the actor and `updated_at`.
    pub async fn set_quantity(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        quantity: i64,
        updated_by: DbId,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "UPDATE resources SET
                quantity = $2, last_updated_by = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .bind(quantity)
            .bind(updated_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete a resource row. History must already be gone (the foreign key
    /// is `ON DELETE RESTRICT`). Returns `true` if a row was removed.
    pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
