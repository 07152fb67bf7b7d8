//! Atomic resource update and delete.
//!
//! A quantity update takes a row lock on the resource, recomputes the
//! quantity from the locked row, appends a history record and upserts the
//! actor's points in one transaction. Concurrent updates to the same
//! resource queue on the lock; updates to different resources do not
//! interact. Any error, or dropping the future mid-flight, drops the
//! transaction and rolls everything back.

use serde::Serialize;
use sqlx::PgPool;
use tally_core::error::CoreError;
use tally_core::permissions::{required_for_update, Actor, Permission};
use tally_core::quantity_change::{compute_change, QuantityChange};
use tally_core::resource_status::classify;
use tally_core::resource_update::{MetadataPatch, QuantityUpdate, UpdatePath};
use tally_core::scoring::{ActionType, PointsCalculation, ScoringContext, ScoringPolicy};
use tally_core::types::DbId;
use tally_db::models::resource::{Resource, ResourceView};
use tally_db::models::resource_history::{CreateResourceHistory, ResourceHistory};
use tally_db::repositories::{PointsRepo, ResourceHistoryRepo, ResourceRepo};

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a committed quantity update.
#[derive(Debug, Clone)]
pub struct QuantityOutcome {
    pub resource: Resource,
    pub change: QuantityChange,
    pub history: ResourceHistory,
    /// `None` when the change was zero.
    pub calculation: Option<PointsCalculation>,
}

impl QuantityOutcome {
    pub fn points_earned(&self) -> i64 {
        self.calculation.as_ref().map_or(0, |c| c.final_points)
    }
}

/// Result of [`ResourceUpdateTransaction::apply`].
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Quantity(QuantityOutcome),
    Metadata(Resource),
}

/// Response body for `PUT /resources/{id}`.
///
/// Quantity updates carry the award (`pointsCalculation` is `null` for a
/// zero change); metadata updates carry only the resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub resource: ResourceView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_calculation: Option<Option<PointsCalculation>>,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Quantity(q) => Self {
                points_earned: Some(q.points_earned()),
                resource: q.resource.into_view(),
                points_calculation: Some(q.calculation),
            },
            UpdateOutcome::Metadata(resource) => Self {
                resource: resource.into_view(),
                points_earned: None,
                points_calculation: None,
            },
        }
    }
}

/// Result of a committed cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub resource_id: DbId,
    pub history_removed: u64,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs updates and deletes against a pool with an injected scoring policy.
#[derive(Debug, Clone, Copy)]
pub struct ResourceUpdateTransaction<'a> {
    pool: &'a PgPool,
    policy: &'a ScoringPolicy,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Resource",
        id,
    })
}

impl<'a> ResourceUpdateTransaction<'a> {
    pub fn new(pool: &'a PgPool, policy: &'a ScoringPolicy) -> Self {
        Self { pool, policy }
    }

    /// Apply an update on the path it dispatched to, after checking that
    /// `actor` holds the permission the path requires.
    pub async fn apply(
        &self,
        actor: &Actor,
        resource_id: DbId,
        path: UpdatePath,
    ) -> AppResult<UpdateOutcome> {
        actor.permissions.require(required_for_update(&path))?;
        match path {
            UpdatePath::Quantity(update) => self
                .update_quantity(actor, resource_id, update)
                .await
                .map(UpdateOutcome::Quantity),
            UpdatePath::Metadata(patch) => self
                .update_metadata(actor, resource_id, &patch)
                .await
                .map(UpdateOutcome::Metadata),
        }
    }

    /// Quantity path. History is appended even when the change is zero;
    /// points are only awarded for a non-zero change.
    async fn update_quantity(
        &self,
        actor: &Actor,
        resource_id: DbId,
        update: QuantityUpdate,
    ) -> AppResult<QuantityOutcome> {
        let mut tx = self.pool.begin().await?;

        let current = ResourceRepo::lock_for_update(&mut tx, resource_id)
            .await?
            .ok_or_else(|| not_found(resource_id))?;

        let change = compute_change(
            current.quantity,
            update.quantity,
            update.update_type,
            update.value,
        )?;

        let resource =
            ResourceRepo::set_quantity(&mut tx, resource_id, change.new_quantity, actor.user_id)
                .await?;

        let history = ResourceHistoryRepo::append(
            &mut tx,
            &CreateResourceHistory::from_change(resource_id, &change, actor.user_id, update.reason),
        )
        .await?;

        // Scarcity is judged on the state the contributor acted on.
        let status_before = classify(current.quantity, current.target_quantity);
        let calculation = ActionType::for_change(change.update_type, change.change_amount).map(
            |action| {
                self.policy.award_points(
                    actor.user_id,
                    resource_id,
                    action,
                    change.magnitude(),
                    &ScoringContext {
                        name: &current.name,
                        category: &current.category,
                        status: status_before,
                        multiplier: current.multiplier,
                    },
                )
            },
        );

        // Awards that round to zero leave the leaderboard untouched.
        if let Some(calc) = calculation.as_ref().filter(|c| c.final_points != 0) {
            PointsRepo::add_points(&mut tx, actor.user_id, calc.final_points).await?;
        }

        tx.commit().await?;

        tracing::info!(
            resource_id,
            user_id = actor.user_id,
            change_amount = change.change_amount,
            new_quantity = change.new_quantity,
            points = calculation.as_ref().map_or(0, |c| c.final_points),
            "Resource quantity updated",
        );

        Ok(QuantityOutcome {
            resource,
            change,
            history,
            calculation,
        })
    }

    /// Metadata path. Never touches quantity, history or points.
    async fn update_metadata(
        &self,
        actor: &Actor,
        resource_id: DbId,
        patch: &MetadataPatch,
    ) -> AppResult<Resource> {
        let resource = ResourceRepo::update_metadata(self.pool, resource_id, patch, actor.user_id)
            .await?
            .ok_or_else(|| not_found(resource_id))?;

        tracing::debug!(resource_id, user_id = actor.user_id, "Resource metadata updated");
        Ok(resource)
    }

    /// Delete a resource and all of its history in one transaction.
    pub async fn delete_resource(
        &self,
        actor: &Actor,
        resource_id: DbId,
    ) -> AppResult<DeleteOutcome> {
        actor.permissions.require(Permission::Administer)?;

        let mut tx = self.pool.begin().await?;

        ResourceRepo::lock_for_update(&mut tx, resource_id)
            .await?
            .ok_or_else(|| not_found(resource_id))?;

        let history_removed =
            ResourceHistoryRepo::delete_all_for_resource(&mut tx, resource_id).await?;
        if !ResourceRepo::delete(&mut tx, resource_id).await? {
            return Err(not_found(resource_id));
        }

        tx.commit().await?;

        tracing::info!(
            resource_id,
            user_id = actor.user_id,
            history_removed,
            "Resource deleted",
        );

        Ok(DeleteOutcome {
            resource_id,
            history_removed,
        })
    }
}
