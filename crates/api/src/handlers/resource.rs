//! Handlers for the `/resources` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tally_core::error::CoreError;
use tally_core::resource_update::ResourceUpdate;
use tally_core::types::DbId;
use tally_db::models::resource::{CreateResource, ResourceListQuery, ResourceView};
use tally_db::models::resource_history::{HistoryQuery, ResourceHistory};
use tally_db::repositories::{ResourceHistoryRepo, ResourceRepo};
use validator::Validate;

use crate::engine::resource_update::{ResourceUpdateTransaction, UpdateResponse};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/resources
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    input: Result<Json<CreateResource>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<ResourceView>>)> {
    let Json(input) = input?;
    input.validate()?;
    let resource = ResourceRepo::create(&state.pool, &input, admin.user_id).await?;

    tracing::info!(
        resource_id = resource.id,
        user_id = admin.user_id,
        name = %resource.name,
        "Resource created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: resource.into_view(),
        }),
    ))
}

/// GET /api/v1/resources?category=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ResourceListQuery>,
) -> AppResult<Json<DataResponse<Vec<ResourceView>>>> {
    let resources = ResourceRepo::list(&state.pool, params.category.as_deref()).await?;
    Ok(Json(DataResponse {
        data: resources.into_iter().map(|r| r.into_view()).collect(),
    }))
}

/// GET /api/v1/resources/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResourceView>>> {
    let resource = ResourceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: resource.into_view(),
    }))
}

/// PUT /api/v1/resources/{id}
///
/// Any of `quantity`, `updateType` or `value` selects the quantity path;
/// otherwise the body is a metadata patch. An unreadable body is an
/// invalid update.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    input: Result<Json<ResourceUpdate>, JsonRejection>,
) -> AppResult<Json<DataResponse<UpdateResponse>>> {
    let Json(input) = input.map_err(AppError::invalid_update_body)?;
    if input.has_quantity_fields() {
        let ignored = input.metadata_fields();
        if !ignored.is_empty() {
            tracing::warn!(
                resource_id = id,
                user_id = user.user_id,
                ignored = ?ignored,
                "Metadata fields sent with a quantity change are ignored",
            );
        }
    }

    let path = input.into_path()?;
    let outcome = ResourceUpdateTransaction::new(&state.pool, &state.config.scoring)
        .apply(&user.actor(), id, path)
        .await?;

    Ok(Json(DataResponse {
        data: outcome.into(),
    }))
}

/// DELETE /api/v1/resources/{id}
///
/// Removes the resource and its entire history.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ResourceUpdateTransaction::new(&state.pool, &state.config.scoring)
        .delete_resource(&admin.actor(), id)
        .await?;
    Ok((StatusCode::NO_CONTENT, [(CACHE_CONTROL, "no-store")]))
}

/// GET /api/v1/resources/{id}/history?limit=&offset=
///
/// Newest first. Unknown resources are a 404 rather than an empty page.
pub async fn history(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<ResourceHistory>>>> {
    if ResourceRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id,
        }));
    }
    let records = ResourceHistoryRepo::list_by_resource(&state.pool, id, &params).await?;
    Ok(Json(DataResponse { data: records }))
}
