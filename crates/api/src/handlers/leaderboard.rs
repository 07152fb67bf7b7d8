//! Handlers for the points leaderboard.

use axum::extract::{Query, State};
use axum::Json;
use tally_db::models::points::{LeaderboardQuery, UserPoints};
use tally_db::repositories::PointsRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/leaderboard?limit=
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> AppResult<Json<DataResponse<Vec<UserPoints>>>> {
    let entries = PointsRepo::leaderboard(&state.pool, params.limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
