pub mod health;
pub mod leaderboard;
pub mod resource;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /resources                         list, create (admin)
/// /resources/{id}                    get, update, delete (admin)
/// /resources/{id}/history            change history, newest first
///
/// /leaderboard                       point totals, highest first
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/resources", resource::router())
        .nest("/leaderboard", leaderboard::router())
}
