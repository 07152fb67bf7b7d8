use axum::routing::get;
use axum::Router;

use crate::handlers::resource;
use crate::state::AppState;

/// Routes mounted at `/resources`.
///
/// ```text
/// GET    /                  list (?category=)
/// POST   /                  create (admin)
/// GET    /{id}              get
/// PUT    /{id}              quantity change or metadata patch
/// DELETE /{id}              delete with history (admin)
/// GET    /{id}/history      history page (?limit=&offset=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(resource::list).post(resource::create))
        .route(
            "/{id}",
            get(resource::get_by_id)
                .put(resource::update)
                .delete(resource::delete),
        )
        .route("/{id}/history", get(resource::history))
}
