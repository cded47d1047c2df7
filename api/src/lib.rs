pub mod auth;
pub mod response;
pub mod routes;
pub mod ws;

use axum::Router;
use util::state::AppState;

/// Full application router: `/api/...` plus `/ws/...`.
///
/// Request logging and CORS are layered on by the binary.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::routes(app_state.clone()))
        .nest("/ws", ws::ws_routes(app_state.clone()))
        .with_state(app_state)
}
