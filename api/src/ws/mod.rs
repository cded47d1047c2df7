use axum::{Router, middleware::from_fn_with_state, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_admin;

pub mod attendance;
pub mod serve;

/// WebSocket routes under `/ws`. All of them are admin-only.
pub fn ws_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/activities/{activity_id}/attendance",
            get(attendance::attendance_ws_handler),
        )
        .route_layer(from_fn_with_state(app_state, allow_admin))
}
