use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use util::state::AppState;

mod attendance;
pub mod common;
mod get;
mod post;
mod put;

pub use attendance::{get_attendance_summary, list_attendance};
pub use get::list_activities;
pub use post::{check_in, check_out, create_activity};
pub use put::update_status;

use crate::auth::guards::{allow_admin, allow_authenticated};

pub fn activity_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/", post(create_activity).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{activity_id}/status", put(update_status).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{activity_id}/check-in", post(check_in).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{activity_id}/check-out", post(check_out).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/{activity_id}/attendance", get(list_attendance).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{activity_id}/attendance/summary", get(get_attendance_summary).route_layer(from_fn_with_state(app_state, allow_admin)))
}
