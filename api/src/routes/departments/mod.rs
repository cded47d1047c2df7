use axum::{Router, middleware::from_fn_with_state, routing::get};
use util::state::AppState;

pub mod common;
mod get;
mod post;

pub use get::list_departments;
pub use post::create_department;

use crate::auth::guards::allow_admin;

pub fn department_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route_layer(from_fn_with_state(app_state, allow_admin))
}
