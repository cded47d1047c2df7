//! Routes for the `/api/profiles` group.
//!
//! - `GET /profiles` → `list_profiles`
//! - `PUT /profiles/{profile_id}/active` → `set_profile_active`
//!
//! Both are behind the `allow_admin` guard.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use util::state::AppState;

pub mod common;
mod get;
mod put;

pub use get::list_profiles;
pub use put::set_profile_active;

use crate::auth::guards::allow_admin;

/// Profile administration. Every route is admin only.
pub fn profile_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles))
        .route("/{profile_id}/active", put(set_profile_active))
        .route_layer(from_fn_with_state(app_state, allow_admin))
}
