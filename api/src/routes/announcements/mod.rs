use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod common;
mod get;
mod post;
mod put;

pub use get::list_announcements;
pub use post::create_announcement;
pub use put::publish_announcement;

use crate::auth::guards::{allow_admin, allow_authenticated};

pub fn announcement_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)))
        .route("/", post(create_announcement).route_layer(from_fn_with_state(app_state.clone(), allow_admin)))
        .route("/{announcement_id}/publish", put(publish_announcement).route_layer(from_fn_with_state(app_state, allow_admin)))
}
