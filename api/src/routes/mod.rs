//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → Health check (public)
//! - `/activities` → Targeted activity listing, check-in, admin management and rosters
//! - `/announcements` → Targeted announcement listing and admin publishing
//! - `/profiles` → Admin profile listing and soft-disable
//! - `/departments` → Admin department listing and creation
//! - `/classrooms` → Admin classroom listing and creation

use axum::Router;
use util::state::AppState;

use crate::routes::{
    activities::activity_routes, announcements::announcement_routes,
    classrooms::classroom_routes, departments::department_routes, health::health_routes,
    profiles::profile_routes,
};

pub mod activities;
pub mod announcements;
pub mod classrooms;
pub mod common;
pub mod departments;
pub mod health;
pub mod profiles;

/// Builds the router for every HTTP endpoint under `/api`.
///
/// Access control is applied per route inside each group, since most groups
/// mix endpoints for any signed-in profile with admin-only ones.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/activities", activity_routes(app_state.clone()))
        .nest("/announcements", announcement_routes(app_state.clone()))
        .nest("/profiles", profile_routes(app_state.clone()))
        .nest("/departments", department_routes(app_state.clone()))
        .nest("/classrooms", classroom_routes(app_state))
}
