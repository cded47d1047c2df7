use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::profile::Model as Profile;
use util::state::AppState;

use super::common::{ProfileQuery, ProfileResponse};
use crate::response::{ApiResponse, store_failure};

/// GET /api/profiles
///
/// Lists profiles ordered by student code. Admin only.
///
/// ### Query Parameters
/// - `role` (optional): `student`, `teacher`, `staff` or `admin`
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (unknown role)
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<ProfileResponse>>>) {
    let role = match query.role() {
        Ok(role) => role,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))),
    };

    match Profile::list(state.db(), role).await {
        Ok(profiles) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                profiles.into_iter().map(ProfileResponse::from).collect(),
                "Profiles retrieved",
            )),
        ),
        Err(e) => store_failure(e.into()),
    }
}
