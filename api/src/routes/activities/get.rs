use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use services::listings::{ActivityListing, list_activities_for};
use services::store::SeaOrmStore;
use util::state::AppState;

use crate::auth::CurrentSession;
use crate::response::{ApiResponse, store_failure};

/// GET /api/activities
///
/// Active activities the caller is eligible for, earliest start first. Each
/// entry carries the activity fields plus:
/// - `phase`: `upcoming`, `open`, `ended` or `unavailable`
/// - `checked_in`: whether the caller already has a record
///
/// ### Responses
/// - `200 OK`
/// - `401 Unauthorized` (no or expired session)
/// - `503 Service Unavailable`
pub async fn list_activities(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> (StatusCode, Json<ApiResponse<Vec<ActivityListing>>>) {
    let store = SeaOrmStore::from_state(&state);
    match list_activities_for(&store, &session.profile, Utc::now()).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(list, "Activities retrieved")),
        ),
        Err(e) => store_failure(e),
    }
}
