use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use services::listings::{AnnouncementListing, list_announcements_for};
use services::store::SeaOrmStore;
use util::state::AppState;

use crate::auth::CurrentSession;
use crate::response::{ApiResponse, store_failure};

/// GET /api/announcements
///
/// Published announcements addressed to the caller, newest first. Expired
/// announcements are still listed with `"expired": true`.
pub async fn list_announcements(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> (StatusCode, Json<ApiResponse<Vec<AnnouncementListing>>>) {
    let store = SeaOrmStore::from_state(&state);
    match list_announcements_for(&store, &session.profile, Utc::now()).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(list, "Announcements retrieved")),
        ),
        Err(e) => store_failure(e),
    }
}
