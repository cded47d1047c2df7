use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::profile::Model as Profile;
use services::store::{ProfileStore, SeaOrmStore};
use util::state::AppState;

use super::common::{ProfileResponse, SetActiveRequest};
use crate::auth::CurrentSession;
use crate::response::{ApiResponse, store_failure};

/// PUT /api/profiles/{profile_id}/active
///
/// Soft-enables or soft-disables a profile. A disabled profile is refused by
/// every guarded route on its next request. Admin only.
///
/// ### Request Body
/// ```json
/// { "active": false }
/// ```
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (admin disabling their own profile)
/// - `404 Not Found`
pub async fn set_profile_active(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<SetActiveRequest>,
) -> (StatusCode, Json<ApiResponse<ProfileResponse>>) {
    if profile_id == session.profile.id && !req.active {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("You cannot disable your own account")),
        );
    }

    let store = SeaOrmStore::from_state(&state);
    if let Err(e) = store.fetch_profile(profile_id).await {
        return store_failure(e);
    }

    match Profile::set_active(state.db(), profile_id, req.active).await {
        Ok(profile) => {
            tracing::info!(profile_id, active = profile.active, by = session.profile.id, "profile activity changed");
            let message = if profile.active {
                "Profile enabled"
            } else {
                "Profile disabled"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(ProfileResponse::from(profile), message)),
            )
        }
        Err(e) => store_failure(e.into()),
    }
}
