use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::activity::Model as Activity;
use services::store::{ActivityStore, SeaOrmStore};
use util::state::AppState;

use super::common::{ActivityResponse, UpdateStatusRequest};
use crate::response::{ApiResponse, store_failure};

/// PUT /api/activities/{activity_id}/status
///
/// Sets the status to `active`, `inactive` or `cancelled`. Admin only.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn update_status(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> (StatusCode, Json<ApiResponse<ActivityResponse>>) {
    let store = SeaOrmStore::from_state(&state);
    if let Err(e) = store.fetch_activity(activity_id).await {
        return store_failure(e);
    }

    match Activity::set_status(state.db(), activity_id, req.status).await {
        Ok(activity) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ActivityResponse::from(activity),
                "Activity status updated",
            )),
        ),
        Err(e) => store_failure(e.into()),
    }
}
