use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use services::roster::{Attendee, LiveRoster, RosterSummary, summarize};
use services::store::{ActivityStore, RosterStore, SeaOrmStore};
use util::state::AppState;

use super::common::RosterQuery;
use crate::response::{ApiResponse, store_failure};

/// GET /api/activities/{activity_id}/attendance
///
/// Roster snapshot, most recent check-in first. Admin only.
///
/// ### Query Parameters
/// - `department`, `classroom`, `year_level`: optional ids; every supplied one must match
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (non-numeric filter)
/// - `404 Not Found`
pub async fn list_attendance(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Query(query): Query<RosterQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<Attendee>>>) {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
    };

    let store = SeaOrmStore::from_state(&state);
    if let Err(e) = store.fetch_activity(activity_id).await {
        return store_failure(e);
    }

    match store.fetch_roster(activity_id).await {
        Ok(snapshot) => {
            let mut roster = LiveRoster::new();
            roster.load_snapshot(snapshot);
            roster.apply_filter(filter);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    roster.visible().to_vec(),
                    "Attendance retrieved",
                )),
            )
        }
        Err(e) => store_failure(e),
    }
}

/// GET /api/activities/{activity_id}/attendance/summary
///
/// Total attendees and head count per department. Admin only.
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<RosterSummary>>) {
    let store = SeaOrmStore::from_state(&state);
    if let Err(e) = store.fetch_activity(activity_id).await {
        return store_failure(e);
    }

    match store.fetch_roster(activity_id).await {
        Ok(attendees) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                summarize(&attendees),
                "Attendance summary retrieved",
            )),
        ),
        Err(e) => store_failure(e),
    }
}
