use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use db::models::activity::{Model as Activity, NewActivity};
use services::admission::{AdmissionController, CheckInError, CheckInRequest, CheckOutError};
use services::store::{ActivityStore, SeaOrmStore};
use util::state::AppState;
use validator::Validate;

use super::common::{
    ActivityResponse, AttendanceRecordResponse, CreateActivityRequest, check_in_status,
    check_out_status,
};
use crate::auth::CurrentSession;
use crate::response::{ApiResponse, store_failure};
use crate::routes::common::format_validation_errors;

/// POST /api/activities
///
/// Creates an activity in the `active` status. Admin only.
///
/// ### Request Body
/// ```json
/// {
///   "title": "Morning assembly",
///   "start_time": "2024-01-01T08:00:00Z",
///   "end_time": "2024-01-01T08:30:00Z",
///   "requires_photo": true,
///   "target_year_levels": [1, 2]
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure, or `end_time` before `start_time`)
pub async fn create_activity(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<CreateActivityRequest>,
) -> (StatusCode, Json<ApiResponse<ActivityResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&validation_errors))),
        );
    }
    if req.end_time < req.start_time {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("End time must not be before start time")),
        );
    }

    let new = NewActivity {
        title: req.title,
        description: req.description,
        location: req.location,
        start_time: req.start_time,
        end_time: req.end_time,
        requires_photo: req.requires_photo,
        target_classrooms: req.target_classrooms.into_iter().collect(),
        target_departments: req.target_departments.into_iter().collect(),
        target_year_levels: req.target_year_levels.into_iter().collect(),
        created_by: Some(session.profile.id),
    };

    match Activity::create(state.db(), new).await {
        Ok(activity) => {
            tracing::info!(activity_id = activity.id, by = session.profile.id, "activity created");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    ActivityResponse::from(activity),
                    "Activity created successfully",
                )),
            )
        }
        Err(e) => store_failure(e.into()),
    }
}

/// POST /api/activities/{activity_id}/check-in
///
/// Checks the caller into an activity.
///
/// ### Request Body
/// ```json
/// { "photo_url": "photos/abc.jpg", "location": "Main hall" }
/// ```
/// Both fields are optional; `photo_url` is required when the activity asks for a photo.
///
/// ### Responses
/// - `201 Created` with the stored record
/// - `400 Bad Request` (activity not active, not started, or ended)
/// - `403 Forbidden` (not eligible)
/// - `404 Not Found` (unknown activity)
/// - `409 Conflict` (already checked in)
/// - `422 Unprocessable Entity` (photo required)
/// - `503 Service Unavailable`
pub async fn check_in(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<CheckInRequest>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let store = SeaOrmStore::from_state(&state);
    let activity = match store.fetch_activity(activity_id).await {
        Ok(activity) => activity,
        Err(e) => return store_failure(e),
    };

    let controller = AdmissionController::new(store);
    match controller
        .check_in(&session.profile, &activity, req, Utc::now())
        .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Checked in successfully",
            )),
        ),
        Err(e) => {
            if let CheckInError::Store(inner) = &e {
                tracing::error!(activity_id, profile_id = session.profile.id, "check-in failed: {inner}");
            }
            (check_in_status(&e), Json(ApiResponse::error(e.to_string())))
        }
    }
}

/// POST /api/activities/{activity_id}/check-out
///
/// Stamps the check-out time on the caller's record for this activity. Allowed
/// after the activity's window has closed.
///
/// ### Responses
/// - `200 OK` with the updated record
/// - `400 Bad Request` (caller never checked in)
/// - `404 Not Found` (unknown activity)
/// - `409 Conflict` (already checked out)
/// - `503 Service Unavailable`
pub async fn check_out(
    State(state): State<AppState>,
    Path(activity_id): Path<i64>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let store = SeaOrmStore::from_state(&state);
    let activity = match store.fetch_activity(activity_id).await {
        Ok(activity) => activity,
        Err(e) => return store_failure(e),
    };

    let controller = AdmissionController::new(store);
    match controller.check_out(&session.profile, &activity, Utc::now()).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Checked out successfully",
            )),
        ),
        Err(e) => {
            if let CheckOutError::Store(inner) = &e {
                tracing::error!(activity_id, profile_id = session.profile.id, "check-out failed: {inner}");
            }
            (check_out_status(&e), Json(ApiResponse::error(e.to_string())))
        }
    }
}
