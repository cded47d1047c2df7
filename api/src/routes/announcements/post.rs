use axum::{Json, extract::State, http::StatusCode};
use db::models::announcement::{Model as Announcement, NewAnnouncement};
use util::state::AppState;
use validator::Validate;

use super::common::{AnnouncementResponse, CreateAnnouncementRequest};
use crate::response::{ApiResponse, store_failure};
use crate::routes::common::format_validation_errors;

/// POST /api/announcements
///
/// Creates a draft, or a published announcement when `"publish": true`. Admin only.
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(req): Json<CreateAnnouncementRequest>,
) -> (StatusCode, Json<ApiResponse<AnnouncementResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&validation_errors))),
        );
    }

    let new = NewAnnouncement {
        title: req.title,
        content: req.content,
        priority: req.priority,
        target_audience: req.target_audience,
        target_classrooms: req.target_classrooms.into_iter().collect(),
        target_departments: req.target_departments.into_iter().collect(),
        target_year_levels: req.target_year_levels.into_iter().collect(),
        expires_at: req.expires_at,
    };

    match Announcement::create(state.db(), new, req.publish).await {
        Ok(announcement) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AnnouncementResponse::from(announcement),
                "Announcement created successfully",
            )),
        ),
        Err(e) => store_failure(e.into()),
    }
}
