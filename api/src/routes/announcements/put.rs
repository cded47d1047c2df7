use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::announcement::{Entity as AnnouncementEntity, Model as Announcement};
use sea_orm::EntityTrait;
use services::error::StoreError;
use util::state::AppState;

use super::common::{AnnouncementResponse, PublishRequest};
use crate::response::{ApiResponse, store_failure};

/// PUT /api/announcements/{announcement_id}/publish
///
/// Publishes (`{"published": true}`) or withdraws an announcement. Admin only.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn publish_announcement(
    State(state): State<AppState>,
    Path(announcement_id): Path<i64>,
    Json(req): Json<PublishRequest>,
) -> (StatusCode, Json<ApiResponse<AnnouncementResponse>>) {
    let db = state.db();
    match AnnouncementEntity::find_by_id(announcement_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return store_failure(StoreError::not_found("announcement", announcement_id)),
        Err(e) => return store_failure(e.into()),
    }

    match Announcement::publish(db, announcement_id, req.published).await {
        Ok(announcement) => {
            let message = if announcement.is_published {
                "Announcement published"
            } else {
                "Announcement withdrawn"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(AnnouncementResponse::from(announcement), message)),
            )
        }
        Err(e) => store_failure(e.into()),
    }
}
