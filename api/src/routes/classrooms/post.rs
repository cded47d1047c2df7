use axum::{Json, extract::State, http::StatusCode};
use db::models::classroom::Model as Classroom;
use db::models::department::Entity as DepartmentEntity;
use sea_orm::EntityTrait;
use services::error::StoreError;
use util::state::AppState;
use validator::Validate;

use super::common::{ClassroomResponse, CreateClassroomRequest};
use crate::response::{ApiResponse, store_failure};
use crate::routes::common::format_validation_errors;

/// POST /api/classrooms
///
/// Creates a classroom inside an existing department. Admin only.
///
/// ### Request Body
/// ```json
/// { "name": "2A", "department_id": 1, "year_level": 2 }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure, year level outside 1 to 5)
/// - `404 Not Found` (unknown department)
pub async fn create_classroom(
    State(state): State<AppState>,
    Json(req): Json<CreateClassroomRequest>,
) -> (StatusCode, Json<ApiResponse<ClassroomResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&validation_errors))),
        );
    }

    let db = state.db();
    match DepartmentEntity::find_by_id(req.department_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return store_failure(StoreError::not_found("department", req.department_id)),
        Err(e) => return store_failure(e.into()),
    }

    match Classroom::create(db, req.name.trim(), req.department_id, req.year_level).await {
        Ok(classroom) => {
            tracing::info!(classroom_id = classroom.id, department_id = classroom.department_id, "classroom created");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    ClassroomResponse::from(classroom),
                    "Classroom created successfully",
                )),
            )
        }
        Err(e) => store_failure(e.into()),
    }
}
