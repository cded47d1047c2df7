use axum::{Json, extract::State, http::StatusCode};
use db::models::department::Model as Department;
use sea_orm::SqlErr;
use util::state::AppState;
use validator::Validate;

use super::common::{CreateDepartmentRequest, DepartmentResponse};
use crate::response::{ApiResponse, store_failure};
use crate::routes::common::format_validation_errors;

/// POST /api/departments
///
/// Creates a department. Admin only.
///
/// ### Request Body
/// ```json
/// { "name": "Science", "description": "Physics, chemistry and biology" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (name already taken)
pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> (StatusCode, Json<ApiResponse<DepartmentResponse>>) {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format_validation_errors(&validation_errors))),
        );
    }

    let name = req.name.trim();
    match Department::create(state.db(), name, &req.description).await {
        Ok(department) => {
            tracing::info!(department_id = department.id, "department created");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    DepartmentResponse::from(department),
                    "Department created successfully",
                )),
            )
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(format!("A department named '{name}' already exists"))),
        ),
        Err(e) => store_failure(e.into()),
    }
}
