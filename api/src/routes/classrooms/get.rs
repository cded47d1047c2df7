use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::classroom::Model as Classroom;
use util::state::AppState;

use super::common::{ClassroomQuery, ClassroomResponse};
use crate::response::{ApiResponse, store_failure};

/// GET /api/classrooms
///
/// Classrooms by year level then name, optionally of one department
/// (`?department_id=3`). Admin only.
pub async fn list_classrooms(
    State(state): State<AppState>,
    Query(query): Query<ClassroomQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<ClassroomResponse>>>) {
    match Classroom::list(state.db(), query.department_id).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                list.into_iter().map(ClassroomResponse::from).collect(),
                "Classrooms retrieved",
            )),
        ),
        Err(e) => store_failure(e.into()),
    }
}
