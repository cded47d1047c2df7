use axum::{Json, extract::State, http::StatusCode};
use db::models::department::Model as Department;
use util::state::AppState;

use super::common::DepartmentResponse;
use crate::response::{ApiResponse, store_failure};

/// GET /api/departments
///
/// All departments by name. Admin only.
pub async fn list_departments(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<DepartmentResponse>>>) {
    match Department::list(state.db()).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                list.into_iter().map(DepartmentResponse::from).collect(),
                "Departments retrieved",
            )),
        ),
        Err(e) => store_failure(e.into()),
    }
}
