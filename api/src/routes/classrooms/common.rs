use db::models::classroom::Model as Classroom;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct ClassroomQuery {
    pub department_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassroomRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,
    pub department_id: i64,
    #[validate(range(min = 1, max = 5, message = "Year level must be between 1 and 5"))]
    pub year_level: i32,
}

#[derive(Debug, Serialize, Default)]
pub struct ClassroomResponse {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
    pub year_level: i32,
    pub created_at: String,
}

impl From<Classroom> for ClassroomResponse {
    fn from(c: Classroom) -> Self {
        Self {
            id: c.id,
            name: c.name,
            department_id: c.department_id,
            year_level: c.year_level,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}
