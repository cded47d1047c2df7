use db::models::profile::{Model as Profile, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub role: Option<String>,
}

impl ProfileQuery {
    /// Parsed role filter. A blank value means every role.
    pub fn role(&self) -> Result<Option<Role>, String> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| format!("Invalid role filter '{v}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Serialize, Default)]
pub struct ProfileResponse {
    pub id: i64,
    pub student_code: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub department_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub year_level: Option<i32>,
    pub active: bool,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            full_name: p.full_name(),
            id: p.id,
            student_code: p.student_code,
            email: p.email,
            role: p.role.to_string(),
            department_id: p.department_id,
            classroom_id: p.classroom_id,
            year_level: p.year_level,
            active: p.active,
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}
