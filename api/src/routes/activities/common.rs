use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use db::models::activity::{ActivityStatus, Model as Activity};
use db::models::attendance_record::Model as AttendanceRecord;
use serde::{Deserialize, Serialize};
use services::admission::{CheckInError, CheckOutError};
use services::roster::RosterFilter;
use validator::Validate;

use crate::routes::common::validate_year_levels;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub requires_photo: bool,
    #[serde(default)]
    pub target_classrooms: Vec<i64>,
    #[serde(default)]
    pub target_departments: Vec<i64>,
    #[serde(default)]
    #[validate(custom(function = "validate_year_levels"))]
    pub target_year_levels: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ActivityStatus,
}

#[derive(Debug, Serialize, Default)]
pub struct ActivityResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub requires_photo: bool,
    pub target_classrooms: Vec<i64>,
    pub target_departments: Vec<i64>,
    pub target_year_levels: Vec<i32>,
    pub created_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            location: a.location,
            start_time: a.start_time.to_rfc3339(),
            end_time: a.end_time.to_rfc3339(),
            status: a.status.to_string(),
            requires_photo: a.requires_photo,
            target_classrooms: a.target_classrooms.0.into_iter().collect(),
            target_departments: a.target_departments.0.into_iter().collect(),
            target_year_levels: a.target_year_levels.0.into_iter().collect(),
            created_by: a.created_by,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub student_id: i64,
    pub activity_id: i64,
    pub check_in_time: String,
    pub check_out_time: Option<String>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub status: String,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id,
            activity_id: r.activity_id,
            check_in_time: r.check_in_time.to_rfc3339(),
            check_out_time: r.check_out_time.map(|t| t.to_rfc3339()),
            photo_url: r.photo_url,
            location: r.location,
            status: r.status.to_string(),
        }
    }
}

/// Raw roster query string. Blank values mean "no filter on this axis".
#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub department: Option<String>,
    pub classroom: Option<String>,
    pub year_level: Option<String>,
}

fn parse_axis<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {name} filter '{v}'")),
    }
}

impl RosterQuery {
    pub fn into_filter(self) -> Result<RosterFilter, String> {
        Ok(RosterFilter {
            department: parse_axis("department", self.department.as_deref())?,
            classroom: parse_axis("classroom", self.classroom.as_deref())?,
            year_level: parse_axis("year_level", self.year_level.as_deref())?,
        })
    }
}

/// HTTP status for a refused check-in.
pub fn check_in_status(err: &CheckInError) -> StatusCode {
    match err {
        CheckInError::ActivityUnavailable
        | CheckInError::ActivityNotYetOpen
        | CheckInError::ActivityEnded => StatusCode::BAD_REQUEST,
        CheckInError::NotEligible => StatusCode::FORBIDDEN,
        CheckInError::AlreadyCheckedIn => StatusCode::CONFLICT,
        CheckInError::PhotoRequired => StatusCode::UNPROCESSABLE_ENTITY,
        CheckInError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// HTTP status for a refused check-out.
pub fn check_out_status(err: &CheckOutError) -> StatusCode {
    match err {
        CheckOutError::NotCheckedIn => StatusCode::BAD_REQUEST,
        CheckOutError::AlreadyCheckedOut => StatusCode::CONFLICT,
        CheckOutError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
