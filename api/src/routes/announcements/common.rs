use chrono::{DateTime, Utc};
use db::models::announcement::{Audience, Model as Announcement, Priority};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::common::validate_year_levels;

fn default_priority() -> Priority {
    Priority::Normal
}

fn default_audience() -> Audience {
    Audience::All
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default = "default_audience")]
    pub target_audience: Audience,
    #[serde(default)]
    pub target_classrooms: Vec<i64>,
    #[serde(default)]
    pub target_departments: Vec<i64>,
    #[serde(default)]
    #[validate(custom(function = "validate_year_levels"))]
    pub target_year_levels: Vec<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Publish right away instead of saving a draft.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

#[derive(Debug, Serialize, Default)]
pub struct AnnouncementResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub target_audience: String,
    pub target_classrooms: Vec<i64>,
    pub target_departments: Vec<i64>,
    pub target_year_levels: Vec<i32>,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
}

impl From<Announcement> for AnnouncementResponse {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            priority: a.priority.to_string(),
            target_audience: a.target_audience.to_string(),
            target_classrooms: a.target_classrooms.0.into_iter().collect(),
            target_departments: a.target_departments.0.into_iter().collect(),
            target_year_levels: a.target_year_levels.0.into_iter().collect(),
            is_published: a.is_published,
            published_at: a.published_at.map(|t| t.to_rfc3339()),
            expires_at: a.expires_at.map(|t| t.to_rfc3339()),
            created_at: a.created_at.to_rfc3339(),
        }
    }
}
