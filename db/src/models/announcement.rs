use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::targets::{IdSet, YearSet};

/// A targeted informational item. Expiry is evaluated by readers, not enforced by queries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub target_audience: Audience,
    #[sea_orm(column_type = "Json")]
    pub target_classrooms: IdSet,
    #[sea_orm(column_type = "Json")]
    pub target_departments: IdSet,
    #[sea_orm(column_type = "Json")]
    pub target_year_levels: YearSet,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "announcement_priority_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// Audience category an announcement is addressed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "announcement_audience_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Audience {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "students")]
    Students,
    #[sea_orm(string_value = "teachers")]
    Teachers,
    #[sea_orm(string_value = "staff")]
    Staff,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub target_audience: Audience,
    pub target_classrooms: IdSet,
    pub target_departments: IdSet,
    pub target_year_levels: YearSet,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewAnnouncement {
    pub fn for_audience(title: &str, content: &str, audience: Audience) -> Self {
        Self {
            title: title.to_owned(),
            content: content.to_owned(),
            priority: Priority::Normal,
            target_audience: audience,
            target_classrooms: IdSet::default(),
            target_departments: IdSet::default(),
            target_year_levels: YearSet::default(),
            expires_at: None,
        }
    }
}

impl Model {
    /// Inserts an announcement, either as a draft or already published at `now`.
    pub async fn create(db: &DbConn, new: NewAnnouncement, publish: bool) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            title: Set(new.title),
            content: Set(new.content),
            priority: Set(new.priority),
            target_audience: Set(new.target_audience),
            target_classrooms: Set(new.target_classrooms),
            target_departments: Set(new.target_departments),
            target_year_levels: Set(new.target_year_levels),
            is_published: Set(publish),
            published_at: Set(publish.then_some(now)),
            expires_at: Set(new.expires_at),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Publishing stamps `published_at`; unpublishing clears it.
    pub async fn publish(db: &DbConn, id: i64, publish: bool) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            is_published: Set(publish),
            published_at: Set(publish.then(Utc::now)),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// Published announcements, newest first. Expired ones are included.
    pub async fn list_published(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsPublished.eq(true))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}
