use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::targets::{IdSet, YearSet};

/// A schedulable event students check into during `[start_time, end_time]`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ActivityStatus,
    pub requires_photo: bool,
    #[sea_orm(column_type = "Json")]
    pub target_classrooms: IdSet,
    #[sea_orm(column_type = "Json")]
    pub target_departments: IdSet,
    #[sea_orm(column_type = "Json")]
    pub target_year_levels: YearSet,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "activity_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActivityStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "inactive")]
    Inactive,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::CreatedBy",
        to = "super::profile::Column::Id",
        on_delete = "SetNull"
    )]
    Creator,

    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub requires_photo: bool,
    pub target_classrooms: IdSet,
    pub target_departments: IdSet,
    pub target_year_levels: YearSet,
    pub created_by: Option<i64>,
}

impl NewActivity {
    /// An untargeted, photo-free activity running over the given window.
    pub fn open_to_all(title: &str, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            title: title.to_owned(),
            description: String::new(),
            location: String::new(),
            start_time,
            end_time,
            requires_photo: false,
            target_classrooms: IdSet::default(),
            target_departments: IdSet::default(),
            target_year_levels: YearSet::default(),
            created_by: None,
        }
    }
}

impl Model {
    /// Inserts a new activity in the `active` status.
    pub async fn create(db: &DbConn, new: NewActivity) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            location: Set(new.location),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            status: Set(ActivityStatus::Active),
            requires_photo: Set(new.requires_photo),
            target_classrooms: Set(new.target_classrooms),
            target_departments: Set(new.target_departments),
            target_year_levels: Set(new.target_year_levels),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn set_status(db: &DbConn, id: i64, status: ActivityStatus) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            status: Set(status),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// Activities with the given status (any status for `None`), earliest start first.
    pub async fn list_by_status(
        db: &DbConn,
        status: Option<ActivityStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }
        query
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }
}
