use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One profile checking into one activity. `(student_id, activity_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub activity_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub status: AttendanceStatus,
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "absent")]
    Absent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::StudentId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::activity::Entity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id",
        on_delete = "Cascade"
    )]
    Activity,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An attendance row that has been admitted but not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAttendanceRecord {
    pub student_id: i64,
    pub activity_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub photo_url: Option<String>,
    pub location: Option<String>,
    pub status: AttendanceStatus,
}

impl Model {
    /// Plain insert. A duplicate `(student_id, activity_id)` fails with a unique-constraint error.
    pub async fn insert_new(db: &DbConn, new: NewAttendanceRecord) -> Result<Model, DbErr> {
        ActiveModel {
            student_id: Set(new.student_id),
            activity_id: Set(new.activity_id),
            check_in_time: Set(new.check_in_time),
            check_out_time: Set(None),
            photo_url: Set(new.photo_url),
            location: Set(new.location),
            status: Set(new.status),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_for(
        db: &DbConn,
        student_id: i64,
        activity_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ActivityId.eq(activity_id))
            .one(db)
            .await
    }

    /// All records of one activity, most recent check-in first.
    pub async fn list_for_activity(db: &DbConn, activity_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .order_by_desc(Column::CheckInTime)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Activity ids this student has already checked into, out of `activity_ids`.
    pub async fn checked_in_activity_ids(
        db: &DbConn,
        student_id: i64,
        activity_ids: &[i64],
    ) -> Result<Vec<i64>, DbErr> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ActivityId.is_in(activity_ids.iter().copied()))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.activity_id).collect())
    }

    /// Stamps `check_out_time` on a record that has none yet.
    ///
    /// Returns `None` when the record is missing or already checked out, so two
    /// racing check-outs cannot both succeed.
    pub async fn check_out(
        db: &DbConn,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::CheckOutTime, Expr::value(at))
            .filter(Column::Id.eq(id))
            .filter(Column::CheckOutTime.is_null())
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Entity::find_by_id(id).one(db).await
    }
}
