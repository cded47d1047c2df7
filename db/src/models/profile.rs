use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A person known to the system: student, teacher, staff member or admin.
///
/// Profiles are never hard-deleted in normal flow; `active = false` soft-disables one.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// School-issued student or staff code.
    pub student_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub classroom_id: Option<i64>,
    /// Year level 1 to 5, students only.
    pub year_level: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role of a profile, ordered by privilege through [`Role::rank`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "profile_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "staff")]
    Staff,

    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Privilege rank: students lowest, admins highest. Teachers and staff share a rank.
    pub fn rank(self) -> u8 {
        match self {
            Role::Student => 0,
            Role::Teacher | Role::Staff => 1,
            Role::Admin => 2,
        }
    }

    /// Whether this role is at least as privileged as `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "SetNull"
    )]
    Department,

    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id",
        on_delete = "SetNull"
    )]
    Classroom,

    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields needed to register a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub student_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub classroom_id: Option<i64>,
    pub year_level: Option<i32>,
}

impl NewProfile {
    /// A student with no classroom, department or year assigned yet.
    pub fn student(student_code: &str) -> Self {
        Self {
            student_code: student_code.to_owned(),
            email: format!("{}@school.test", student_code.to_lowercase()),
            first_name: student_code.to_owned(),
            last_name: String::new(),
            role: Role::Student,
            department_id: None,
            classroom_id: None,
            year_level: None,
        }
    }
}

impl Model {
    pub async fn create(db: &DbConn, new: NewProfile) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            student_code: Set(new.student_code),
            email: Set(new.email),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            role: Set(new.role),
            department_id: Set(new.department_id),
            classroom_id: Set(new.classroom_id),
            year_level: Set(new.year_level),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Soft-enables or soft-disables a profile.
    pub async fn set_active(db: &DbConn, id: i64, active: bool) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    /// Every profile, optionally of one role, ordered by student code.
    pub async fn list(db: &DbConn, role: Option<Role>) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();
        if let Some(role) = role {
            query = query.filter(Column::Role.eq(role));
        }
        query.order_by_asc(Column::StudentCode).all(db).await
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
