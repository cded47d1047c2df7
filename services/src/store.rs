//! Capabilities the decision components need from the external store, and the
//! SeaORM-backed implementation used by the server.
//!
//! Inserts of attendance records are also published on a per-activity topic of
//! the [`WebSocketManager`], which is what [`InsertFeed`] subscribers consume.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use db::models::activity::{self, ActivityStatus, Model as Activity};
use db::models::announcement::Model as Announcement;
use db::models::attendance_record::{Model as AttendanceRecord, NewAttendanceRecord};
use db::models::profile::{self, Model as Profile};
use db::models::{classroom, department};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use util::state::AppState;
use util::ws::{emit, Receiver, ReceivedEvent, WebSocketManager};

use crate::error::StoreError;
use crate::roster::Attendee;

/// Event name published after an attendance record is persisted.
pub const ATTENDANCE_INSERTED: &str = "attendance.inserted";

/// Topic carrying insert notifications for one activity.
pub fn attendance_topic(activity_id: i64) -> String {
    format!("attendance:activity:{activity_id}")
}

pub trait ProfileStore: Send + Sync {
    fn fetch_profile(&self, id: i64) -> impl Future<Output = Result<Profile, StoreError>> + Send;
}

/// Filter for [`ActivityStore::query_activities`]. `status: None` matches every status.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub status: Option<ActivityStatus>,
    pub limit: Option<u64>,
}

impl ActivityQuery {
    pub fn active() -> Self {
        Self {
            status: Some(ActivityStatus::Active),
            limit: None,
        }
    }
}

pub trait ActivityStore: Send + Sync {
    fn fetch_activity(&self, id: i64)
    -> impl Future<Output = Result<Activity, StoreError>> + Send;

    /// Matching activities, earliest start first.
    fn query_activities(
        &self,
        query: ActivityQuery,
    ) -> impl Future<Output = Result<Vec<Activity>, StoreError>> + Send;
}

pub trait AnnouncementStore: Send + Sync {
    /// Published announcements, newest first, expired ones included.
    fn query_published_announcements(
        &self,
    ) -> impl Future<Output = Result<Vec<Announcement>, StoreError>> + Send;
}

pub trait AttendanceStore: Send + Sync {
    fn find_attendance_record(
        &self,
        student_id: i64,
        activity_id: i64,
    ) -> impl Future<Output = Result<Option<AttendanceRecord>, StoreError>> + Send;

    /// Persists a record. A second record for the same student and activity
    /// fails with [`StoreError::Conflict`].
    fn insert_attendance_record(
        &self,
        record: NewAttendanceRecord,
    ) -> impl Future<Output = Result<AttendanceRecord, StoreError>> + Send;

    /// Records of one activity, most recent check-in first.
    fn query_attendance_records(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, StoreError>> + Send;

    fn checked_in_activity_ids(
        &self,
        student_id: i64,
        activity_ids: &[i64],
    ) -> impl Future<Output = Result<Vec<i64>, StoreError>> + Send;

    /// Stamps the check-out time of a record. A record that is already
    /// checked out fails with [`StoreError::Conflict`].
    fn check_out_attendance_record(
        &self,
        record_id: i64,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<AttendanceRecord, StoreError>> + Send;
}

/// Lookups that turn bare attendance rows into display-ready attendees.
pub trait RosterStore: Send + Sync {
    /// Resolves the profile, classroom and department behind one inserted row.
    fn fetch_attendee(
        &self,
        record: InsertedRecord,
    ) -> impl Future<Output = Result<Attendee, StoreError>> + Send;

    /// Full roster of an activity, most recent check-in first.
    fn fetch_roster(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = Result<Vec<Attendee>, StoreError>> + Send;
}

pub trait InsertFeed: Send + Sync {
    fn subscribe_to_inserts(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = InsertSubscription> + Send;
}

/// Key fields of a freshly inserted attendance record, as carried by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertedRecord {
    pub id: i64,
    pub student_id: i64,
    pub activity_id: i64,
    pub check_in_time: DateTime<Utc>,
}

impl From<&AttendanceRecord> for InsertedRecord {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            activity_id: record.activity_id,
            check_in_time: record.check_in_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Inserted(InsertedRecord),
    /// The subscriber fell behind and `n` notifications were lost.
    Lagged(u64),
}

/// Live stream of insert notifications for one activity.
///
/// Dropping it detaches the receiver; [`InsertSubscription::unsubscribe`]
/// additionally releases the topic when nobody else listens.
pub struct InsertSubscription {
    topic: String,
    rx: Receiver,
    ws: WebSocketManager,
}

impl InsertSubscription {
    pub async fn open(ws: &WebSocketManager, activity_id: i64) -> Self {
        let topic = attendance_topic(activity_id);
        let rx = ws.subscribe(&topic).await;
        Self {
            topic,
            rx,
            ws: ws.clone(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next notification, or `None` once the feed is closed.
    ///
    /// Malformed frames are logged and skipped. Cancel safe.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        loop {
            match self.rx.recv().await {
                Ok(raw) => match serde_json::from_str::<ReceivedEvent<InsertedRecord>>(&raw) {
                    Ok(ev) if ev.event == ATTENDANCE_INSERTED => {
                        return Some(FeedEvent::Inserted(ev.payload));
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!(topic = %self.topic, "dropping malformed insert event: {e}");
                    }
                },
                Err(RecvError::Lagged(n)) => return Some(FeedEvent::Lagged(n)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub async fn unsubscribe(self) {
        let InsertSubscription { topic, rx, ws } = self;
        drop(rx);
        ws.prune(&topic).await;
    }
}

/// The production store: SQLite through SeaORM plus the in-process broker.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    ws: WebSocketManager,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self { db, ws }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.db_clone(), state.ws_clone())
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl ProfileStore for SeaOrmStore {
    async fn fetch_profile(&self, id: i64) -> Result<Profile, StoreError> {
        profile::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::not_found("profile", id))
    }
}

impl ActivityStore for SeaOrmStore {
    async fn fetch_activity(&self, id: i64) -> Result<Activity, StoreError> {
        activity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::not_found("activity", id))
    }

    async fn query_activities(&self, query: ActivityQuery) -> Result<Vec<Activity>, StoreError> {
        Ok(Activity::list_by_status(&self.db, query.status, query.limit).await?)
    }
}

impl AnnouncementStore for SeaOrmStore {
    async fn query_published_announcements(&self) -> Result<Vec<Announcement>, StoreError> {
        Ok(Announcement::list_published(&self.db).await?)
    }
}

impl AttendanceStore for SeaOrmStore {
    async fn find_attendance_record(
        &self,
        student_id: i64,
        activity_id: i64,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(AttendanceRecord::find_for(&self.db, student_id, activity_id).await?)
    }

    async fn insert_attendance_record(
        &self,
        record: NewAttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let (student_id, activity_id) = (record.student_id, record.activity_id);
        let model = match AttendanceRecord::insert_new(&self.db, record).await {
            Ok(model) => model,
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::Conflict(format!(
                    "student {student_id} already has a record for activity {activity_id}"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        emit(
            &self.ws,
            &attendance_topic(model.activity_id),
            ATTENDANCE_INSERTED,
            &InsertedRecord::from(&model),
        )
        .await;
        Ok(model)
    }

    async fn query_attendance_records(
        &self,
        activity_id: i64,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(AttendanceRecord::list_for_activity(&self.db, activity_id).await?)
    }

    async fn checked_in_activity_ids(
        &self,
        student_id: i64,
        activity_ids: &[i64],
    ) -> Result<Vec<i64>, StoreError> {
        Ok(AttendanceRecord::checked_in_activity_ids(&self.db, student_id, activity_ids).await?)
    }

    async fn check_out_attendance_record(
        &self,
        record_id: i64,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, StoreError> {
        if let Some(model) = AttendanceRecord::check_out(&self.db, record_id, at).await? {
            return Ok(model);
        }
        match db::models::AttendanceRecord::find_by_id(record_id)
            .one(&self.db)
            .await?
        {
            Some(_) => Err(StoreError::Conflict(format!(
                "attendance record {record_id} is already checked out"
            ))),
            None => Err(StoreError::not_found("attendance record", record_id)),
        }
    }
}

impl RosterStore for SeaOrmStore {
    async fn fetch_attendee(&self, record: InsertedRecord) -> Result<Attendee, StoreError> {
        let row = db::models::AttendanceRecord::find_by_id(record.id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::not_found("attendance record", record.id))?;
        let profile = self.fetch_profile(row.student_id).await?;

        let classroom = match profile.classroom_id {
            Some(id) => classroom::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };
        let department = match profile.department_id {
            Some(id) => department::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        Ok(Attendee::from_parts(
            &row,
            &profile,
            classroom.as_ref(),
            department.as_ref(),
        ))
    }

    async fn fetch_roster(&self, activity_id: i64) -> Result<Vec<Attendee>, StoreError> {
        let rows = AttendanceRecord::list_for_activity(&self.db, activity_id).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let profiles: HashMap<i64, Profile> = profile::Entity::find()
            .filter(profile::Column::Id.is_in(rows.iter().map(|r| r.student_id)))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let classrooms: HashMap<i64, classroom::Model> = classroom::Entity::find()
            .filter(
                classroom::Column::Id.is_in(profiles.values().filter_map(|p| p.classroom_id)),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let departments: HashMap<i64, department::Model> = department::Entity::find()
            .filter(
                department::Column::Id.is_in(profiles.values().filter_map(|p| p.department_id)),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let mut attendees = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(profile) = profiles.get(&row.student_id) else {
                tracing::warn!(record_id = row.id, "attendance row without a profile, skipping");
                continue;
            };
            attendees.push(Attendee::from_parts(
                row,
                profile,
                profile.classroom_id.and_then(|id| classrooms.get(&id)),
                profile.department_id.and_then(|id| departments.get(&id)),
            ));
        }
        Ok(attendees)
    }
}

impl InsertFeed for SeaOrmStore {
    async fn subscribe_to_inserts(&self, activity_id: i64) -> InsertSubscription {
        InsertSubscription::open(&self.ws, activity_id).await
    }
}
