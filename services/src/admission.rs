//! Check-in admission.
//!
//! Preconditions run in a fixed order and the first failure wins:
//! status, time window, audience, prior record, photo. The prior-record lookup
//! is only fast feedback; the store's unique index on `(student, activity)` is
//! what actually prevents a double check-in.

use chrono::{DateTime, Utc};
use db::models::activity::{ActivityStatus, Model as Activity};
use db::models::attendance_record::{AttendanceStatus, Model as AttendanceRecord, NewAttendanceRecord};
use db::models::profile::Model as Profile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;
use crate::store::AttendanceStore;
use crate::targeting::is_eligible;

/// Time-derived state of an activity. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityPhase {
    Upcoming,
    Open,
    Ended,
    Unavailable,
}

/// Phase of `activity` at `now`. The window is inclusive on both ends.
pub fn phase(activity: &Activity, now: DateTime<Utc>) -> ActivityPhase {
    if activity.status != ActivityStatus::Active {
        ActivityPhase::Unavailable
    } else if now < activity.start_time {
        ActivityPhase::Upcoming
    } else if now > activity.end_time {
        ActivityPhase::Ended
    } else {
        ActivityPhase::Open
    }
}

/// Why a check-in was refused. The display text is what the user sees.
#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("This activity is not open")]
    ActivityUnavailable,

    #[error("This activity has not started")]
    ActivityNotYetOpen,

    #[error("This activity has ended")]
    ActivityEnded,

    #[error("You are not eligible for this activity")]
    NotEligible,

    #[error("You have already checked in")]
    AlreadyCheckedIn,

    /// Not terminal: capture a photo and retry.
    #[error("A photo is required to check in")]
    PhotoRequired,

    #[error("Could not connect, please try again")]
    Store(#[from] StoreError),
}

impl CheckInError {
    /// Whether retrying with more input (a photo) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckInError::PhotoRequired | CheckInError::Store(_))
    }
}

/// Why a check-out was refused.
#[derive(Debug, Error)]
pub enum CheckOutError {
    #[error("You have not checked in to this activity")]
    NotCheckedIn,

    #[error("You have already checked out")]
    AlreadyCheckedOut,

    #[error("Could not connect, please try again")]
    Store(#[from] StoreError),
}

/// What the client sends along with a check-in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInRequest {
    pub photo_url: Option<String>,
    pub location: Option<String>,
}

/// The store-free part of admission: status, window and audience.
pub fn admit(profile: &Profile, activity: &Activity, now: DateTime<Utc>) -> Result<(), CheckInError> {
    match phase(activity, now) {
        ActivityPhase::Unavailable => return Err(CheckInError::ActivityUnavailable),
        ActivityPhase::Upcoming => return Err(CheckInError::ActivityNotYetOpen),
        ActivityPhase::Ended => return Err(CheckInError::ActivityEnded),
        ActivityPhase::Open => {}
    }

    if !is_eligible(profile, activity) {
        return Err(CheckInError::NotEligible);
    }
    Ok(())
}

pub struct AdmissionController<S> {
    store: S,
}

impl<S: AttendanceStore> AdmissionController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs every precondition and, on success, persists a `present` record
    /// stamped with `now`.
    pub async fn check_in(
        &self,
        profile: &Profile,
        activity: &Activity,
        request: CheckInRequest,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, CheckInError> {
        admit(profile, activity, now)?;

        if self
            .store
            .find_attendance_record(profile.id, activity.id)
            .await?
            .is_some()
        {
            return Err(CheckInError::AlreadyCheckedIn);
        }

        let photo_url = request.photo_url.filter(|p| !p.trim().is_empty());
        if activity.requires_photo && photo_url.is_none() {
            return Err(CheckInError::PhotoRequired);
        }

        let record = NewAttendanceRecord {
            student_id: profile.id,
            activity_id: activity.id,
            check_in_time: now,
            photo_url,
            location: request.location,
            status: AttendanceStatus::Present,
        };

        match self.store.insert_attendance_record(record).await {
            Ok(saved) => {
                tracing::info!(
                    record_id = saved.id,
                    student_id = profile.id,
                    activity_id = activity.id,
                    "check-in recorded"
                );
                Ok(saved)
            }
            Err(StoreError::Conflict(reason)) => {
                tracing::debug!(student_id = profile.id, activity_id = activity.id, "{reason}");
                Err(CheckInError::AlreadyCheckedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Closes the caller's record for `activity` at `now`. The activity's
    /// status and window are not consulted, only the record's own state.
    pub async fn check_out(
        &self,
        profile: &Profile,
        activity: &Activity,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord, CheckOutError> {
        let Some(record) = self
            .store
            .find_attendance_record(profile.id, activity.id)
            .await?
        else {
            return Err(CheckOutError::NotCheckedIn);
        };
        if record.check_out_time.is_some() {
            return Err(CheckOutError::AlreadyCheckedOut);
        }

        match self.store.check_out_attendance_record(record.id, now).await {
            Ok(saved) => {
                tracing::info!(
                    record_id = saved.id,
                    student_id = profile.id,
                    activity_id = activity.id,
                    "check-out recorded"
                );
                Ok(saved)
            }
            Err(StoreError::Conflict(_)) => Err(CheckOutError::AlreadyCheckedOut),
            Err(e) => Err(e.into()),
        }
    }
}
