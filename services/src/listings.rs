//! What a signed-in profile gets to see on its home screens.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use db::models::activity::Model as Activity;
use db::models::announcement::Model as Announcement;
use db::models::profile::Model as Profile;
use serde::Serialize;

use crate::admission::{phase, ActivityPhase};
use crate::error::StoreError;
use crate::store::{ActivityQuery, ActivityStore, AnnouncementStore, AttendanceStore};
use crate::targeting::is_eligible;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityListing {
    #[serde(flatten)]
    pub activity: Activity,
    pub phase: ActivityPhase,
    pub checked_in: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementListing {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub expired: bool,
}

/// Active activities this profile is eligible for, earliest start first.
pub async fn list_activities_for<S>(
    store: &S,
    profile: &Profile,
    now: DateTime<Utc>,
) -> Result<Vec<ActivityListing>, StoreError>
where
    S: ActivityStore + AttendanceStore,
{
    let eligible: Vec<Activity> = store
        .query_activities(ActivityQuery::active())
        .await?
        .into_iter()
        .filter(|a| is_eligible(profile, a))
        .collect();

    let ids: Vec<i64> = eligible.iter().map(|a| a.id).collect();
    let checked: HashSet<i64> = store
        .checked_in_activity_ids(profile.id, &ids)
        .await?
        .into_iter()
        .collect();

    Ok(eligible
        .into_iter()
        .map(|activity| ActivityListing {
            phase: phase(&activity, now),
            checked_in: checked.contains(&activity.id),
            activity,
        })
        .collect())
}

/// Published announcements this profile is eligible for, newest first.
///
/// Expired ones stay in the list, labelled.
pub async fn list_announcements_for<S: AnnouncementStore>(
    store: &S,
    profile: &Profile,
    now: DateTime<Utc>,
) -> Result<Vec<AnnouncementListing>, StoreError> {
    Ok(store
        .query_published_announcements()
        .await?
        .into_iter()
        .filter(|a| is_eligible(profile, a))
        .map(|announcement| AnnouncementListing {
            expired: announcement.is_expired(now),
            announcement,
        })
        .collect())
}
