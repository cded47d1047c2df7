//! Live attendee roster for one activity.
//!
//! [`LiveRoster`] is the pure merge-and-filter state. [`RosterAggregator`]
//! drives it from an initial snapshot plus the insert feed, with several
//! enrichment lookups in flight at once, and publishes the visible projection
//! on a `watch` channel.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use db::models::attendance_record::{AttendanceStatus, Model as AttendanceRecord};
use db::models::classroom::Model as Classroom;
use db::models::department::Model as Department;
use db::models::profile::Model as Profile;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::StoreError;
use crate::store::{FeedEvent, InsertSubscription, InsertedRecord, RosterStore};

/// One row of the roster: an attendance record joined with who made it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attendee {
    pub record_id: i64,
    pub activity_id: i64,
    pub student_id: i64,
    pub student_code: String,
    pub full_name: String,
    pub check_in_time: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub photo_url: Option<String>,
    pub classroom_id: Option<i64>,
    pub classroom_name: Option<String>,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub year_level: Option<i32>,
}

impl Attendee {
    pub fn from_parts(
        record: &AttendanceRecord,
        profile: &Profile,
        classroom: Option<&Classroom>,
        department: Option<&Department>,
    ) -> Self {
        Self {
            record_id: record.id,
            activity_id: record.activity_id,
            student_id: profile.id,
            student_code: profile.student_code.clone(),
            full_name: profile.full_name(),
            check_in_time: record.check_in_time,
            status: record.status,
            photo_url: record.photo_url.clone(),
            classroom_id: profile.classroom_id,
            classroom_name: classroom.map(|c| c.name.clone()),
            department_id: profile.department_id,
            department_name: department.map(|d| d.name.clone()),
            year_level: profile.year_level,
        }
    }
}

/// Facet filter over the roster. Every supplied field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RosterFilter {
    pub department: Option<i64>,
    pub classroom: Option<i64>,
    pub year_level: Option<i32>,
}

impl RosterFilter {
    pub fn matches(&self, attendee: &Attendee) -> bool {
        fn axis<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            wanted.is_none_or(|w| actual == Some(w))
        }

        axis(self.department, attendee.department_id)
            && axis(self.classroom, attendee.classroom_id)
            && axis(self.year_level, attendee.year_level)
    }
}

/// Merged roster state. `all` is kept newest first and unique by record id.
#[derive(Debug, Default)]
pub struct LiveRoster {
    all: Vec<Attendee>,
    live_ids: HashSet<i64>,
    filter: RosterFilter,
    visible: Vec<Attendee>,
}

impl LiveRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the roster with `snapshot`.
    ///
    /// Live arrivals the snapshot does not know about yet are kept, so a
    /// snapshot that finishes after a notification never loses that row.
    /// Loading the same snapshot twice leaves the same state.
    pub fn load_snapshot(&mut self, snapshot: Vec<Attendee>) {
        let in_snapshot: HashSet<i64> = snapshot.iter().map(|a| a.record_id).collect();
        let carried = self
            .all
            .drain(..)
            .filter(|a| self.live_ids.contains(&a.record_id) && !in_snapshot.contains(&a.record_id));

        let mut merged: Vec<Attendee> = carried.collect();
        merged.extend(snapshot);
        self.live_ids.retain(|id| !in_snapshot.contains(id));
        self.all = merged;
        self.normalize();
    }

    /// Adds a live arrival. Returns `false` if the record was already present.
    pub fn push_live(&mut self, attendee: Attendee) -> bool {
        if self.all.iter().any(|a| a.record_id == attendee.record_id) {
            return false;
        }
        self.live_ids.insert(attendee.record_id);
        self.all.push(attendee);
        self.normalize();
        true
    }

    pub fn apply_filter(&mut self, filter: RosterFilter) {
        self.filter = filter;
        self.recompute_visible();
    }

    pub fn filter(&self) -> &RosterFilter {
        &self.filter
    }

    pub fn all(&self) -> &[Attendee] {
        &self.all
    }

    pub fn visible(&self) -> &[Attendee] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    fn normalize(&mut self) {
        self.all.sort_by(|a, b| {
            b.check_in_time
                .cmp(&a.check_in_time)
                .then(b.record_id.cmp(&a.record_id))
        });
        self.all.dedup_by_key(|a| a.record_id);
        self.recompute_visible();
    }

    fn recompute_visible(&mut self) {
        self.visible = self
            .all
            .iter()
            .filter(|a| self.filter.matches(a))
            .cloned()
            .collect();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCount {
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterSummary {
    pub total: usize,
    pub by_department: Vec<DepartmentCount>,
}

/// Head count per department. Attendees without a department are grouped
/// under `None`, which sorts first.
pub fn summarize(attendees: &[Attendee]) -> RosterSummary {
    let mut groups: BTreeMap<Option<i64>, DepartmentCount> = BTreeMap::new();
    for a in attendees {
        groups
            .entry(a.department_id)
            .or_insert_with(|| DepartmentCount {
                department_id: a.department_id,
                department_name: a.department_name.clone(),
                count: 0,
            })
            .count += 1;
    }
    RosterSummary {
        total: attendees.len(),
        by_department: groups.into_values().collect(),
    }
}

#[derive(Debug, Clone)]
pub enum RosterCommand {
    Filter(RosterFilter),
    Reload,
}

enum Completed {
    Snapshot(Result<Vec<Attendee>, StoreError>),
    Enriched(InsertedRecord, Result<Attendee, StoreError>),
}

/// Owns a [`LiveRoster`] and keeps it current until shut down.
pub struct RosterAggregator<S> {
    store: S,
    activity_id: i64,
    roster: LiveRoster,
    visible_tx: watch::Sender<Vec<Attendee>>,
}

impl<S> RosterAggregator<S>
where
    S: RosterStore + Clone + 'static,
{
    /// Starts the aggregator on its own task.
    ///
    /// The snapshot is requested right away; notifications already on
    /// `subscription` are processed while it is loading.
    pub fn spawn(store: S, activity_id: i64, subscription: InsertSubscription) -> RosterHandle {
        let (visible_tx, visible_rx) = watch::channel(Vec::new());
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let aggregator = RosterAggregator {
            store,
            activity_id,
            roster: LiveRoster::new(),
            visible_tx,
        };
        let task = tokio::spawn(aggregator.run(subscription, cmd_rx, shutdown_rx));

        RosterHandle {
            commands: cmd_tx,
            visible: visible_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(
        mut self,
        mut subscription: InsertSubscription,
        mut commands: mpsc::Receiver<RosterCommand>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let mut pending: FuturesUnordered<BoxFuture<'static, Completed>> = FuturesUnordered::new();
        pending.push(self.snapshot());

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                event = subscription.recv() => match event {
                    Some(FeedEvent::Inserted(record)) if record.activity_id == self.activity_id => {
                        pending.push(self.enrich(record));
                    }
                    Some(FeedEvent::Inserted(record)) => {
                        tracing::debug!(record_id = record.id, "ignoring insert for another activity");
                    }
                    Some(FeedEvent::Lagged(missed)) => {
                        tracing::warn!(activity_id = self.activity_id, missed, "insert feed lagged, reloading roster");
                        pending.push(self.snapshot());
                    }
                    None => break,
                },

                Some(done) = pending.next(), if !pending.is_empty() => self.complete(done),

                cmd = commands.recv() => match cmd {
                    Some(RosterCommand::Filter(filter)) => {
                        self.roster.apply_filter(filter);
                        self.publish();
                    }
                    Some(RosterCommand::Reload) => pending.push(self.snapshot()),
                    None => break,
                },
            }
        }

        subscription.unsubscribe().await;
        tracing::debug!(activity_id = self.activity_id, "roster aggregator stopped");
    }

    fn snapshot(&self) -> BoxFuture<'static, Completed> {
        let store = self.store.clone();
        let activity_id = self.activity_id;
        Box::pin(async move { Completed::Snapshot(store.fetch_roster(activity_id).await) })
    }

    fn enrich(&self, record: InsertedRecord) -> BoxFuture<'static, Completed> {
        let store = self.store.clone();
        Box::pin(async move {
            let result = store.fetch_attendee(record.clone()).await;
            Completed::Enriched(record, result)
        })
    }

    fn complete(&mut self, done: Completed) {
        match done {
            Completed::Snapshot(Ok(snapshot)) => {
                self.roster.load_snapshot(snapshot);
                self.publish();
            }
            Completed::Snapshot(Err(e)) => {
                tracing::warn!(activity_id = self.activity_id, "roster snapshot failed: {e}");
            }
            Completed::Enriched(_, Ok(attendee)) => {
                if self.roster.push_live(attendee) {
                    self.publish();
                }
            }
            Completed::Enriched(record, Err(e)) => {
                tracing::warn!(
                    activity_id = self.activity_id,
                    record_id = record.id,
                    student_id = record.student_id,
                    "enrichment failed, dropping notification: {e}"
                );
            }
        }
    }

    fn publish(&self) {
        self.visible_tx.send_replace(self.roster.visible().to_vec());
    }
}

/// Control side of a running [`RosterAggregator`]. Dropping it stops the loop.
pub struct RosterHandle {
    commands: mpsc::Sender<RosterCommand>,
    visible: watch::Receiver<Vec<Attendee>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RosterHandle {
    /// Receiver of the visible projection; updated on every change.
    pub fn visible(&self) -> watch::Receiver<Vec<Attendee>> {
        self.visible.clone()
    }

    pub async fn set_filter(&self, filter: RosterFilter) -> bool {
        self.commands.send(RosterCommand::Filter(filter)).await.is_ok()
    }

    pub async fn reload(&self) -> bool {
        self.commands.send(RosterCommand::Reload).await.is_ok()
    }

    /// Stops the loop and waits for it to release its subscription.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("roster aggregator task failed: {e}");
            }
        }
    }
}

impl Drop for RosterHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
