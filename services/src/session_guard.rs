//! Session guard.
//!
//! One canonical expiry and role check, run before any protected operation.
//! The guard never refreshes a session; the only write it performs is
//! clearing an expired one from its store.

use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use db::models::profile::{Model as Profile, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use util::config;

use crate::error::StoreError;

/// Cached credential bundle: who signed in, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub profile: Profile,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(profile: Profile, issued_at: DateTime<Utc>) -> Self {
        Self { profile, issued_at }
    }

    /// A session is expired once its age reaches `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.issued_at >= ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardFailure {
    #[error("Please sign in")]
    NoSession,

    #[error("Your session has expired, please sign in again")]
    Expired,

    #[error("You do not have permission to access this page")]
    WrongRole,

    #[error("This account has been disabled")]
    Inactive,
}

/// Persistence for the locally cached session.
pub trait SessionStore: Send + Sync {
    fn persist_session(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load_session(&self) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    fn clear_session(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct SessionGuard {
    ttl: Duration,
}

impl SessionGuard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Guard using the configured `SESSION_TTL_HOURS`.
    pub fn from_config() -> Self {
        Self::new(config::session_ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read-only check of `session` against `required`.
    pub fn check<'a>(
        &self,
        session: Option<&'a Session>,
        required: Role,
        now: DateTime<Utc>,
    ) -> Result<&'a Session, GuardFailure> {
        let session = session.ok_or(GuardFailure::NoSession)?;
        if session.is_expired(self.ttl, now) {
            return Err(GuardFailure::Expired);
        }
        if !session.profile.active {
            return Err(GuardFailure::Inactive);
        }
        if !session.profile.role.satisfies(required) {
            return Err(GuardFailure::WrongRole);
        }
        Ok(session)
    }

    /// Loads the cached session and checks it, clearing it when expired.
    ///
    /// An unreadable cache is treated as no session.
    pub async fn enforce<S: SessionStore>(
        &self,
        store: &S,
        required: Role,
        now: DateTime<Utc>,
    ) -> Result<Session, GuardFailure> {
        let session = match store.load_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("could not read cached session: {e}");
                None
            }
        };

        let outcome = self.check(session.as_ref(), required, now).map(|_| ());
        match outcome {
            Ok(()) => session.ok_or(GuardFailure::NoSession),
            Err(GuardFailure::Expired) => {
                if let Err(e) = store.clear_session().await {
                    tracing::warn!("could not clear expired session: {e}");
                }
                Err(GuardFailure::Expired)
            }
            Err(failure) => Err(failure),
        }
    }
}

/// Session cached as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured `SESSION_FILE`.
    pub fn from_config() -> Self {
        Self::new(config::session_file())
    }
}

impl SessionStore for FileSessionStore {
    async fn persist_session(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<Session>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    async fn persist_session(&self, session: &Session) -> Result<(), StoreError> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}
