//! Session registry: binds extraction results to callers and expires them

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::files::remove_backing_files;
use super::id::SessionId;
use super::store::{MemoryStore, SessionStore};
use crate::error::{Error, Result};
use crate::types::ExtractedDocument;

/// A session's live document and the files that back it
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub document: Arc<ExtractedDocument>,
    /// Files owned by this record, deleted when it is replaced, evicted or swept
    pub backing_files: Vec<PathBuf>,
    /// When this record was bound
    pub created_at: DateTime<Utc>,
    /// When the session id was first bound
    pub session_started_at: DateTime<Utc>,
}

/// Maps session ids to their most recent extraction
///
/// Records are removed from the store before their files are deleted, so a lookup
/// never returns a record whose files are gone.
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    ttl: chrono::Duration,
}

impl SessionRegistry {
    /// Create a registry over the given store
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self { store, ttl }
    }

    /// Create a registry over an in-memory store
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), ttl)
    }

    /// Bind a document to a session, replacing any previous one
    ///
    /// The previous record's files are deleted after the new record is visible.
    pub fn bind(
        &self,
        session_id: &str,
        document: ExtractedDocument,
        backing_files: Vec<PathBuf>,
    ) -> Result<SessionRecord> {
        let session_id = SessionId::parse(session_id)?;
        let now = Utc::now();
        let mut record = SessionRecord {
            session_id: session_id.clone(),
            document: Arc::new(document),
            backing_files,
            created_at: now,
            session_started_at: now,
        };

        if let Some(old) = self.store.upsert(record.clone()) {
            tracing::info!("Session {} rebound, retiring previous document", session_id);
            record.session_started_at = old.session_started_at;
            let stale: Vec<PathBuf> = old
                .backing_files
                .into_iter()
                .filter(|path| !record.backing_files.contains(path))
                .collect();
            remove_backing_files(&stale);
        }

        Ok(record)
    }

    /// Current record for a session
    pub fn lookup(&self, session_id: &str) -> Result<SessionRecord> {
        let id = SessionId::parse(session_id)?;
        self.store
            .get(&id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Remove a session and delete its files
    ///
    /// Returns whether a record existed.
    pub fn evict(&self, session_id: &str) -> Result<bool> {
        let id = SessionId::parse(session_id)?;
        match self.store.remove(&id) {
            Some(record) => {
                remove_backing_files(&record.backing_files);
                tracing::info!("Session {} evicted", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every record whose `created_at + ttl` is before `now`
    ///
    /// Returns the number of records removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let Some(cutoff) = now.checked_sub_signed(self.ttl) else {
            return 0;
        };

        let expired = self.store.remove_created_before(cutoff);
        for record in &expired {
            remove_backing_files(&record.backing_files);
            tracing::debug!("Session {} expired", record.session_id);
        }

        if !expired.is_empty() {
            tracing::info!("Swept {} expired sessions", expired.len());
        }
        expired.len()
    }

    /// Run `sweep` every `interval` on the tokio runtime
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.sweep(Utc::now());
            }
        })
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Record lifetime
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }
}
