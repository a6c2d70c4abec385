//! Session storage backends

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::id::SessionId;
use super::registry::SessionRecord;

/// Storage for session records
///
/// Every method is atomic per record: a lookup sees either the old record or its
/// replacement, never a mix.
pub trait SessionStore: Send + Sync {
    /// Current record for a session
    fn get(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Insert a record, replacing and returning any existing one for the same id
    ///
    /// A replacement inherits the existing record's `session_started_at`.
    fn upsert(&self, record: SessionRecord) -> Option<SessionRecord>;

    /// Remove and return a session's record
    fn remove(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Remove and return every record created before `cutoff`
    fn remove_created_before(&self, cutoff: DateTime<Utc>) -> Vec<SessionRecord>;

    /// Number of live records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store over a concurrent map
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<SessionId, SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    fn upsert(&self, mut record: SessionRecord) -> Option<SessionRecord> {
        match self.records.entry(record.session_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                record.session_started_at = entry.get().session_started_at;
                Some(entry.insert(record))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(record);
                None
            }
        }
    }

    fn remove(&self, id: &SessionId) -> Option<SessionRecord> {
        self.records.remove(id).map(|(_, record)| record)
    }

    fn remove_created_before(&self, cutoff: DateTime<Utc>) -> Vec<SessionRecord> {
        let candidates: Vec<SessionId> = self
            .records
            .iter()
            .filter(|entry| entry.created_at < cutoff)
            .map(|entry| entry.key().clone())
            .collect();

        // Re-check under the shard lock; the record may have been rebound meanwhile
        candidates
            .into_iter()
            .filter_map(|id| {
                self.records
                    .remove_if(&id, |_, record| record.created_at < cutoff)
                    .map(|(_, record)| record)
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractedDocument, ExtractionMethod};
    use std::sync::Arc;

    fn record(id: &str, created_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            session_id: SessionId::parse(id).unwrap(),
            document: Arc::new(ExtractedDocument::new(
                "text".to_string(),
                ExtractionMethod::Direct,
                1,
            )),
            backing_files: Vec::new(),
            created_at,
            session_started_at: created_at,
        }
    }

    #[test]
    fn test_upsert_keeps_session_start() {
        let store = MemoryStore::new();
        let first = Utc::now() - chrono::Duration::seconds(60);
        let second = Utc::now();

        assert!(store.upsert(record("session-aaaa", first)).is_none());
        let old = store.upsert(record("session-aaaa", second)).unwrap();
        assert_eq!(old.created_at, first);

        let current = store.get(&SessionId::parse("session-aaaa").unwrap()).unwrap();
        assert_eq!(current.created_at, second);
        assert_eq!(current.session_started_at, first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_created_before() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.upsert(record("session-old1", now - chrono::Duration::seconds(100)));
        store.upsert(record("session-new1", now));

        let removed = store.remove_created_before(now - chrono::Duration::seconds(10));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].session_id.as_str(), "session-old1");
        assert_eq!(store.len(), 1);

        assert!(store.remove(&SessionId::parse("session-new1").unwrap()).is_some());
        assert!(store.is_empty());
    }
}
