//! In-memory accumulation of merged player records while the per-player
//! history fetches are in flight. Keyed by primary id; safe for concurrent
//! writers.

use std::sync::Arc;

use dashmap::DashMap;

use crate::types::{MatchRecord, PlayerRecord};

pub struct MergeIndex {
    records: DashMap<u32, PlayerRecord>,
}

impl MergeIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { records: DashMap::new() })
    }

    pub fn upsert(&self, record: PlayerRecord) {
        self.records.insert(record.id, record);
    }

    /// The whitelist merge step: the only secondary attribute allowed onto
    /// a primary record is the match log. Returns false when `id` is not
    /// in the index (a resolver link to a player the feed no longer serves).
    pub fn attach_history(&self, id: u32, history: Vec<MatchRecord>) -> bool {
        match self.records.get_mut(&id) {
            Some(mut record) => {
                record.match_history = history;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every record, id-ordered for a deterministic upsert batch.
    pub fn drain_sorted(&self) -> Vec<PlayerRecord> {
        let mut out: Vec<PlayerRecord> = self.records.iter().map(|e| e.value().clone()).collect();
        self.records.clear();
        out.sort_by_key(|r| r.id);
        out
    }
}
