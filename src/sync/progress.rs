//! Playback-progress persistence
//!
//! `ProgressStore` owns the persisted per-movie record map;
//! `ProgressTracker` sits between the player's once-per-tick position
//! updates and the store, collapsing bursts to at most one write per
//! second. `flush` bypasses the throttle on player teardown so the last
//! position is never lost.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::timer::WriteThrottle;
use crate::models::ProgressRecord;
use crate::storage::{Storage, PROGRESS_FILE};

/// Minimum gap between persisted progress writes during playback
pub const WRITE_GAP: Duration = Duration::from_secs(1);

// =============================================================================
// Store
// =============================================================================

/// Persisted map of movie id → progress record
#[derive(Debug, Clone)]
pub struct ProgressStore {
    storage: Storage,
    records: HashMap<u64, ProgressRecord>,
}

impl ProgressStore {
    /// Load the record map; a malformed file was already discarded by the
    /// storage layer and shows up here as an empty map.
    pub fn load(storage: Storage) -> Self {
        let records: HashMap<u64, ProgressRecord> = storage.load(PROGRESS_FILE);
        Self { storage, records }
    }

    pub fn get(&self, movie_id: u64) -> Option<&ProgressRecord> {
        self.records.get(&movie_id)
    }

    /// Position to start playback from, applying the staleness and
    /// finished-window rules. Absent record ⇒ 0.
    pub fn resume_position(&self, movie_id: u64, now_ms: u64) -> f64 {
        self.records
            .get(&movie_id)
            .map(|rec| rec.resume_position(now_ms))
            .unwrap_or(0.0)
    }

    /// Write a record and persist the map. Last writer wins per key.
    pub fn record(&mut self, movie_id: u64, record: ProgressRecord) {
        self.records.insert(movie_id, record);
        if let Err(e) = self.storage.save(PROGRESS_FILE, &self.records) {
            tracing::warn!(movie_id, error = %e, "failed to persist playback progress");
        }
    }

    /// Drop a record (e.g. after a finished run) and persist
    pub fn clear(&mut self, movie_id: u64) {
        if self.records.remove(&movie_id).is_some() {
            if let Err(e) = self.storage.save(PROGRESS_FILE, &self.records) {
                tracing::warn!(movie_id, error = %e, "failed to persist playback progress");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Tracker
// =============================================================================

/// Per-playback write scheduler. Every position update lands here; only
/// the most recent pending record survives a throttle window.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    movie_id: u64,
    throttle: WriteThrottle,
    pending: Option<ProgressRecord>,
}

impl ProgressTracker {
    pub fn new(movie_id: u64) -> Self {
        Self {
            movie_id,
            throttle: WriteThrottle::new(WRITE_GAP),
            pending: None,
        }
    }

    pub fn movie_id(&self) -> u64 {
        self.movie_id
    }

    /// Accept a position update. Writes through to the store at most once
    /// per second; in between, the latest record is kept pending.
    pub fn update_at(&mut self, now: Instant, record: ProgressRecord, store: &mut ProgressStore) {
        if self.throttle.ready_at(now) {
            self.throttle.mark_at(now);
            self.pending = None;
            store.record(self.movie_id, record);
        } else {
            self.pending = Some(record);
        }
    }

    /// Persist any pending record immediately, bypassing the throttle.
    /// Called on player teardown and app shutdown.
    pub fn flush(&mut self, store: &mut ProgressStore) {
        if let Some(record) = self.pending.take() {
            store.record(self.movie_id, record);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
