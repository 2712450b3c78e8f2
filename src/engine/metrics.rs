//! POLYKV - Engine Metrics & Observability
//! Atomic counters for the database manager's operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Atomic operation counters for the database manager.
///
/// All counters use `Ordering::Relaxed`; they are read for reporting only.
#[derive(Debug)]
pub struct EngineMetrics {
    /// Total number of `insert` operations.
    pub inserts: AtomicU64,
    /// Total number of `update` operations.
    pub updates: AtomicU64,
    /// Total number of `upsert` operations.
    pub upserts: AtomicU64,
    /// Total number of `get` operations.
    pub gets: AtomicU64,
    /// Total number of `delete` operations.
    pub deletes: AtomicU64,
    /// Operations that returned `false` or an absent entry.
    pub declined: AtomicU64,
    /// Updates that lost the compare-and-swap to a concurrent writer.
    pub update_conflicts: AtomicU64,
    started: Instant,
}

impl EngineMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            upserts: AtomicU64::new(0),
            gets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            declined: AtomicU64::new(0),
            update_conflicts: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record an insert operation.
    pub fn record_insert(&self, inserted: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(inserted);
    }

    /// Record an update operation.
    pub fn record_update(&self, updated: bool) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(updated);
    }

    /// Record an update that lost its compare-and-swap.
    pub fn record_update_conflict(&self) {
        self.update_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upsert operation.
    pub fn record_upsert(&self) {
        self.upserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a get operation.
    pub fn record_get(&self, found: bool) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(found);
    }

    /// Record a delete operation.
    pub fn record_delete(&self, removed: bool) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(removed);
    }

    fn record_outcome(&self, accepted: bool) {
        if !accepted {
            self.declined.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Seconds since the metrics were created.
    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Total number of operations across all kinds.
    pub fn total_ops(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
            + self.updates.load(Ordering::Relaxed)
            + self.upserts.load(Ordering::Relaxed)
            + self.gets.load(Ordering::Relaxed)
            + self.deletes.load(Ordering::Relaxed)
    }

    /// Format metrics as a human-readable report.
    pub fn report(&self) -> String {
        format!(
            "═══ POLYKV Metrics ═══\n\
             Operations:\n\
               inserts:   {}\n\
               updates:   {}\n\
               upserts:   {}\n\
               gets:      {}\n\
               deletes:   {}\n\
             Outcomes:\n\
               declined:  {}\n\
               conflicts: {}\n\
             Total ops: {}\n\
             Uptime: {:.2}s",
            self.inserts.load(Ordering::Relaxed),
            self.updates.load(Ordering::Relaxed),
            self.upserts.load(Ordering::Relaxed),
            self.gets.load(Ordering::Relaxed),
            self.deletes.load(Ordering::Relaxed),
            self.declined.load(Ordering::Relaxed),
            self.update_conflicts.load(Ordering::Relaxed),
            self.total_ops(),
            self.uptime_secs(),
        )
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
