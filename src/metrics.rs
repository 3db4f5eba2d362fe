use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing alias store activity.
#[derive(Default)]
pub struct StoreMetrics {
    links_created: AtomicU64,
    links_updated: AtomicU64,
    links_deleted: AtomicU64,
    code_conflicts: AtomicU64,
    generated_collisions: AtomicU64,
}

impl StoreMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully persisted new link.
    pub fn record_created(&self) {
        self.links_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a target replacement on an existing code.
    pub fn record_updated(&self) {
        self.links_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removed link.
    pub fn record_deleted(&self) {
        self.links_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a create rejected because the requested code was taken.
    pub fn record_conflict(&self) {
        self.code_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a generated code that collided with an existing one.
    pub fn record_generated_collision(&self) {
        self.generated_collisions.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            links_created: self.links_created.load(Ordering::Relaxed),
            links_updated: self.links_updated.load(Ordering::Relaxed),
            links_deleted: self.links_deleted.load(Ordering::Relaxed),
            code_conflicts: self.code_conflicts.load(Ordering::Relaxed),
            generated_collisions: self.generated_collisions.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of store counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Links created since startup.
    pub links_created: u64,
    /// Targets replaced via update since startup.
    pub links_updated: u64,
    /// Links deleted since startup.
    pub links_deleted: u64,
    /// Create calls rejected because the requested code already existed.
    pub code_conflicts: u64,
    /// Generated codes discarded because they were already taken.
    pub generated_collisions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_counter_independently() {
        let metrics = StoreMetrics::new();
        metrics.record_created();
        metrics.record_created();
        metrics.record_updated();
        metrics.record_deleted();
        metrics.record_conflict();
        metrics.record_generated_collision();
        metrics.record_generated_collision();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.links_created, 2);
        assert_eq!(snapshot.links_updated, 1);
        assert_eq!(snapshot.links_deleted, 1);
        assert_eq!(snapshot.code_conflicts, 1);
        assert_eq!(snapshot.generated_collisions, 2);
    }

    #[test]
    fn snapshot_starts_at_zero() {
        let metrics = StoreMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
