//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Messages routed and successfully consumed
    dispatched_count: AtomicU64,
    /// Messages with no routing entry (normal outcome)
    unrouted_count: AtomicU64,
    /// Dispatch calls that failed in resolution or invocation
    failure_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get dispatched count
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched_count.load(Ordering::Relaxed)
    }

    /// Increment dispatched count
    pub fn inc_dispatched_count(&self) {
        self.dispatched_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get unrouted count
    pub fn unrouted_count(&self) -> u64 {
        self.unrouted_count.load(Ordering::Relaxed)
    }

    /// Increment unrouted count
    pub fn inc_unrouted_count(&self) {
        self.unrouted_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched_count: self.dispatched_count(),
            unrouted_count: self.unrouted_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub dispatched_count: u64,
    pub unrouted_count: u64,
    pub failure_count: u64,
}
