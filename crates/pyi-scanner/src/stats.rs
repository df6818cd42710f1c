//! Conversion statistics with atomic counters.
//!
//! All counters use [`AtomicU64`] with relaxed ordering. They are only read
//! for reporting, once the parallel work has finished or while it runs.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters shared by the conversion workers.
///
/// # Examples
///
/// ```
/// use pyi_scanner::ScanStats;
///
/// let stats = ScanStats::new();
/// stats.increment_total();
/// stats.increment_converted();
/// stats.add_diagnostics(2);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.converted, 1);
/// assert_eq!(snapshot.diagnostics, 2);
/// ```
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Files picked up for conversion.
    total: AtomicU64,
    /// Stubs written.
    converted: AtomicU64,
    /// Files skipped because their stub already exists.
    skipped: AtomicU64,
    /// Files that could not be read, parsed, or written.
    failed: AtomicU64,
    /// Diagnostics reported across all files.
    diagnostics: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the total files counter.
    #[inline]
    pub fn increment_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the written stubs counter.
    #[inline]
    pub fn increment_converted(&self) {
        self.converted.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the existing-stub counter.
    #[inline]
    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the failure counter.
    #[inline]
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` diagnostics.
    #[inline]
    pub fn add_diagnostics(&self, count: usize) {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        self.diagnostics.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            converted: self.converted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            diagnostics: self.diagnostics.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of [`ScanStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Files picked up for conversion.
    pub total: u64,
    /// Stubs written.
    pub converted: u64,
    /// Files skipped because their stub already exists.
    pub skipped: u64,
    /// Files that could not be read, parsed, or written.
    pub failed: u64,
    /// Diagnostics reported across all files.
    pub diagnostics: u64,
}

impl StatsSnapshot {
    /// Returns `true` if every file picked up was converted.
    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.converted == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        assert_eq!(ScanStats::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_counters() {
        let stats = ScanStats::new();
        for _ in 0..3 {
            stats.increment_total();
        }
        stats.increment_converted();
        stats.increment_skipped();
        stats.increment_failed();
        stats.add_diagnostics(4);

        let snapshot = stats.snapshot();
        assert_eq!(
            snapshot,
            StatsSnapshot {
                total: 3,
                converted: 1,
                skipped: 1,
                failed: 1,
                diagnostics: 4,
            }
        );
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn test_concurrent_increments() {
        let stats = ScanStats::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        stats.increment_total();
                        stats.increment_converted();
                    }
                });
            }
        });
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 400);
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = StatsSnapshot {
            total: 2,
            converted: 2,
            ..StatsSnapshot::default()
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert_eq!(
            json,
            r#"{"total":2,"converted":2,"skipped":0,"failed":0,"diagnostics":0}"#
        );
    }
}
