//! Counters for concrete-type resolution.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Synthesis metrics (thread-safe counters).
#[derive(Debug, Clone)]
pub struct SynthesisMetrics {
    /// Requests for types that were already concrete
    pub direct: Arc<AtomicU64>,
    /// Requests served from the synthesis cache
    pub cache_hits: Arc<AtomicU64>,
    /// Types generated on a cache miss
    pub synthesized: Arc<AtomicU64>,
    /// Cache misses whose synthesis failed
    pub failures: Arc<AtomicU64>,
}

impl Default for SynthesisMetrics {
    fn default() -> Self {
        Self {
            direct: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            synthesized: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl SynthesisMetrics {
    pub fn record_direct(&self) {
        self.direct.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_synthesized(&self) {
        self.synthesized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            direct: self.direct.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            synthesized: self.synthesized.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics (for reporting).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub direct: u64,
    pub cache_hits: u64,
    pub synthesized: u64,
    pub failures: u64,
}

impl MetricsSnapshot {
    /// Total resolution requests.
    pub fn total_requests(&self) -> u64 {
        self.direct + self.cache_hits + self.synthesized + self.failures
    }

    /// Share of abstract-contract requests answered from the cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.synthesized + self.failures;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Format a human-readable report.
    pub fn format_report(&self) -> String {
        let mut lines = Vec::new();
        lines.push("Synthesis Metrics Report".to_string());
        lines.push("=".repeat(50));
        lines.push(format!("  Already concrete: {}", self.direct));
        lines.push(format!("  Cache hits:       {}", self.cache_hits));
        lines.push(format!("  Synthesized:      {}", self.synthesized));
        lines.push(format!("  Failures:         {}", self.failures));
        lines.push(format!(
            "  Cache hit rate:   {:.1}%",
            self.cache_hit_rate() * 100.0
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_snapshot() {
        let metrics = SynthesisMetrics::default();
        metrics.record_direct();
        metrics.record_synthesized();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();

        let snap = metrics.snapshot();
        assert_eq!(snap.total_requests(), 5);
        assert!((snap.cache_hit_rate() - 0.75).abs() < f64::EPSILON);

        let report = snap.format_report();
        assert!(report.contains("Synthesized:      1"));
        assert!(report.contains("75.0%"));
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SynthesisMetrics::default();
        let other = metrics.clone();
        other.record_failure();
        assert_eq!(metrics.snapshot().failures, 1);
        assert_eq!(MetricsSnapshot::default().cache_hit_rate(), 0.0);
    }
}
