//! Probe verdicts and consecutive-outcome tracking.
//!
//! A verdict is produced fresh each probe cycle and superseded by the next
//! one for the same region; no history is retained beyond the consecutive
//! counters, which reset on any opposite outcome.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Binary health judgement for one region at one point in time.
#[derive(Debug, Clone)]
pub struct HealthVerdict {
    pub region_id: String,
    pub observed_at: SystemTime,
    pub healthy: bool,
    pub latency: Duration,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
}

/// Folds raw probe outcomes into per-region consecutive counters.
///
/// Owned by a single reconciliation loop; no locking needed.
#[derive(Debug, Default)]
pub struct VerdictTracker {
    counters: HashMap<String, Counters>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    failures: u32,
    successes: u32,
}

impl VerdictTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one probe outcome and produce the region's current verdict.
    pub fn record(&mut self, region_id: &str, healthy: bool, latency: Duration) -> HealthVerdict {
        let counters = self.counters.entry(region_id.to_string()).or_default();

        if healthy {
            counters.failures = 0;
            counters.successes = counters.successes.saturating_add(1);
        } else {
            counters.successes = 0;
            counters.failures = counters.failures.saturating_add(1);
        }

        HealthVerdict {
            region_id: region_id.to_string(),
            observed_at: SystemTime::now(),
            healthy,
            latency,
            consecutive_failures: counters.failures,
            consecutive_successes: counters.successes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tracker: &mut VerdictTracker, healthy: bool) -> HealthVerdict {
        tracker.record("eu-west-1", healthy, Duration::from_millis(5))
    }

    #[test]
    fn failures_accumulate_until_success() {
        let mut tracker = VerdictTracker::new();

        assert_eq!(record(&mut tracker, false).consecutive_failures, 1);
        assert_eq!(record(&mut tracker, false).consecutive_failures, 2);

        let verdict = record(&mut tracker, true);
        assert_eq!(verdict.consecutive_failures, 0);
        assert_eq!(verdict.consecutive_successes, 1);
    }

    #[test]
    fn success_streak_resets_on_failure() {
        let mut tracker = VerdictTracker::new();

        for expected in 1..=3 {
            assert_eq!(record(&mut tracker, true).consecutive_successes, expected);
        }

        let verdict = record(&mut tracker, false);
        assert_eq!(verdict.consecutive_successes, 0);
        assert_eq!(verdict.consecutive_failures, 1);
    }

    #[test]
    fn regions_tracked_independently() {
        let mut tracker = VerdictTracker::new();

        tracker.record("eu-west-1", false, Duration::ZERO);
        let us = tracker.record("us-east-1", true, Duration::ZERO);

        assert_eq!(us.consecutive_failures, 0);
        assert_eq!(us.consecutive_successes, 1);
    }
}
