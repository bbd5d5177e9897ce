//! Failover state per logical domain.

use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

/// Why the active region last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Initial state at startup; no transition has happened yet.
    Startup,
    /// The active region crossed the failure threshold.
    ActiveRegionUnhealthy,
    /// The primary crossed the recovery threshold while a lower-priority
    /// region was active.
    PrimaryRecovered,
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransitionReason::Startup => "startup",
            TransitionReason::ActiveRegionUnhealthy => "active region unhealthy",
            TransitionReason::PrimaryRecovered => "primary recovered",
        };
        f.write_str(s)
    }
}

/// Which region currently serves traffic for one domain.
///
/// Mutated only by the state machine; the record reconciler reads it but
/// never writes it. Each loop iteration produces a new value rather than
/// mutating shared state.
#[derive(Debug, Clone)]
pub struct FailoverState {
    pub domain_name: String,
    pub active_region_id: String,
    pub last_transition_at: SystemTime,
    pub transition_reason: TransitionReason,
}

impl FailoverState {
    /// Initial state: the highest-priority target is active until probes
    /// say otherwise.
    pub fn initial(domain_name: impl Into<String>, primary_region_id: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            active_region_id: primary_region_id.into(),
            last_transition_at: SystemTime::now(),
            transition_reason: TransitionReason::Startup,
        }
    }
}
