//! Failover state machine.
//!
//! # States
//! - Active(region_id): one state per region
//!
//! # State Transitions
//! ```text
//! Active(r) → Active(other): r's consecutive failures >= fail_threshold
//!                            and some other region is currently healthy
//! Active(r) → Active(primary): r is not the primary and the primary's
//!                              consecutive successes >= recover_threshold
//! ```
//!
//! # Design Decisions
//! - Asymmetric thresholds: fail fast, recover cautiously. DNS flapping is
//!   user-visible through TTL caching, so the return path demands positive
//!   evidence, not merely absence of failure.
//! - Fail open: when every region is unhealthy the active region stays put.
//!   DNS cannot represent "no record"; a possibly-broken endpoint beats
//!   serving nothing.
//! - Tie-break: among healthy candidates the numerically highest priority
//!   wins.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::config::{EndpointTarget, ThresholdConfig};
use crate::failover::state::{FailoverState, TransitionReason};
use crate::probe::HealthVerdict;

/// Advance the state machine one tick.
///
/// Pure over its inputs: `targets` must be sorted descending by priority
/// (see [`crate::config::DomainConfig::targets_by_priority`]), `verdicts`
/// maps region id to that region's latest verdict.
pub fn advance(
    current: &FailoverState,
    targets: &[EndpointTarget],
    verdicts: &HashMap<String, HealthVerdict>,
    thresholds: ThresholdConfig,
) -> FailoverState {
    let active_failed = verdicts
        .get(&current.active_region_id)
        .map(|v| v.consecutive_failures >= thresholds.fail_threshold)
        .unwrap_or(false);

    if active_failed {
        // Highest-priority healthy alternative wins.
        for target in targets {
            if target.region_id == current.active_region_id {
                continue;
            }
            let healthy = verdicts
                .get(&target.region_id)
                .map(|v| v.healthy)
                .unwrap_or(false);
            if healthy {
                return FailoverState {
                    domain_name: current.domain_name.clone(),
                    active_region_id: target.region_id.clone(),
                    last_transition_at: SystemTime::now(),
                    transition_reason: TransitionReason::ActiveRegionUnhealthy,
                };
            }
        }
        // Fail open: nowhere healthy to go.
        return current.clone();
    }

    if let Some(primary) = targets.first() {
        if primary.region_id != current.active_region_id {
            let recovered = verdicts
                .get(&primary.region_id)
                .map(|v| v.healthy && v.consecutive_successes >= thresholds.recover_threshold)
                .unwrap_or(false);
            if recovered {
                return FailoverState {
                    domain_name: current.domain_name.clone(),
                    active_region_id: primary.region_id.clone(),
                    last_transition_at: SystemTime::now(),
                    transition_reason: TransitionReason::PrimaryRecovered,
                };
            }
        }
    }

    current.clone()
}
