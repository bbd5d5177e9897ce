//! Read-only status snapshots for observability collaborators.
//!
//! Each loop publishes a fresh immutable snapshot after every tick via
//! arc-swap; readers (status API, CLI) never contend with the loop.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use serde::Serialize;

use crate::failover::{FailoverState, TransitionReason};
use crate::probe::HealthVerdict;

/// How many past transitions each domain retains for the status surface.
pub const TRANSITION_HISTORY_LIMIT: usize = 32;

/// Last observed probe state for one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionStatus {
    pub region_id: String,
    /// `None` until the first probe of this process completes.
    pub healthy: Option<bool>,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub last_latency_ms: Option<u64>,
    pub last_probe_at: Option<u64>,
}

impl RegionStatus {
    pub fn unknown(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            healthy: None,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_latency_ms: None,
            last_probe_at: None,
        }
    }

    pub fn from_verdict(verdict: &HealthVerdict) -> Self {
        Self {
            region_id: verdict.region_id.clone(),
            healthy: Some(verdict.healthy),
            consecutive_failures: verdict.consecutive_failures,
            consecutive_successes: verdict.consecutive_successes,
            last_latency_ms: Some(verdict.latency.as_millis() as u64),
            last_probe_at: Some(epoch_secs(verdict.observed_at)),
        }
    }
}

/// One entry of the bounded transition history.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionEvent {
    pub at: u64,
    pub from_region: String,
    pub to_region: String,
    pub reason: TransitionReason,
}

/// Outcome of the most recent DNS reconciliation.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DnsSyncStatus {
    /// Whether the published record matched the desired value after the
    /// last pass.
    pub in_sync: bool,
    pub last_applied_value: Option<String>,
    pub updates_applied: u64,
    /// Most recent provider error, cleared on the next successful pass.
    pub last_error: Option<String>,
}

/// Full status snapshot for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainStatus {
    pub domain_name: String,
    pub active_region_id: String,
    pub last_transition_at: u64,
    pub transition_reason: TransitionReason,
    pub regions: Vec<RegionStatus>,
    pub history: Vec<TransitionEvent>,
    pub dns: DnsSyncStatus,
}

impl DomainStatus {
    /// Snapshot taken before the first tick: all regions unknown.
    pub fn startup(state: &FailoverState, region_ids: &[String]) -> Self {
        Self {
            domain_name: state.domain_name.clone(),
            active_region_id: state.active_region_id.clone(),
            last_transition_at: epoch_secs(state.last_transition_at),
            transition_reason: state.transition_reason,
            regions: region_ids
                .iter()
                .map(|r| RegionStatus::unknown(r.clone()))
                .collect(),
            history: Vec::new(),
            dns: DnsSyncStatus::default(),
        }
    }
}

/// Registry of per-domain status snapshots shared between loops and readers.
#[derive(Clone, Default)]
pub struct StatusRegistry {
    domains: Arc<DashMap<String, Arc<ArcSwap<DomainStatus>>>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fresh snapshot for a domain.
    pub fn publish(&self, status: DomainStatus) {
        let domain = status.domain_name.clone();
        let snapshot = Arc::new(status);

        match self.domains.get(&domain) {
            Some(slot) => slot.store(snapshot),
            None => {
                self.domains
                    .insert(domain, Arc::new(ArcSwap::new(snapshot)));
            }
        }
    }

    pub fn get(&self, domain: &str) -> Option<Arc<DomainStatus>> {
        self.domains.get(domain).map(|slot| slot.load_full())
    }

    /// Snapshot of every domain, sorted by name for stable output.
    pub fn all(&self) -> Vec<Arc<DomainStatus>> {
        let mut statuses: Vec<_> = self
            .domains
            .iter()
            .map(|entry| entry.value().load_full())
            .collect();
        statuses.sort_by(|a, b| a.domain_name.cmp(&b.domain_name));
        statuses
    }
}

pub(crate) fn epoch_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_replaces_previous_snapshot() {
        let registry = StatusRegistry::new();
        let state = FailoverState::initial("app.example.com", "primary");
        let regions = vec!["primary".to_string(), "secondary".to_string()];

        registry.publish(DomainStatus::startup(&state, &regions));
        let mut updated = DomainStatus::startup(&state, &regions);
        updated.active_region_id = "secondary".to_string();
        registry.publish(updated);

        let got = registry.get("app.example.com").unwrap();
        assert_eq!(got.active_region_id, "secondary");
        assert_eq!(registry.all().len(), 1);
    }

    #[test]
    fn unknown_domain_is_none() {
        let registry = StatusRegistry::new();
        assert!(registry.get("missing.example.com").is_none());
    }
}
