//! Per-domain reconciliation loop.
//!
//! # Responsibilities
//! - Tick on a fixed interval: probe all targets concurrently, advance the
//!   failover state machine, reconcile the DNS record
//! - Publish a status snapshot after every tick
//! - Own the retry cadence: a failed DNS read or write is simply retried
//!   on the next tick
//!
//! # Design Decisions
//! - One runner per domain, no shared mutable state between runners
//! - Probes within a tick run concurrently; the per-probe timeout bounds
//!   tick latency to one timeout, not num_targets × timeout
//! - Shutdown lets the in-flight tick finish (no partial DNS writes)

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use rand::Rng;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{DomainConfig, EndpointTarget, ProbeConfig, ThresholdConfig};
use crate::controller::status::{
    epoch_secs, DnsSyncStatus, DomainStatus, RegionStatus, StatusRegistry, TransitionEvent,
    TRANSITION_HISTORY_LIMIT,
};
use crate::dns::{reconcile, Action, DnsProvider, ProviderHandle, RecordType};
use crate::failover::{advance, FailoverState};
use crate::observability::metrics;
use crate::probe::{HealthProber, HealthVerdict, VerdictTracker};

/// Reconciliation loop for one logical domain.
pub struct DomainRunner {
    domain_name: String,
    record_type: RecordType,
    ttl_secs: u32,
    /// Sorted descending by priority; the first entry is the primary.
    targets: Vec<EndpointTarget>,
    thresholds: ThresholdConfig,
    interval: Duration,
    dry_run: bool,

    prober: HealthProber,
    provider: Arc<ProviderHandle>,
    registry: StatusRegistry,

    state: FailoverState,
    tracker: VerdictTracker,
    regions: Vec<RegionStatus>,
    history: VecDeque<TransitionEvent>,
    dns: DnsSyncStatus,
}

impl DomainRunner {
    pub fn new(
        domain: &DomainConfig,
        probe: &ProbeConfig,
        global_thresholds: ThresholdConfig,
        provider: Arc<ProviderHandle>,
        registry: StatusRegistry,
        dry_run: bool,
    ) -> Self {
        let targets = domain.targets_by_priority();
        let primary = targets
            .first()
            .map(|t| t.region_id.clone())
            .unwrap_or_default();
        let state = FailoverState::initial(domain.name.clone(), primary);
        let regions = targets
            .iter()
            .map(|t| RegionStatus::unknown(t.region_id.clone()))
            .collect();

        Self {
            domain_name: domain.name.clone(),
            record_type: domain.record_type,
            ttl_secs: domain.ttl_secs,
            targets,
            thresholds: domain.effective_thresholds(global_thresholds),
            interval: Duration::from_secs(probe.interval_secs),
            dry_run,
            prober: HealthProber::new(probe),
            provider,
            registry,
            state,
            tracker: VerdictTracker::new(),
            regions,
            history: VecDeque::new(),
            dns: DnsSyncStatus::default(),
        }
    }

    /// Drive the loop until shutdown. An in-flight tick always completes
    /// before the loop exits.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            domain = %self.domain_name,
            targets = self.targets.len(),
            interval_secs = self.interval.as_secs(),
            fail_threshold = self.thresholds.fail_threshold,
            recover_threshold = self.thresholds.recover_threshold,
            "Reconciliation loop starting"
        );

        self.publish();

        // Stagger loop starts so many domains don't probe in lockstep.
        let jitter = startup_jitter(self.interval);
        if !jitter.is_zero() {
            tokio::select! {
                _ = time::sleep(jitter) => {}
                _ = shutdown.recv() => return,
            }
        }

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(
                        domain = %self.domain_name,
                        "Reconciliation loop received shutdown signal, exiting"
                    );
                    break;
                }
            }
        }
    }

    /// One full pass: probe → advance → reconcile → publish.
    pub async fn tick(&mut self) {
        let verdicts = self.probe_all().await;

        let next = advance(&self.state, &self.targets, &verdicts, self.thresholds);
        if next.active_region_id != self.state.active_region_id {
            tracing::info!(
                domain = %self.domain_name,
                from = %self.state.active_region_id,
                to = %next.active_region_id,
                reason = %next.transition_reason,
                "Failover transition"
            );
            metrics::record_transition(&self.domain_name, &next.active_region_id);

            self.history.push_back(TransitionEvent {
                at: epoch_secs(next.last_transition_at),
                from_region: self.state.active_region_id.clone(),
                to_region: next.active_region_id.clone(),
                reason: next.transition_reason,
            });
            while self.history.len() > TRANSITION_HISTORY_LIMIT {
                self.history.pop_front();
            }
        }
        self.state = next;

        self.sync_dns().await;
        self.publish();
    }

    /// Probe every target concurrently. Total latency is bounded by the
    /// per-probe timeout.
    async fn probe_all(&mut self) -> HashMap<String, HealthVerdict> {
        let outcomes = join_all(self.targets.iter().map(|t| self.prober.probe(t))).await;

        let mut verdicts = HashMap::new();
        for (target, outcome) in self.targets.iter().zip(outcomes) {
            let verdict = self
                .tracker
                .record(&target.region_id, outcome.healthy, outcome.latency);

            metrics::record_probe(
                &self.domain_name,
                &target.region_id,
                verdict.healthy,
                verdict.latency,
            );

            verdicts.insert(target.region_id.clone(), verdict);
        }

        self.regions = self
            .targets
            .iter()
            .filter_map(|t| verdicts.get(&t.region_id))
            .map(RegionStatus::from_verdict)
            .collect();

        verdicts
    }

    /// Align the published record with the desired active region.
    async fn sync_dns(&mut self) {
        let observed = match self
            .provider
            .fetch(&self.domain_name, self.record_type)
            .await
        {
            Ok(observation) => observation,
            Err(e) => {
                tracing::warn!(
                    domain = %self.domain_name,
                    error = %e,
                    "DNS record fetch failed, retrying next tick"
                );
                metrics::record_dns_update(&self.domain_name, false);
                self.dns.in_sync = false;
                self.dns.last_error = Some(e.to_string());
                return;
            }
        };

        match reconcile(&self.state, &self.targets, &observed) {
            Action::NoOp => {
                self.dns.in_sync = true;
                self.dns.last_error = None;
            }
            Action::UpdateRecord { new_value } => {
                if self.dry_run {
                    tracing::info!(
                        domain = %self.domain_name,
                        value = %new_value,
                        "Dry run: record update suppressed"
                    );
                    self.dns.in_sync = false;
                    self.dns.last_error = None;
                    return;
                }

                match self
                    .provider
                    .upsert(&self.domain_name, self.record_type, &new_value, self.ttl_secs)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(
                            domain = %self.domain_name,
                            value = %new_value,
                            record_type = %self.record_type,
                            "DNS record updated"
                        );
                        metrics::record_dns_update(&self.domain_name, true);
                        self.dns.in_sync = true;
                        self.dns.last_applied_value = Some(new_value);
                        self.dns.updates_applied += 1;
                        self.dns.last_error = None;
                    }
                    Err(e) => {
                        tracing::warn!(
                            domain = %self.domain_name,
                            error = %e,
                            "DNS record update failed, retrying next tick"
                        );
                        metrics::record_dns_update(&self.domain_name, false);
                        self.dns.in_sync = false;
                        self.dns.last_error = Some(e.to_string());
                    }
                }
            }
        }
    }

    fn publish(&self) {
        self.registry.publish(DomainStatus {
            domain_name: self.domain_name.clone(),
            active_region_id: self.state.active_region_id.clone(),
            last_transition_at: epoch_secs(self.state.last_transition_at),
            transition_reason: self.state.transition_reason,
            regions: self.regions.clone(),
            history: self.history.iter().cloned().collect(),
            dns: self.dns.clone(),
        });
    }

    /// Current failover state, mainly for tests.
    pub fn state(&self) -> &FailoverState {
        &self.state
    }
}

fn startup_jitter(interval: Duration) -> Duration {
    let max_ms = interval.as_millis() as u64 / 10;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
}
