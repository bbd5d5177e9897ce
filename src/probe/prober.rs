//! Active health probing.
//!
//! # Responsibilities
//! - Issue a bounded-timeout HTTP(S) GET against each target's health URL
//! - Collapse network errors, timeouts, and non-success statuses into a
//!   single unhealthy signal
//!
//! A probe failure is never fatal to the process; it is data, folded into
//! the consecutive counters by the caller.

use std::time::{Duration, Instant};

use tokio::time;

use crate::config::{EndpointTarget, ProbeConfig};

/// Raw result of one probe. Carries no counters; the caller folds it into
/// a [`crate::probe::HealthVerdict`] via the tracker.
#[derive(Debug, Clone, Copy)]
pub struct ProbeOutcome {
    pub healthy: bool,
    pub latency: Duration,
}

/// HTTP(S) health prober shared by all targets of one loop instance.
pub struct HealthProber {
    client: reqwest::Client,
    timeout: Duration,
    success_statuses: Vec<u16>,
}

impl HealthProber {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(config.timeout_secs),
            success_statuses: config.success_statuses.clone(),
        }
    }

    /// Probe one target. Uniform failure signal: connection errors, TLS
    /// failures, timeouts, and non-matching statuses are all just
    /// "unhealthy".
    pub async fn probe(&self, target: &EndpointTarget) -> ProbeOutcome {
        let started = Instant::now();

        let response_future = self
            .client
            .get(&target.health_check_url)
            .header("user-agent", "failoverd-health-check")
            .send();

        let healthy = match time::timeout(self.timeout, response_future).await {
            Ok(Ok(response)) => {
                let matched = self.status_matches(response.status().as_u16());
                if !matched {
                    tracing::warn!(
                        region = %target.region_id,
                        status = %response.status(),
                        "Health check failed: non-success status"
                    );
                }
                matched
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    region = %target.region_id,
                    error = %e,
                    "Health check failed: connection error"
                );
                false
            }
            Err(_) => {
                tracing::warn!(region = %target.region_id, "Health check failed: timeout");
                false
            }
        };

        ProbeOutcome {
            healthy,
            latency: started.elapsed(),
        }
    }

    fn status_matches(&self, status: u16) -> bool {
        self.success_statuses.contains(&status)
    }
}
