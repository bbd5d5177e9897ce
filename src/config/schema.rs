//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the failover
//! daemon. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::dns::RecordType;

/// Root configuration for the failover daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Logical domains managed by this daemon, one reconciliation loop each.
    pub domains: Vec<DomainConfig>,

    /// Health probe settings shared by all domains.
    pub probe: ProbeConfig,

    /// Default failover thresholds (overridable per domain).
    pub thresholds: ThresholdConfig,

    /// DNS provider settings.
    pub dns: DnsConfig,

    /// Read-only status API settings.
    pub status_api: StatusApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// One logical DNS name and its ordered set of regional endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Fully qualified domain name the published record belongs to.
    pub name: String,

    /// Record type to manage for this domain.
    #[serde(default)]
    pub record_type: RecordType,

    /// TTL for the published record in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u32,

    /// Regional endpoints. The highest-priority entry is the primary.
    pub targets: Vec<EndpointTarget>,

    /// Per-domain threshold override.
    pub thresholds: Option<ThresholdConfig>,
}

/// A single regional endpoint behind one domain.
///
/// Immutable per deployment; the set of targets for a domain is fixed at
/// configuration time (typically exactly two: primary and secondary).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointTarget {
    /// Unique region identifier within the domain (e.g., "eu-west-1").
    pub region_id: String,

    /// HTTP(S) URL probed to judge region health.
    pub health_check_url: String,

    /// Value the DNS record points at while this region is active
    /// (e.g., the region's load-balancer hostname).
    pub dns_value: String,

    /// Preference order. Higher value wins: the numerically highest
    /// priority target is the primary.
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_priority() -> u32 {
    1
}

fn default_ttl_secs() -> u32 {
    60
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Reconciliation tick interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds. Bounds total tick latency since
    /// probes within a tick run concurrently.
    pub timeout_secs: u64,

    /// HTTP status codes treated as healthy.
    pub success_statuses: Vec<u16>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 5,
            success_statuses: vec![200],
        }
    }
}

/// Failover hysteresis thresholds.
///
/// Asymmetric on purpose: fail fast, recover cautiously. DNS changes have
/// propagation latency and client-side TTL caching, so a flapping primary
/// must not translate into record churn.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Consecutive probe failures on the active region before failing over.
    pub fail_threshold: u32,

    /// Consecutive probe successes on the primary before failing back.
    pub recover_threshold: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            fail_threshold: 3,
            recover_threshold: 5,
        }
    }
}

/// DNS provider selection and connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Which provider backend to use.
    pub provider: DnsProviderKind,

    /// Base URL of the provider's record API (`rest` provider only).
    pub endpoint: String,

    /// Bearer token for the provider API, if it requires one.
    pub api_token: Option<String>,

    /// Log intended record updates without writing them.
    pub dry_run: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            provider: DnsProviderKind::Rest,
            endpoint: "http://localhost:8053".to_string(),
            api_token: None,
            dry_run: false,
        }
    }
}

/// Supported DNS provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DnsProviderKind {
    /// Provider-agnostic REST record API.
    #[default]
    Rest,
    /// In-process store. Useful for tests and local experiments.
    Memory,
}

/// Read-only status API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusApiConfig {
    /// Enable the status HTTP endpoint.
    pub enabled: bool,

    /// Status API bind address.
    pub bind_address: String,
}

impl Default for StatusApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl DomainConfig {
    /// Effective thresholds for this domain, falling back to the global
    /// defaults when no override is configured.
    pub fn effective_thresholds(&self, global: ThresholdConfig) -> ThresholdConfig {
        self.thresholds.unwrap_or(global)
    }

    /// Targets in descending priority order. The first entry is the primary.
    ///
    /// Stable sort: targets sharing a priority keep their configured order.
    pub fn targets_by_priority(&self) -> Vec<EndpointTarget> {
        let mut targets = self.targets.clone();
        targets.sort_by(|a, b| b.priority.cmp(&a.priority));
        targets
    }
}
