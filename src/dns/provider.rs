//! DNS provider clients.
//!
//! # Responsibilities
//! - Read the currently published record for a domain
//! - Idempotently upsert a record's target value
//!
//! # Design Decisions
//! - The provider is the only I/O boundary below the loop; everything
//!   above it is pure and testable offline
//! - Write failures are transient by contract: the loop retries on its
//!   next tick, so providers never retry internally

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::DnsConfig;
use crate::dns::record::{DnsRecordObservation, RecordType};

/// Transient DNS provider failure. Surfaced via status and retried next tick.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("provider endpoint invalid: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("simulated write failure")]
    Injected,
}

/// Seam between the reconciliation loop and the DNS provider API.
#[allow(async_fn_in_trait)]
pub trait DnsProvider {
    /// Fetch the currently published record for a domain.
    async fn fetch(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<DnsRecordObservation, DnsError>;

    /// Idempotently upsert the record's target value.
    async fn upsert(
        &self,
        domain: &str,
        record_type: RecordType,
        value: &str,
        ttl_secs: u32,
    ) -> Result<(), DnsError>;
}

/// Concrete provider selected from configuration.
///
/// Enum dispatch instead of trait objects: the set of providers is closed
/// and the loop stays free of boxing.
pub enum ProviderHandle {
    Rest(RestDnsProvider),
    Memory(MemoryDnsProvider),
}

impl ProviderHandle {
    pub fn from_config(config: &DnsConfig) -> Result<Self, DnsError> {
        match config.provider {
            crate::config::DnsProviderKind::Rest => Ok(ProviderHandle::Rest(
                RestDnsProvider::new(&config.endpoint, config.api_token.clone())?,
            )),
            crate::config::DnsProviderKind::Memory => {
                Ok(ProviderHandle::Memory(MemoryDnsProvider::new()))
            }
        }
    }
}

impl DnsProvider for ProviderHandle {
    async fn fetch(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<DnsRecordObservation, DnsError> {
        match self {
            ProviderHandle::Rest(p) => p.fetch(domain, record_type).await,
            ProviderHandle::Memory(p) => p.fetch(domain, record_type).await,
        }
    }

    async fn upsert(
        &self,
        domain: &str,
        record_type: RecordType,
        value: &str,
        ttl_secs: u32,
    ) -> Result<(), DnsError> {
        match self {
            ProviderHandle::Rest(p) => p.upsert(domain, record_type, value, ttl_secs).await,
            ProviderHandle::Memory(p) => p.upsert(domain, record_type, value, ttl_secs).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    value: String,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    #[serde(rename = "type")]
    record_type: String,
    value: &'a str,
    ttl: u32,
}

/// Client for a provider-agnostic REST record API.
///
/// `GET {base}/records/{domain}?type={rt}` returns the current value
/// (404 when the record does not exist); `PUT` on the same path upserts.
pub struct RestDnsProvider {
    client: reqwest::Client,
    base: Url,
    api_token: Option<String>,
}

impl RestDnsProvider {
    pub fn new(endpoint: &str, api_token: Option<String>) -> Result<Self, DnsError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: Url::parse(endpoint)?,
            api_token,
        })
    }

    fn record_url(&self, domain: &str) -> Result<Url, DnsError> {
        Ok(self.base.join(&format!("records/{domain}"))?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl DnsProvider for RestDnsProvider {
    async fn fetch(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<DnsRecordObservation, DnsError> {
        let url = self.record_url(domain)?;
        let response = self
            .authorize(self.client.get(url))
            .query(&[("type", record_type.to_string())])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(DnsRecordObservation {
                domain_name: domain.to_string(),
                current_target_value: None,
                record_type,
            });
        }
        if !response.status().is_success() {
            return Err(DnsError::Status(response.status().as_u16()));
        }

        let record: RecordResponse = response.json().await?;
        Ok(DnsRecordObservation {
            domain_name: domain.to_string(),
            current_target_value: Some(record.value),
            record_type,
        })
    }

    async fn upsert(
        &self,
        domain: &str,
        record_type: RecordType,
        value: &str,
        ttl_secs: u32,
    ) -> Result<(), DnsError> {
        let url = self.record_url(domain)?;
        let response = self
            .authorize(self.client.put(url))
            .json(&UpsertRequest {
                record_type: record_type.to_string(),
                value,
                ttl: ttl_secs,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DnsError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// In-process record store for tests and local experiments.
///
/// Supports injected write failures to exercise the loop's retry-next-tick
/// behavior.
#[derive(Debug, Default)]
pub struct MemoryDnsProvider {
    records: Mutex<HashMap<String, String>>,
    fail_next_writes: AtomicU32,
    writes_applied: AtomicU64,
}

impl MemoryDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` upserts fail with a transient error.
    pub fn fail_next_writes(&self, n: u32) {
        self.fail_next_writes.store(n, Ordering::SeqCst);
    }

    /// Number of upserts that actually landed.
    pub fn writes_applied(&self) -> u64 {
        self.writes_applied.load(Ordering::SeqCst)
    }

    /// Current value for a domain, if any.
    pub fn value_of(&self, domain: &str) -> Option<String> {
        self.records
            .lock()
            .expect("record store poisoned")
            .get(domain)
            .cloned()
    }
}

impl DnsProvider for MemoryDnsProvider {
    async fn fetch(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<DnsRecordObservation, DnsError> {
        Ok(DnsRecordObservation {
            domain_name: domain.to_string(),
            current_target_value: self.value_of(domain),
            record_type,
        })
    }

    async fn upsert(
        &self,
        domain: &str,
        _record_type: RecordType,
        value: &str,
        _ttl_secs: u32,
    ) -> Result<(), DnsError> {
        let pending = self.fail_next_writes.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_next_writes.store(pending - 1, Ordering::SeqCst);
            return Err(DnsError::Injected);
        }

        self.records
            .lock()
            .expect("record store poisoned")
            .insert(domain.to_string(), value.to_string());
        self.writes_applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_provider_upsert_then_fetch() {
        let provider = MemoryDnsProvider::new();

        let before = provider.fetch("app.example.com", RecordType::Cname).await.unwrap();
        assert!(before.current_target_value.is_none());

        provider
            .upsert("app.example.com", RecordType::Cname, "lb.eu.example.com", 60)
            .await
            .unwrap();

        let after = provider.fetch("app.example.com", RecordType::Cname).await.unwrap();
        assert_eq!(
            after.current_target_value.as_deref(),
            Some("lb.eu.example.com")
        );
        assert_eq!(provider.writes_applied(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_transient() {
        let provider = MemoryDnsProvider::new();
        provider.fail_next_writes(1);

        let err = provider
            .upsert("app.example.com", RecordType::Cname, "lb.eu.example.com", 60)
            .await;
        assert!(err.is_err());
        assert_eq!(provider.writes_applied(), 0);

        provider
            .upsert("app.example.com", RecordType::Cname, "lb.eu.example.com", 60)
            .await
            .unwrap();
        assert_eq!(provider.writes_applied(), 1);
    }
}
