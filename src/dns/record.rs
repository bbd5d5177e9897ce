//! DNS record types and provider observations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Record types the reconciler knows how to manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    #[default]
    Cname,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        };
        f.write_str(s)
    }
}

/// Snapshot of what the provider currently publishes for one domain.
///
/// Transient: re-fetched each reconciliation pass, never cached across ticks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsRecordObservation {
    pub domain_name: String,
    /// `None` when the record does not exist yet.
    pub current_target_value: Option<String>,
    pub record_type: RecordType,
}
