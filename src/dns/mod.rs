//! DNS subsystem.
//!
//! # Data Flow
//! ```text
//! FailoverState (desired) + DnsRecordObservation (actual)
//!     → reconcile.rs decides: NoOp or UpdateRecord
//!     → provider.rs issues the idempotent upsert (loop-owned retry)
//! ```
//!
//! # Design Decisions
//! - Decision and write are separated: reconcile() is pure, the provider
//!   is the lone I/O boundary
//! - At-least-once delivery: a failed write is simply retried next tick

pub mod provider;
pub mod reconcile;
pub mod record;

pub use provider::{DnsError, DnsProvider, MemoryDnsProvider, ProviderHandle, RestDnsProvider};
pub use reconcile::{reconcile, Action};
pub use record::{DnsRecordObservation, RecordType};
