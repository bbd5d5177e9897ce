//! Reconciliation loop subsystem.
//!
//! # Data Flow
//! ```text
//! Timer tick (per domain)
//!     → probe all targets concurrently
//!     → advance failover state machine
//!     → reconcile DNS record (fetch, compare, upsert if needed)
//!     → publish status snapshot
//! ```
//!
//! # Design Decisions
//! - Domains are independent: one runner each, no cross-loop coordination
//! - No steady-state error terminates a loop; everything degrades to
//!   "treat as unhealthy" or "retry next tick"

pub mod runner;
pub mod status;

pub use runner::DomainRunner;
pub use status::{DomainStatus, RegionStatus, StatusRegistry, TransitionEvent};
