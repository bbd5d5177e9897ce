//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Each reconciliation tick:
//!     prober.rs issues one GET per target (concurrent, per-probe timeout)
//!     → verdict.rs folds outcomes into consecutive counters
//!     → HealthVerdict per region handed to the failover state machine
//! ```
//!
//! # Design Decisions
//! - One uniform failure signal: the state machine never learns why a
//!   probe failed, only that it did
//! - Counters are owned by the loop instance, not shared

pub mod prober;
pub mod verdict;

pub use prober::{HealthProber, ProbeOutcome};
pub use verdict::{HealthVerdict, VerdictTracker};
