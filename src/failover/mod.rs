//! Failover decision subsystem.
//!
//! # Data Flow
//! ```text
//! Verdicts per region (probe subsystem)
//!     → machine.rs advance()
//!     → new FailoverState
//!     → record reconciler decides whether DNS must change
//! ```
//!
//! # Design Decisions
//! - advance() is a pure function; deterministic unit testing without a
//!   live DNS provider
//! - At most one region is active per domain at any time

pub mod machine;
pub mod state;

pub use machine::advance;
pub use state::{FailoverState, TransitionReason};
