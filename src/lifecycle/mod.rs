//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Start loops → Start status/metrics servers
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → loops finish in-flight tick → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Configuration errors are fatal at startup only; nothing in steady
//!   state terminates the process
//! - Shutdown waits on every loop so no DNS write is cut mid-flight

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
