//! DNS Failover Reconciler
//!
//! A control-plane daemon that keeps a published DNS record pointed at a
//! healthy region. Per logical domain it probes each region's health
//! endpoint, runs a hysteresis failover state machine, and reconciles the
//! record through a DNS provider API.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │            RECONCILIATION LOOP (per domain)      │
//!                 │                                                  │
//!   /healthz  ◀───┼── probe ──▶ verdicts ──▶ failover ──▶ reconcile ─┼──▶ DNS provider API
//!   (regions)     │  (probe/)   (probe/)    state machine  (dns/)    │    (dns/provider.rs)
//!                 │                         (failover/)              │
//!                 │                              │                   │
//!                 │                              ▼                   │
//!                 │                      status snapshot             │
//!                 │                      (controller/status.rs)      │
//!                 └──────────────────────────────┬───────────────────┘
//!                                                │
//!                      ┌─────────────────────────┴─────────────────┐
//!                      │           Cross-Cutting Concerns          │
//!                      │  config   observability   lifecycle       │
//!                      │  (TOML)   (logs/metrics)  (signals/drain) │
//!                      │           admin (status API)              │
//!                      └───────────────────────────────────────────┘
//! ```
//!
//! Probing, the state machine, and record reconciliation are pure over
//! explicit state; the DNS provider client is the only I/O boundary below
//! the loop.

// Core pipeline
pub mod config;
pub mod dns;
pub mod failover;
pub mod probe;

// Loop ownership
pub mod controller;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::FailoverConfig;
pub use controller::{DomainRunner, StatusRegistry};
pub use failover::FailoverState;
pub use lifecycle::Shutdown;
