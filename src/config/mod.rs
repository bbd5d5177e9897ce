//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FailoverConfig (validated, immutable)
//!     → shared via Arc to all loop instances
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the target set per domain is fixed
//!   at configuration time
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DnsConfig, DnsProviderKind, DomainConfig, EndpointTarget, FailoverConfig, ObservabilityConfig,
    ProbeConfig, StatusApiConfig, ThresholdConfig,
};
pub use validation::{validate_config, ValidationError};
