//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check uniqueness (domain names, region ids within a domain)
//! - Validate value ranges (thresholds > 0, intervals > 0, parseable URLs)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs once at startup; a validated config never fails mid-run

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no domains configured")]
    NoDomains,

    #[error("duplicate domain name: {0}")]
    DuplicateDomain(String),

    #[error("domain {domain}: no targets configured")]
    NoTargets { domain: String },

    #[error("domain {domain}: duplicate region id {region}")]
    DuplicateRegion { domain: String, region: String },

    #[error("domain {domain}: invalid health check url for {region}: {url}")]
    InvalidHealthUrl {
        domain: String,
        region: String,
        url: String,
    },

    #[error("domain {domain}: unsupported health check scheme \"{scheme}\" for {region}, expected http or https")]
    UnsupportedHealthScheme {
        domain: String,
        region: String,
        scheme: String,
    },

    #[error("domain {domain}: empty dns_value for {region}")]
    EmptyDnsValue { domain: String, region: String },

    #[error("{scope}: fail_threshold must be at least 1")]
    ZeroFailThreshold { scope: String },

    #[error("{scope}: recover_threshold must be at least 1")]
    ZeroRecoverThreshold { scope: String },

    #[error("probe interval_secs must be at least 1")]
    ZeroInterval,

    #[error("probe timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("probe success_statuses must not be empty")]
    NoSuccessStatuses,
}

/// Validate the full configuration, collecting every problem found.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.domains.is_empty() {
        errors.push(ValidationError::NoDomains);
    }

    if config.probe.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.probe.success_statuses.is_empty() {
        errors.push(ValidationError::NoSuccessStatuses);
    }

    check_thresholds(
        "global thresholds",
        config.thresholds.fail_threshold,
        config.thresholds.recover_threshold,
        &mut errors,
    );

    let mut seen_domains = HashSet::new();
    for domain in &config.domains {
        if !seen_domains.insert(domain.name.clone()) {
            errors.push(ValidationError::DuplicateDomain(domain.name.clone()));
        }

        if domain.targets.is_empty() {
            errors.push(ValidationError::NoTargets {
                domain: domain.name.clone(),
            });
        }

        if let Some(t) = domain.thresholds {
            check_thresholds(
                &format!("domain {}", domain.name),
                t.fail_threshold,
                t.recover_threshold,
                &mut errors,
            );
        }

        let mut seen_regions = HashSet::new();
        for target in &domain.targets {
            if !seen_regions.insert(target.region_id.clone()) {
                errors.push(ValidationError::DuplicateRegion {
                    domain: domain.name.clone(),
                    region: target.region_id.clone(),
                });
            }

            match Url::parse(&target.health_check_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError::UnsupportedHealthScheme {
                    domain: domain.name.clone(),
                    region: target.region_id.clone(),
                    scheme: url.scheme().to_string(),
                }),
                Err(_) => errors.push(ValidationError::InvalidHealthUrl {
                    domain: domain.name.clone(),
                    region: target.region_id.clone(),
                    url: target.health_check_url.clone(),
                }),
            }

            if target.dns_value.trim().is_empty() {
                errors.push(ValidationError::EmptyDnsValue {
                    domain: domain.name.clone(),
                    region: target.region_id.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_thresholds(scope: &str, fail: u32, recover: u32, errors: &mut Vec<ValidationError>) {
    if fail == 0 {
        errors.push(ValidationError::ZeroFailThreshold {
            scope: scope.to_string(),
        });
    }
    if recover == 0 {
        errors.push(ValidationError::ZeroRecoverThreshold {
            scope: scope.to_string(),
        });
    }
}
