//! Daemon entry point: load config, start one reconciliation loop per
//! domain, serve status and metrics, drain cleanly on SIGTERM/SIGINT.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures_util::future::join_all;

use failoverd::config;
use failoverd::controller::{DomainRunner, StatusRegistry};
use failoverd::dns::ProviderHandle;
use failoverd::lifecycle::{self, Shutdown};
use failoverd::observability;

#[derive(Parser)]
#[command(name = "failoverd")]
#[command(about = "DNS failover health-and-record reconciler", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,

    /// Log intended DNS updates without writing them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Bootstrap logging before config so load errors are visible;
    // the configured level only applies when RUST_LOG is unset.
    let config = match config::load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            observability::logging::init("info");
            tracing::error!(path = %args.config.display(), error = %e, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };
    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        domains = config.domains.len(),
        interval_secs = config.probe.interval_secs,
        dry_run = args.dry_run || config.dns.dry_run,
        "failoverd starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    error = %e,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let provider = match ProviderHandle::from_config(&config.dns) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::error!(error = %e, "DNS provider setup failed");
            return ExitCode::FAILURE;
        }
    };

    let registry = StatusRegistry::new();
    let shutdown = Shutdown::new();
    let dry_run = args.dry_run || config.dns.dry_run;

    let mut tasks = Vec::new();
    for domain in &config.domains {
        let runner = DomainRunner::new(
            domain,
            &config.probe,
            config.thresholds,
            Arc::clone(&provider),
            registry.clone(),
            dry_run,
        );
        tasks.push(tokio::spawn(runner.run(shutdown.subscribe())));
    }

    if config.status_api.enabled {
        let bind = config.status_api.bind_address.clone();
        let api_registry = registry.clone();
        let api_shutdown = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = failoverd::admin::serve(&bind, api_registry, api_shutdown).await {
                tracing::error!(error = %e, "Status API exited with error");
            }
        }));
    }

    lifecycle::wait_for_signal().await;
    shutdown.trigger();

    // Every loop finishes its in-flight tick before exiting.
    join_all(tasks).await;

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
