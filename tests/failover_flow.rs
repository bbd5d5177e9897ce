//! End-to-end failover scenarios driven through a real reconciliation
//! loop: live HTTP probes against mock health endpoints, in-memory DNS
//! provider, ticks invoked directly for determinism.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use failoverd::config::{
    DomainConfig, EndpointTarget, ProbeConfig, ThresholdConfig,
};
use failoverd::controller::{DomainRunner, StatusRegistry};
use failoverd::dns::{ProviderHandle, RecordType};
use failoverd::lifecycle::Shutdown;

mod common;

fn target(region: &str, addr: SocketAddr, priority: u32) -> EndpointTarget {
    EndpointTarget {
        region_id: region.to_string(),
        health_check_url: format!("http://{addr}/healthz"),
        dns_value: format!("lb.{region}.example.com"),
        priority,
    }
}

fn domain(targets: Vec<EndpointTarget>) -> DomainConfig {
    DomainConfig {
        name: "app.example.com".to_string(),
        record_type: RecordType::Cname,
        ttl_secs: 60,
        targets,
        thresholds: None,
    }
}

fn probe_config() -> ProbeConfig {
    ProbeConfig {
        interval_secs: 1,
        timeout_secs: 1,
        success_statuses: vec![200],
    }
}

fn thresholds() -> ThresholdConfig {
    ThresholdConfig {
        fail_threshold: 3,
        recover_threshold: 5,
    }
}

fn memory_provider() -> Arc<ProviderHandle> {
    Arc::new(ProviderHandle::Memory(
        failoverd::dns::MemoryDnsProvider::new(),
    ))
}

fn memory(provider: &ProviderHandle) -> &failoverd::dns::MemoryDnsProvider {
    match provider {
        ProviderHandle::Memory(m) => m,
        _ => panic!("expected memory provider"),
    }
}

#[tokio::test]
async fn failover_to_secondary_then_recover() {
    let primary_healthy = Arc::new(AtomicBool::new(true));
    let secondary_healthy = Arc::new(AtomicBool::new(true));
    let primary_addr = common::start_health_endpoint(primary_healthy.clone()).await;
    let secondary_addr = common::start_health_endpoint(secondary_healthy.clone()).await;

    let provider = memory_provider();
    let registry = StatusRegistry::new();
    let mut runner = DomainRunner::new(
        &domain(vec![
            target("primary", primary_addr, 20),
            target("secondary", secondary_addr, 10),
        ]),
        &probe_config(),
        thresholds(),
        Arc::clone(&provider),
        registry.clone(),
        false,
    );

    // First tick: both healthy, record created pointing at the primary.
    runner.tick().await;
    assert_eq!(runner.state().active_region_id, "primary");
    assert_eq!(
        memory(&provider).value_of("app.example.com").as_deref(),
        Some("lb.primary.example.com")
    );
    assert_eq!(memory(&provider).writes_applied(), 1);

    // Primary goes dark. Two failing ticks: below fail_threshold, no switch.
    primary_healthy.store(false, Ordering::SeqCst);
    runner.tick().await;
    runner.tick().await;
    assert_eq!(runner.state().active_region_id, "primary");
    assert_eq!(memory(&provider).writes_applied(), 1);

    // Third failure crosses the threshold: one update to the secondary.
    runner.tick().await;
    assert_eq!(runner.state().active_region_id, "secondary");
    assert_eq!(
        memory(&provider).value_of("app.example.com").as_deref(),
        Some("lb.secondary.example.com")
    );
    assert_eq!(memory(&provider).writes_applied(), 2);

    // Primary comes back. Four successes are not enough to fail back.
    primary_healthy.store(true, Ordering::SeqCst);
    for _ in 0..4 {
        runner.tick().await;
    }
    assert_eq!(runner.state().active_region_id, "secondary");
    assert_eq!(memory(&provider).writes_applied(), 2);

    // Fifth success crosses recover_threshold: one update back to primary.
    runner.tick().await;
    assert_eq!(runner.state().active_region_id, "primary");
    assert_eq!(
        memory(&provider).value_of("app.example.com").as_deref(),
        Some("lb.primary.example.com")
    );
    assert_eq!(memory(&provider).writes_applied(), 3);

    // Status surface saw both transitions.
    let status = registry.get("app.example.com").unwrap();
    assert_eq!(status.history.len(), 2);
    assert_eq!(status.history[0].to_region, "secondary");
    assert_eq!(status.history[1].to_region, "primary");
    assert!(status.dns.in_sync);
}

#[tokio::test]
async fn both_regions_down_fails_open() {
    let primary_healthy = Arc::new(AtomicBool::new(true));
    let primary_addr = common::start_health_endpoint(primary_healthy.clone()).await;
    let dead_addr = common::dead_endpoint().await;

    let provider = memory_provider();
    let registry = StatusRegistry::new();
    let mut runner = DomainRunner::new(
        &domain(vec![
            target("primary", primary_addr, 20),
            target("secondary", dead_addr, 10),
        ]),
        &probe_config(),
        thresholds(),
        Arc::clone(&provider),
        registry.clone(),
        false,
    );

    runner.tick().await;
    assert_eq!(memory(&provider).writes_applied(), 1);

    // Now every region is unhealthy: the record must stay put.
    primary_healthy.store(false, Ordering::SeqCst);
    for _ in 0..5 {
        runner.tick().await;
    }
    assert_eq!(runner.state().active_region_id, "primary");
    assert_eq!(
        memory(&provider).value_of("app.example.com").as_deref(),
        Some("lb.primary.example.com")
    );
    assert_eq!(memory(&provider).writes_applied(), 1);
}

#[tokio::test]
async fn failed_dns_write_is_retried_next_tick() {
    let healthy = Arc::new(AtomicBool::new(true));
    let addr = common::start_health_endpoint(healthy).await;

    let provider = memory_provider();
    let registry = StatusRegistry::new();
    let mut runner = DomainRunner::new(
        &domain(vec![target("primary", addr, 20)]),
        &probe_config(),
        thresholds(),
        Arc::clone(&provider),
        registry.clone(),
        false,
    );

    memory(&provider).fail_next_writes(1);

    runner.tick().await;
    assert_eq!(memory(&provider).writes_applied(), 0);
    let status = registry.get("app.example.com").unwrap();
    assert!(!status.dns.in_sync);
    assert!(status.dns.last_error.is_some());

    // Next tick carries the same desired state and the write lands.
    runner.tick().await;
    assert_eq!(memory(&provider).writes_applied(), 1);
    let status = registry.get("app.example.com").unwrap();
    assert!(status.dns.in_sync);
    assert!(status.dns.last_error.is_none());
}

#[tokio::test]
async fn dry_run_never_writes() {
    let healthy = Arc::new(AtomicBool::new(true));
    let addr = common::start_health_endpoint(healthy).await;

    let provider = memory_provider();
    let mut runner = DomainRunner::new(
        &domain(vec![target("primary", addr, 20)]),
        &probe_config(),
        thresholds(),
        Arc::clone(&provider),
        StatusRegistry::new(),
        true,
    );

    runner.tick().await;
    runner.tick().await;
    assert_eq!(memory(&provider).writes_applied(), 0);
    assert!(memory(&provider).value_of("app.example.com").is_none());
}

#[tokio::test]
async fn loop_exits_cleanly_on_shutdown() {
    let healthy = Arc::new(AtomicBool::new(true));
    let addr = common::start_health_endpoint(healthy).await;

    let provider = memory_provider();
    let runner = DomainRunner::new(
        &domain(vec![target("primary", addr, 20)]),
        &probe_config(),
        thresholds(),
        provider,
        StatusRegistry::new(),
        false,
    );

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(runner.run(shutdown.subscribe()));

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    shutdown.trigger();

    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("loop did not exit after shutdown")
        .unwrap();
}
