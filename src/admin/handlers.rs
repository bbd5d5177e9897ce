use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::controller::{DomainStatus, StatusRegistry};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub domains: usize,
}

pub async fn get_system(State(registry): State<StatusRegistry>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        domains: registry.all().len(),
    })
}

pub async fn get_all_domains(State(registry): State<StatusRegistry>) -> Json<Vec<DomainStatus>> {
    let statuses = registry.all().iter().map(|s| (**s).clone()).collect();
    Json(statuses)
}

pub async fn get_domain(
    State(registry): State<StatusRegistry>,
    Path(domain): Path<String>,
) -> Result<Json<DomainStatus>, StatusCode> {
    registry
        .get(&domain)
        .map(|s| Json((*s).clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn healthz() -> &'static str {
    "ok"
}
