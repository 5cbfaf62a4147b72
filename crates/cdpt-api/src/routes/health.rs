use axum::{extract::State, Json};
use cdpt_storage::{LoadStrategy, PayloadEncoding};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports liveness and how each upstream is configured. No upstream is
/// contacted.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let strategy = match state.archive.strategy() {
        LoadStrategy::ByIdentifier => "by_identifier",
        LoadStrategy::MostRecent => "most_recent",
    };
    let encoding = match state.archive.encoding() {
        PayloadEncoding::Base64 => "base64",
        PayloadEncoding::Raw => "raw",
    };
    services.insert(
        "storage".to_string(),
        format!("iagon ({}, {})", strategy, encoding),
    );
    services.insert("discord".to_string(), "configured".to_string());
    services.insert("maestro".to_string(), "configured".to_string());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
