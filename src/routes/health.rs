//! Lightweight service health endpoint used for readiness checks and tests.

use crate::suppression::SuppressionCache;
use chrono::{DateTime, Utc};
use rocket::{State, get};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

/// Basic response payload describing API health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` once a refresh has succeeded, `stale` before that.
    pub status: String,
    /// Number of cached addresses.
    pub entries: usize,
    #[serde(rename = "lastRefreshedAt")]
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

#[get("/health")]
pub fn health_check(cache: &State<SuppressionCache>) -> Json<HealthResponse> {
    let status = cache.status();
    let label = if status.is_fresh() { "ok" } else { "stale" };
    Json(HealthResponse {
        status: label.to_string(),
        entries: status.entries,
        last_refreshed_at: status.refreshed_at,
    })
}
