//! HTTP endpoints for the envlog-service.
//!
//! Routes keep the paths the sensors and chart page already use:
//!
//! - `POST /posttemp` - Submit a reading (JSON body)
//! - `GET /temp` - Latest temperature for the configured default source
//! - `GET /{source}/temp` - Latest temperature for a source
//! - `GET /{source}/latest` - Latest full sample for a source (404 if none)
//! - `GET /{source}/getHist` - Downsampled history for a source
//! - `GET /ping` - Reachability check
//! - `GET /api/health` - Service health
//! - `GET /api/sources` - Sources that have reported
//!
//! # Blocking
//!
//! Store calls are synchronous SQLite I/O, so every handler runs them on
//! tokio's blocking pool rather than on the async worker threads.
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Malformed
//! readings return HTTP 400; a source with no readings returns HTTP 404 from
//! `/{source}/latest`; store failures return HTTP 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use envlog_types::{Series, StoredSample};

use crate::error::ServiceError;
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Write path
        .route("/posttemp", post(post_reading))
        // Read paths
        .route("/temp", get(get_default_latest))
        .route("/{source}/temp", get(get_latest))
        .route("/{source}/latest", get(get_latest_sample))
        .route("/{source}/getHist", get(get_history))
        // Health and discovery
        .route("/ping", get(ping))
        .route("/api/health", get(health))
        .route("/api/sources", get(list_sources))
}

/// Run a synchronous service call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Reachability check used by the sensors before posting.
async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}

/// Accept a reading from a sensor.
///
/// The body is parsed by the ingestor rather than an axum extractor so a
/// malformed payload surfaces as the core's invalid-input error.
async fn post_reading(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    run_blocking(move || state.ingestor.ingest(&body)).await?;
    Ok("Success!")
}

/// Latest temperature for the configured default source.
async fn get_default_latest(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    let source = state.config.server.default_source.clone();
    latest(state, source).await
}

/// Latest temperature for a source, as plain text.
///
/// A source with no readings returns `0`.
async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
) -> Result<String, AppError> {
    latest(state, source).await
}

async fn latest(state: Arc<AppState>, source: String) -> Result<String, AppError> {
    let temp = run_blocking(move || state.queries.latest(&source)).await?;
    Ok(temp.to_string())
}

/// Latest full sample for a source, as JSON.
async fn get_latest_sample(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
) -> Result<Json<StoredSample>, AppError> {
    let lookup = source.clone();
    run_blocking(move || state.queries.latest_sample(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No readings for source: {}", source)))
}

/// Downsampled recent history for a source.
///
/// Returns `{"Temps": [...], "Times": [...]}`, newest block first. An unknown
/// source returns two empty arrays.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
) -> Result<Json<Series>, AppError> {
    let series = run_blocking(move || state.queries.history(&source)).await?;
    Ok(Json(series))
}

/// List sources that have reported, most recently active first.
async fn list_sources(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    let sources = run_blocking(move || state.queries.sources()).await?;
    Ok(Json(sources))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Store(envlog_store::Error),
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidInput(e) => AppError::BadRequest(e.to_string()),
            ServiceError::StorageFailure(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            warn!("Request failed: {}", message);
        }

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
