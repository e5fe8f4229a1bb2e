//! Axum HTTP server: stateless endpoints over the probability engine.
//!
//! Every request is solved from scratch; the only shared state is the
//! immutable [`EngineConfig`] holding the table-size and point bounds. DP work runs on
//! the blocking pool so large tables never stall the async workers.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/probability` | Single- or multi-stage scenario → `ProbabilityReport` |
//! | POST | `/curve` | Probability at each step up to the window |
//! | POST | `/tickets` | Probability for 0..=N one-hour tickets |
//! | POST | `/batch` | Array of scenarios → per-item report or error |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::{evaluate_with, EngineConfig};
use crate::error::ScenarioError;
use crate::sweep::{evaluate_batch, probability_curve, ticket_table};
use crate::types::{Scenario, ScenarioRequest};

pub type AppState = Arc<EngineConfig>;

type ApiResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

pub fn create_router(config: EngineConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/probability", post(handle_probability))
        .route("/curve", post(handle_curve))
        .route("/tickets", post(handle_tickets))
        .route("/batch", post(handle_batch))
        .layer(cors)
        .with_state(Arc::new(config))
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct CurveRequest {
    scenario: ScenarioRequest,
    step_seconds: f64,
}

#[derive(Deserialize)]
struct TicketsRequest {
    scenario: ScenarioRequest,
    max_tickets: u32,
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": msg })))
}

fn rejected(err: ScenarioError) -> (StatusCode, Json<serde_json::Value>) {
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

/// Unwrap a JSON body, answering malformed or mis-shaped input with a 400 that
/// carries the deserializer's message.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, (StatusCode, Json<serde_json::Value>)> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        tracing::debug!(%status, reason = %rejection.body_text(), "rejecting request body");
        error_response(status, &rejection.body_text())
    })
}

/// Run a solver call on the blocking pool and serialize its result.
async fn solve<T, F>(f: F) -> ApiResult
where
    T: serde::Serialize + Send + 'static,
    F: FnOnce() -> Result<T, ScenarioError> + Send + 'static,
{
    let out = tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "solver task failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "solver task failed")
    })?;
    let value = out.map_err(rejected)?;
    serde_json::to_value(value)
        .map(Json)
        .map_err(|_| error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to encode result"))
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_probability(
    State(config): State<AppState>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> ApiResult {
    let scenario: Scenario = json_body(payload)?.into();
    solve(move || evaluate_with(&scenario, &config)).await
}

async fn handle_curve(
    State(config): State<AppState>,
    payload: Result<Json<CurveRequest>, JsonRejection>,
) -> ApiResult {
    let req = json_body(payload)?;
    let scenario: Scenario = req.scenario.into();
    let step = req.step_seconds;
    solve(move || probability_curve(&scenario, step, &config)).await
}

async fn handle_tickets(
    State(config): State<AppState>,
    payload: Result<Json<TicketsRequest>, JsonRejection>,
) -> ApiResult {
    let req = json_body(payload)?;
    let scenario: Scenario = req.scenario.into();
    let max = req.max_tickets;
    solve(move || ticket_table(&scenario, max, &config)).await
}

async fn handle_batch(
    State(config): State<AppState>,
    payload: Result<Json<Vec<ScenarioRequest>>, JsonRejection>,
) -> ApiResult {
    let scenarios: Vec<Scenario> = json_body(payload)?
        .into_iter()
        .map(Into::into)
        .collect();
    solve(move || {
        let items: Vec<serde_json::Value> = evaluate_batch(&scenarios, &config)
            .into_iter()
            .map(|r| match r {
                Ok(report) => serde_json::json!(report),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            })
            .collect();
        Ok(items)
    })
    .await
}
