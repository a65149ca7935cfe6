//! HTTP endpoint layer: liveness check and the scoring endpoint

use crate::error::{ScoringError, ValidationError};
use crate::metrics::ScoringMetrics;
use crate::scoring::ScoringService;
use crate::types::prediction::PredictionResult;
use crate::types::transaction::TransactionFeatures;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{debug, warn};

/// Shared state captured by the request handlers.
pub struct AppState {
    pub scoring: ScoringService,
    pub metrics: Arc<ScoringMetrics>,
}

/// Per-request failure surfaced to the client as a 400 response.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Scoring(ScoringError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        Self::Scoring(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self {
            Self::Validation(err) => err.to_string(),
            Self::Scoring(err) => err.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Build the application router.
///
/// The CORS spec forbids wildcard origins/methods/headers alongside
/// credentials, so the layer mirrors whatever the request asks for -
/// the same allow-everything posture, suitable for demo use only.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(liveness))
        .route("/predict", post(predict))
        .layer(cors)
        .with_state(state)
}

/// Liveness check: a fixed payload, no side effects.
async fn liveness() -> Json<Value> {
    Json(json!({ "message": "Fraud Detection API is up and running." }))
}

/// Score one transaction: parse, validate, scale, classify, respond.
async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        state.metrics.record_validation_failure();
        warn!(error = %rejection.body_text(), "Request body rejected");
        ApiError::Validation(ValidationError::InvalidBody(rejection.body_text()))
    })?;

    let features = TransactionFeatures::from_value(&payload).map_err(|err| {
        state.metrics.record_validation_failure();
        warn!(error = %err, "Request failed validation");
        ApiError::Validation(err)
    })?;

    let start = Instant::now();
    match state.scoring.score(&features) {
        Ok(result) => {
            let processing_time = start.elapsed();
            state
                .metrics
                .record_request(processing_time, result.fraud_probability, result.fraudulent);
            debug!(
                fraudulent = result.fraudulent,
                fraud_probability = result.fraud_probability,
                processing_time_us = processing_time.as_micros(),
                "Transaction scored"
            );
            Ok(Json(result))
        }
        Err(err) => {
            state.metrics.record_scoring_failure();
            warn!(error = %err, "Scoring failed");
            Err(ApiError::Scoring(err))
        }
    }
}
