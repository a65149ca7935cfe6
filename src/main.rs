//! Fraud Detection API - Main Entry Point
//!
//! Loads the scaler and classifier artifacts, then serves the scoring
//! endpoint over HTTP.

use anyhow::{Context, Result};
use fraud_detection_api::config::AppConfig;
use fraud_detection_api::metrics::{MetricsReporter, ScoringMetrics};
use fraud_detection_api::models::inference::OnnxClassifier;
use fraud_detection_api::models::scaler::AmountScaler;
use fraud_detection_api::scoring::ScoringService;
use fraud_detection_api::server::{build_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config.logging.level, &config.logging.format);

    info!("Starting Fraud Detection API");
    info!("Configuration loaded successfully");

    // Load artifacts; a failure here means the process never becomes ready
    let scaler = AmountScaler::from_path(&config.models.scaler_path)?;
    let classifier =
        OnnxClassifier::from_path(&config.models.classifier_path, config.models.onnx_threads)?;
    let scoring = ScoringService::new(scaler, Box::new(classifier));
    info!("Scoring context initialized");

    // Initialize metrics and the periodic reporter (summary every 30 seconds)
    let metrics = Arc::new(ScoringMetrics::new());
    let reporter_metrics = metrics.clone();
    tokio::spawn(async move {
        MetricsReporter::new(reporter_metrics, 30).start().await;
    });

    let state = Arc::new(AppState { scoring, metrics });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;
    info!("Fraud Detection API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("fraud_detection_api={level}")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
