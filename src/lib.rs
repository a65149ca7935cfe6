//! Fraud Detection API Library
//!
//! A single-endpoint HTTP inference service: validates a fixed-shape
//! transaction payload, scales the amount with a pre-fitted transform,
//! runs a pre-trained classifier, and returns a fraud probability with
//! a binary decision.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{ScoringError, StartupError, ValidationError};
pub use models::inference::OnnxClassifier;
pub use models::scaler::AmountScaler;
pub use scoring::ScoringService;
pub use server::{build_router, AppState};
pub use types::{prediction::PredictionResult, transaction::TransactionFeatures};
