//! Error types for request validation, scoring, and startup

use thiserror::Error;

/// A request payload failed schema validation.
///
/// Always surfaced to the client as a 400; never fatal to the process.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must be a number")]
    NonNumericField(&'static str),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

/// Scaler or classifier invocation failed for a single request.
///
/// Terminal for that request only; surfaced as a 400.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("amount must be a finite number, got {0}")]
    NonFiniteAmount(f64),
    #[error("scaled amount is not a finite number")]
    NonFiniteScaledAmount,
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("classifier inference failed: {0}")]
    Inference(#[from] ort::Error),
    #[error("classifier produced malformed output: {0}")]
    MalformedOutput(String),
    #[error("classifier lock poisoned")]
    LockPoisoned,
}

/// Artifact loading failed; the process must not become ready.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read scaler artifact {path}: {source}")]
    ScalerRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scaler artifact {path}: {source}")]
    ScalerParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scaler artifact {path} has invalid parameters (center={center}, scale={scale})")]
    ScalerInvalid {
        path: String,
        center: f64,
        scale: f64,
    },
    #[error("failed to load classifier model {path}: {source}")]
    ClassifierLoad {
        path: String,
        #[source]
        source: ort::Error,
    },
    #[error("failed to initialize ONNX runtime: {0}")]
    Runtime(#[from] ort::Error),
}
