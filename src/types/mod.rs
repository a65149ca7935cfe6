//! Type definitions for the fraud detection API

pub mod prediction;
pub mod transaction;

pub use prediction::PredictionResult;
pub use transaction::TransactionFeatures;
