//! Model artifact loading and inference

pub mod inference;
pub mod loader;
pub mod scaler;

pub use inference::{OnnxClassifier, ProbabilityModel};
pub use loader::ModelLoader;
pub use scaler::AmountScaler;
