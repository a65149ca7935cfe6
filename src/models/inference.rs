//! Fraud classifier inference using ONNX Runtime

use crate::error::{ScoringError, StartupError};
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::transaction::FEATURE_COUNT;
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// A model mapping a feature vector to a positive-class probability.
///
/// Production uses the ONNX-backed implementation; tests substitute
/// deterministic stand-ins.
pub trait ProbabilityModel: Send + Sync {
    /// Probability that the input belongs to the positive ("fraud") class.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError>;
}

/// ONNX-backed fraud classifier.
///
/// `Session::run` needs exclusive access, so the loaded model sits behind
/// an `RwLock` and concurrent requests serialize on the write lock for the
/// duration of a single inference call.
pub struct OnnxClassifier {
    model: RwLock<LoadedModel>,
}

impl OnnxClassifier {
    /// Load the classifier artifact from a configured path.
    pub fn from_path<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, StartupError> {
        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load_model(path)?;
        Ok(Self {
            model: RwLock::new(model),
        })
    }

    /// Extract the fraud probability from model output.
    ///
    /// Handles both tensor outputs (XGBoost, RandomForest exports) and
    /// seq(map) outputs (CatBoost, LightGBM exports).
    fn extract_probability(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<f64, ScoringError> {
        if let Some(output) = outputs.get(output_name) {
            if let Some(prob) = Self::probability_from_value(output)? {
                return Ok(prob);
            }
        }

        // Fallback: iterate all outputs, skipping the class-label tensor
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(prob) = Self::probability_from_value(&output)? {
                debug!(output = %name, "Extracted probability from fallback output");
                return Ok(prob);
            }
        }

        Err(ScoringError::MalformedOutput(
            "no two-class probability output found".to_string(),
        ))
    }

    /// Try to read a positive-class probability out of a single output value.
    fn probability_from_value(
        output: &ort::value::DynValue,
    ) -> Result<Option<f64>, ScoringError> {
        // Tensor format first (XGBoost, Random Forest)
        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return Ok(positive_class_probability(&dims, data));
        }

        // Sequence format (CatBoost, LightGBM) - seq(map(int64, float))
        if DynSequenceValueType::can_downcast(&output.dtype()) {
            return Self::probability_from_sequence_map(output).map(Some);
        }

        Ok(None)
    }

    /// Extract the class-1 probability from a seq(map(int64, float)) output.
    fn probability_from_sequence_map(
        output: &ort::value::DynValue,
    ) -> Result<f64, ScoringError> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| ScoringError::MalformedOutput(format!("not a sequence: {e}")))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        if maps.is_empty() {
            return Err(ScoringError::MalformedOutput("empty sequence".to_string()));
        }

        // Single-row batch, so only the first map matters
        let kv_pairs = maps[0].try_extract_key_values::<i64, f32>()?;

        for (class_id, prob) in &kv_pairs {
            if *class_id == 1 {
                return Ok(*prob as f64);
            }
        }
        for (class_id, prob) in &kv_pairs {
            if *class_id == 0 {
                return Ok(1.0 - *prob as f64);
            }
        }

        Err(ScoringError::MalformedOutput(
            "no class probability found in map".to_string(),
        ))
    }
}

impl ProbabilityModel for OnnxClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
        use ort::value::Tensor;

        if features.len() != FEATURE_COUNT {
            return Err(ScoringError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }

        // Single-row batch - shape [1, num_features], float32 at the ONNX boundary
        let input: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor = Tensor::from_array((shape, input))?;

        let mut guard = self.model.write().map_err(|_| ScoringError::LockPoisoned)?;
        let model = &mut *guard;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        let score = Self::extract_probability(&outputs, &model.output_name)?;
        debug!(raw_probability = score, "Classifier inference complete");

        Ok(score.clamp(0.0, 1.0))
    }
}

/// Positive-class probability from a single-row probability tensor.
///
/// Accepts the shapes two-class converters emit; anything else is treated
/// as malformed by the caller.
fn positive_class_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    match dims {
        // [batch, num_classes] - fraud class is index 1
        [1, 2] | [2] => data.get(1).map(|&v| v as f64),
        // [batch, 1] - single positive-class probability
        [1, 1] | [1] => data.first().map(|&v| v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor_picks_index_one() {
        assert_eq!(positive_class_probability(&[1, 2], &[0.3, 0.7]), Some(0.7f32 as f64));
        assert_eq!(positive_class_probability(&[2], &[0.9, 0.1]), Some(0.1f32 as f64));
    }

    #[test]
    fn test_single_output_tensor_is_positive_probability() {
        assert_eq!(positive_class_probability(&[1, 1], &[0.42]), Some(0.42f32 as f64));
        assert_eq!(positive_class_probability(&[1], &[0.42]), Some(0.42f32 as f64));
    }

    #[test]
    fn test_unexpected_shape_is_rejected() {
        assert_eq!(positive_class_probability(&[3, 2], &[0.1; 6]), None);
        assert_eq!(positive_class_probability(&[1, 2], &[0.1]), None);
        assert_eq!(positive_class_probability(&[], &[]), None);
    }
}
