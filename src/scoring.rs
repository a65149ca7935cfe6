//! Scoring: scale the amount, assemble the feature vector, classify

use crate::error::ScoringError;
use crate::models::inference::ProbabilityModel;
use crate::models::scaler::AmountScaler;
use crate::types::prediction::PredictionResult;
use crate::types::transaction::TransactionFeatures;
use tracing::debug;

/// Read-only scoring context shared by all requests.
///
/// Holds the artifacts loaded at startup; never mutated for the life of
/// the process.
pub struct ScoringService {
    scaler: AmountScaler,
    classifier: Box<dyn ProbabilityModel>,
}

impl ScoringService {
    /// Create a scoring service from loaded artifacts.
    pub fn new(scaler: AmountScaler, classifier: Box<dyn ProbabilityModel>) -> Self {
        Self { scaler, classifier }
    }

    /// Score a validated transaction.
    ///
    /// Scales the amount, builds the 29-element input vector, runs the
    /// classifier, and applies the decision rule to the raw probability.
    pub fn score(&self, features: &TransactionFeatures) -> Result<PredictionResult, ScoringError> {
        let scaled_amount = self.scaler.transform(features.amount)?;
        let vector = features.feature_vector(scaled_amount);
        let raw = self.classifier.predict_proba(&vector)?;

        debug!(
            scaled_amount = scaled_amount,
            raw_probability = raw,
            "Transaction scored"
        );

        Ok(PredictionResult::from_raw_probability(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::FEATURE_COUNT;

    /// Stand-in classifier returning a fixed probability.
    struct FixedProbability(f64);

    impl ProbabilityModel for FixedProbability {
        fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
            assert_eq!(features.len(), FEATURE_COUNT);
            Ok(self.0)
        }
    }

    /// Stand-in classifier deriving its output from the scaled amount,
    /// which sits at the end of the vector.
    struct AmountEcho;

    impl ProbabilityModel for AmountEcho {
        fn predict_proba(&self, features: &[f64]) -> Result<f64, ScoringError> {
            Ok(features[FEATURE_COUNT - 1])
        }
    }

    fn service(classifier: Box<dyn ProbabilityModel>) -> ScoringService {
        ScoringService::new(AmountScaler::new(0.0, 1.0), classifier)
    }

    #[test]
    fn test_score_flags_high_probability() {
        let service = service(Box::new(FixedProbability(0.87)));
        let result = service.score(&TransactionFeatures::sample()).unwrap();

        assert!(result.fraudulent);
        assert_eq!(result.fraud_probability, 0.87);
    }

    #[test]
    fn test_exact_threshold_is_not_fraud() {
        let service = service(Box::new(FixedProbability(0.5)));
        let result = service.score(&TransactionFeatures::sample()).unwrap();

        assert!(!result.fraudulent);
    }

    #[test]
    fn test_classifier_sees_scaled_amount() {
        // center 239.0, scale 1.0 puts the sample amount at 0.93 scaled
        let service = ScoringService::new(AmountScaler::new(239.0, 1.0), Box::new(AmountEcho));
        let result = service.score(&TransactionFeatures::sample()).unwrap();

        assert!((result.fraud_probability - 0.93).abs() < 1e-9);
        assert!(result.fraudulent);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let service = service(Box::new(FixedProbability(0.3)));
        let features = TransactionFeatures::sample();

        let first = service.score(&features).unwrap();
        let second = service.score(&features).unwrap();

        assert_eq!(first.fraudulent, second.fraudulent);
        assert_eq!(first.fraud_probability, second.fraud_probability);
        assert_eq!(first.message, second.message);
    }

    #[test]
    fn test_non_finite_amount_fails_scoring() {
        let service = service(Box::new(FixedProbability(0.3)));
        let mut features = TransactionFeatures::sample();
        features.amount = f64::NAN;

        assert!(matches!(
            service.score(&features),
            Err(ScoringError::NonFiniteAmount(_))
        ));
    }
}
