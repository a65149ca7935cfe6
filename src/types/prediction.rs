//! Prediction result returned to API clients

use serde::{Deserialize, Serialize};

/// Decision threshold applied to the raw fraud probability. Strictly
/// greater-than: a probability of exactly 0.5 is not flagged.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Response message when a transaction is flagged.
pub const FRAUD_MESSAGE: &str = "Likely a Fraud transaction";

/// Response message when a transaction is not flagged.
pub const NOT_FRAUD_MESSAGE: &str = "Likely NOT a Fraud transaction";

/// Outcome of scoring a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Binary decision: raw probability strictly above the threshold
    pub fraudulent: bool,
    /// Positive-class probability, rounded to 4 decimal places
    pub fraud_probability: f64,
    /// Human-readable summary of the decision
    pub message: String,
}

impl PredictionResult {
    /// Build a result from the raw positive-class probability.
    ///
    /// The decision compares the raw probability against the threshold;
    /// only the reported probability is rounded.
    pub fn from_raw_probability(raw: f64) -> Self {
        let fraudulent = raw > DECISION_THRESHOLD;
        Self {
            fraudulent,
            fraud_probability: round_to_4(raw),
            message: if fraudulent {
                FRAUD_MESSAGE.to_string()
            } else {
                NOT_FRAUD_MESSAGE.to_string()
            },
        }
    }
}

fn round_to_4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let result = PredictionResult::from_raw_probability(0.5);
        assert!(!result.fraudulent);
        assert_eq!(result.message, NOT_FRAUD_MESSAGE);

        let result = PredictionResult::from_raw_probability(0.5000001);
        assert!(result.fraudulent);
        assert_eq!(result.message, FRAUD_MESSAGE);
    }

    #[test]
    fn test_decision_uses_raw_probability() {
        // rounds down to 0.5 in the response, but the raw value decides
        let result = PredictionResult::from_raw_probability(0.50004);
        assert!(result.fraudulent);
        assert_eq!(result.fraud_probability, 0.5);
    }

    #[test]
    fn test_probability_rounding() {
        let result = PredictionResult::from_raw_probability(0.12345678);
        assert_eq!(result.fraud_probability, 0.1235);

        let result = PredictionResult::from_raw_probability(0.98765432);
        assert_eq!(result.fraud_probability, 0.9877);
    }

    #[test]
    fn test_serialization_shape() {
        let result = PredictionResult::from_raw_probability(0.87);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["fraudulent"], true);
        assert_eq!(json["fraud_probability"], 0.87);
        assert_eq!(json["message"], FRAUD_MESSAGE);
    }
}
