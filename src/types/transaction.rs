//! Transaction feature schema and request validation

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Length of the model input vector: 28 anonymized components plus the
/// scaled amount.
pub const FEATURE_COUNT: usize = 29;

/// The exact set of required request fields, in model input order.
pub const REQUIRED_FIELDS: [&str; FEATURE_COUNT] = [
    "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26", "V27",
    "V28", "Amount",
];

/// A transaction to be scored.
///
/// `V1`..`V28` are anonymized real-valued components with no semantic
/// meaning beyond their position; `Amount` is the raw transaction amount
/// and is the only field the scaler touches. All 29 fields are required.
/// The record lives for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionFeatures {
    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "V5")]
    pub v5: f64,
    #[serde(rename = "V6")]
    pub v6: f64,
    #[serde(rename = "V7")]
    pub v7: f64,
    #[serde(rename = "V8")]
    pub v8: f64,
    #[serde(rename = "V9")]
    pub v9: f64,
    #[serde(rename = "V10")]
    pub v10: f64,
    #[serde(rename = "V11")]
    pub v11: f64,
    #[serde(rename = "V12")]
    pub v12: f64,
    #[serde(rename = "V13")]
    pub v13: f64,
    #[serde(rename = "V14")]
    pub v14: f64,
    #[serde(rename = "V15")]
    pub v15: f64,
    #[serde(rename = "V16")]
    pub v16: f64,
    #[serde(rename = "V17")]
    pub v17: f64,
    #[serde(rename = "V18")]
    pub v18: f64,
    #[serde(rename = "V19")]
    pub v19: f64,
    #[serde(rename = "V20")]
    pub v20: f64,
    #[serde(rename = "V21")]
    pub v21: f64,
    #[serde(rename = "V22")]
    pub v22: f64,
    #[serde(rename = "V23")]
    pub v23: f64,
    #[serde(rename = "V24")]
    pub v24: f64,
    #[serde(rename = "V25")]
    pub v25: f64,
    #[serde(rename = "V26")]
    pub v26: f64,
    #[serde(rename = "V27")]
    pub v27: f64,
    #[serde(rename = "V28")]
    pub v28: f64,
    /// Raw transaction amount, scaled before inference
    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl TransactionFeatures {
    /// Validate an arbitrary JSON payload against the 29-field schema.
    ///
    /// Each required field must be present and representable as a number;
    /// unknown extra fields are ignored. The first violation wins and names
    /// the offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None => return Err(ValidationError::MissingField(field)),
                Some(v) if v.as_f64().is_none() => {
                    return Err(ValidationError::NonNumericField(field))
                }
                Some(_) => {}
            }
        }

        serde_json::from_value(value.clone())
            .map_err(|e| ValidationError::InvalidBody(e.to_string()))
    }

    /// Assemble the model input vector: `V1`..`V28` in ascending suffix
    /// order, followed by the scaled amount.
    pub fn feature_vector(&self, scaled_amount: f64) -> [f64; FEATURE_COUNT] {
        [
            self.v1,
            self.v2,
            self.v3,
            self.v4,
            self.v5,
            self.v6,
            self.v7,
            self.v8,
            self.v9,
            self.v10,
            self.v11,
            self.v12,
            self.v13,
            self.v14,
            self.v15,
            self.v16,
            self.v17,
            self.v18,
            self.v19,
            self.v20,
            self.v21,
            self.v22,
            self.v23,
            self.v24,
            self.v25,
            self.v26,
            self.v27,
            self.v28,
            scaled_amount,
        ]
    }

    /// A documented example transaction, used by tests and the demo client.
    pub fn sample() -> Self {
        Self {
            v1: -2.30334956758553,
            v2: 1.759247460267,
            v3: -0.359744743330052,
            v4: 2.33024305053917,
            v5: -0.821628328375422,
            v6: -0.0757875706194599,
            v7: 0.562319782266954,
            v8: -0.399146578487216,
            v9: -0.238253367661746,
            v10: -1.52541162656194,
            v11: 2.03291215755072,
            v12: -6.56012429505962,
            v13: 0.0229373234890961,
            v14: -1.47010153611197,
            v15: -0.698826068579047,
            v16: -2.28219382856251,
            v17: -4.78183085597533,
            v18: -2.61566494476124,
            v19: -1.33444106667307,
            v20: -0.430021867171611,
            v21: -0.294166317554753,
            v22: -0.932391057274991,
            v23: 0.172726295799422,
            v24: -0.0873295379700724,
            v25: -0.156114264651172,
            v26: -0.542627889040196,
            v27: 0.0395659889264757,
            v28: -0.153028796529788,
            amount: 239.93,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload_parses() {
        let payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        let features = TransactionFeatures::from_value(&payload).unwrap();

        assert_eq!(features.v1, -2.30334956758553);
        assert_eq!(features.amount, 239.93);
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let mut payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        payload.as_object_mut().unwrap().remove("V17");

        let err = TransactionFeatures::from_value(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField("V17")));
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let mut payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        payload
            .as_object_mut()
            .unwrap()
            .insert("Amount".to_string(), json!("a lot"));

        let err = TransactionFeatures::from_value(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericField("Amount")));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        payload
            .as_object_mut()
            .unwrap()
            .insert("merchant_id".to_string(), json!("m_42"));

        assert!(TransactionFeatures::from_value(&payload).is_ok());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = TransactionFeatures::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ValidationError::NotAnObject));
    }

    #[test]
    fn test_integer_values_are_accepted() {
        let mut payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        payload
            .as_object_mut()
            .unwrap()
            .insert("Amount".to_string(), json!(240));

        let features = TransactionFeatures::from_value(&payload).unwrap();
        assert_eq!(features.amount, 240.0);
    }

    #[test]
    fn test_feature_vector_order() {
        let features = TransactionFeatures::sample();
        let vector = features.feature_vector(2.82);

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector[0], features.v1);
        assert_eq!(vector[27], features.v28);
        // the raw amount never enters the vector, its scaled value does
        assert_eq!(vector[28], 2.82);
    }

    #[test]
    fn test_required_fields_cover_the_schema() {
        let payload = serde_json::to_value(TransactionFeatures::sample()).unwrap();
        let object = payload.as_object().unwrap();

        assert_eq!(object.len(), FEATURE_COUNT);
        for field in REQUIRED_FIELDS {
            assert!(object.contains_key(field), "schema is missing {field}");
        }
    }
}
