//! Amount scaler artifact

use crate::error::{ScoringError, StartupError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Robust-scaler parameters fitted offline on the amount column.
///
/// The training pipeline exports the fitted center and scale as a small
/// JSON artifact; `transform` mirrors `(x - center) / scale`.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountScaler {
    center: f64,
    scale: f64,
}

impl AmountScaler {
    /// Create a scaler from known parameters.
    pub fn new(center: f64, scale: f64) -> Self {
        Self { center, scale }
    }

    /// Load fitted parameters from a JSON artifact.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StartupError> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).map_err(|source| StartupError::ScalerRead {
            path: path.display().to_string(),
            source,
        })?;

        let scaler: Self =
            serde_json::from_str(&raw).map_err(|source| StartupError::ScalerParse {
                path: path.display().to_string(),
                source,
            })?;

        if !scaler.center.is_finite() || !scaler.scale.is_finite() || scaler.scale == 0.0 {
            return Err(StartupError::ScalerInvalid {
                path: path.display().to_string(),
                center: scaler.center,
                scale: scaler.scale,
            });
        }

        info!(
            path = %path.display(),
            center = scaler.center,
            scale = scaler.scale,
            "Amount scaler loaded"
        );

        Ok(scaler)
    }

    /// Scale a raw transaction amount.
    pub fn transform(&self, amount: f64) -> Result<f64, ScoringError> {
        if !amount.is_finite() {
            return Err(ScoringError::NonFiniteAmount(amount));
        }

        let scaled = (amount - self.center) / self.scale;
        if !scaled.is_finite() {
            return Err(ScoringError::NonFiniteScaledAmount);
        }

        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_transform() {
        let scaler = AmountScaler::new(22.0, 77.165);

        let scaled = scaler.transform(22.0).unwrap();
        assert_eq!(scaled, 0.0);

        let scaled = scaler.transform(99.165).unwrap();
        assert!((scaled - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_amount_is_rejected() {
        let scaler = AmountScaler::new(22.0, 77.165);
        assert!(scaler.transform(f64::NAN).is_err());
        assert!(scaler.transform(f64::INFINITY).is_err());
    }

    #[test]
    fn test_load_from_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"center": 22.0, "scale": 77.165}}"#).unwrap();

        let scaler = AmountScaler::from_path(file.path()).unwrap();
        assert_eq!(scaler.transform(22.0).unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_artifact_fails_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            AmountScaler::from_path(file.path()),
            Err(StartupError::ScalerParse { .. })
        ));
    }

    #[test]
    fn test_zero_scale_fails_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"center": 22.0, "scale": 0.0}}"#).unwrap();

        assert!(matches!(
            AmountScaler::from_path(file.path()),
            Err(StartupError::ScalerInvalid { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_fails_startup() {
        assert!(matches!(
            AmountScaler::from_path("does/not/exist.json"),
            Err(StartupError::ScalerRead { .. })
        ));
    }
}
