//! Logistic-regression classifier loaded from a JSON descriptor
//!
//! Lets a trained linear model ship as plain coefficients:
//!
//! ```json
//! { "coefficients": [0.04, 0.011], "intercept": -4.2,
//!   "scaler": { "mean": [45.0, 106.0], "scale": [16.0, 53.0] } }
//! ```

use super::Classifier;
use crate::error::PredictError;
use serde::Deserialize;

/// Per-feature standardization applied before the linear term
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    scaler: Option<StandardScaler>,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64, scaler: Option<StandardScaler>) -> Result<Self, String> {
        let model = Self {
            coefficients,
            intercept,
            scaler,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a JSON descriptor
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let model: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("non-finite coefficient".to_string());
        }
        if let Some(scaler) = &self.scaler {
            let n = self.coefficients.len();
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                ));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err("scaler contains a zero or non-finite scale".to_string());
            }
        }
        Ok(())
    }

    fn decision_function(&self, features: &[f64]) -> f64 {
        let terms = features.iter().zip(&self.coefficients).enumerate();
        let linear: f64 = match &self.scaler {
            Some(scaler) => terms
                .map(|(i, (x, c))| c * (x - scaler.mean[i]) / scaler.scale[i])
                .sum(),
            None => terms.map(|(_, (x, c))| c * x).sum(),
        };
        self.intercept + linear
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictError::invalid_vector(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }
        let p = sigmoid(self.decision_function(features));
        if !p.is_finite() {
            return Err(PredictError::classifier("non-finite probability"));
        }
        Ok(p)
    }

    fn kind(&self) -> &str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_decision_is_half() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0, None).unwrap();
        let p = model.predict_proba(&[3.0, 3.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_applied() {
        let scaler = StandardScaler {
            mean: vec![100.0],
            scale: vec![10.0],
        };
        let model = LogisticClassifier::new(vec![2.0], 0.0, Some(scaler)).unwrap();
        // (110 - 100) / 10 * 2 = 2
        let p = model.predict_proba(&[110.0]).unwrap();
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_parse_descriptor() {
        let json = br#"{"coefficients": [0.5, 0.25], "intercept": -1.0}"#;
        let model = LogisticClassifier::from_slice(json).unwrap();
        assert_eq!(model.num_features(), 2);
        assert_eq!(model.kind(), "logistic_regression");
    }

    #[test]
    fn test_rejects_mismatched_scaler() {
        let json = br#"{"coefficients": [0.5, 0.25], "intercept": 0.0,
            "scaler": {"mean": [1.0], "scale": [1.0, 1.0]}}"#;
        assert!(LogisticClassifier::from_slice(json).is_err());
    }

    #[test]
    fn test_rejects_zero_scale() {
        let json = br#"{"coefficients": [0.5], "intercept": 0.0,
            "scaler": {"mean": [1.0], "scale": [0.0]}}"#;
        assert!(LogisticClassifier::from_slice(json).is_err());
    }

    #[test]
    fn test_wrong_width_is_invalid_vector() {
        let model = LogisticClassifier::new(vec![1.0, 1.0], 0.0, None).unwrap();
        let err = model.predict_proba(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictError::InvalidFeatureVector { .. }));
    }
}
