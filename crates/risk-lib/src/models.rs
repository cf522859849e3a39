//! Core data models for the risk predictor

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata descriptor shipped next to the classifier artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Ordered feature identifiers; defines the classifier input order
    pub features: Vec<String>,
    /// Decision cutoff in [0, 1]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    /// What the positive class represents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Hex SHA-256 of the artifact file, verified at load when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
}

/// Resolved input field for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub feature: String,
    pub label: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub default: f64,
}

impl FieldSpec {
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Returns true when `value` sits on or beyond either bound
    pub fn is_extreme(&self, value: f64) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => value <= min || value >= max,
            _ => false,
        }
    }
}

/// Values currently entered in the form, keyed by feature identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputVector {
    values: HashMap<String, f64>,
}

impl InputVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(feature.into(), value)
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Binary risk verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Lower,
    High,
}

impl RiskLabel {
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            RiskLabel::High
        } else {
            RiskLabel::Lower
        }
    }

    /// Numeric class as the classifier encodes it
    pub fn as_class(self) -> u8 {
        match self {
            RiskLabel::Lower => 0,
            RiskLabel::High => 1,
        }
    }
}

/// Prediction output for a single interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64,
    pub label: RiskLabel,
    pub message: String,
    pub suggested_action: String,
    pub threshold: f64,
    pub generated_at: i64,
}

impl PredictionResult {
    pub fn class(&self) -> u8 {
        self.label.as_class()
    }
}
