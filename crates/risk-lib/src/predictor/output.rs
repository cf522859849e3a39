//! Prediction output formatting
//!
//! Maps a positive-class probability to a verdict, its message and the
//! suggested action, and formats probabilities for display.

use crate::models::{PredictionResult, RiskLabel};

pub const HIGH_RISK_MESSAGE: &str = "High risk predicted";
pub const HIGH_RISK_ACTION: &str = "consider follow-up screening and lifestyle interventions.";
pub const LOWER_RISK_MESSAGE: &str = "Lower risk predicted";
pub const LOWER_RISK_ACTION: &str = "continue healthy habits and regular monitoring.";

/// Message templates for both verdicts
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub high_risk_message: String,
    pub high_risk_action: String,
    pub lower_risk_message: String,
    pub lower_risk_action: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            high_risk_message: HIGH_RISK_MESSAGE.to_string(),
            high_risk_action: HIGH_RISK_ACTION.to_string(),
            lower_risk_message: LOWER_RISK_MESSAGE.to_string(),
            lower_risk_action: LOWER_RISK_ACTION.to_string(),
        }
    }
}

/// Formats a classifier probability into a PredictionResult
#[derive(Default)]
pub struct OutputFormatter {
    config: OutputConfig,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Apply the threshold verbatim and attach the matching templates
    pub fn format(&self, probability: f64, threshold: f64) -> PredictionResult {
        let label = RiskLabel::from_probability(probability, threshold);
        let (message, action) = match label {
            RiskLabel::High => (&self.config.high_risk_message, &self.config.high_risk_action),
            RiskLabel::Lower => (&self.config.lower_risk_message, &self.config.lower_risk_action),
        };

        PredictionResult {
            probability,
            label,
            message: message.clone(),
            suggested_action: action.clone(),
            threshold,
            generated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Percentage with one decimal, e.g. `72.0%`
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Raw probability with four decimals for the detail view
pub fn format_probability(probability: f64) -> String {
    format!("{:.4}", probability)
}
