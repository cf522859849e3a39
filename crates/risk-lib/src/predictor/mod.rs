//! Risk prediction engine

mod features;
mod inference;
mod logistic;
mod output;

pub use features::FeatureAssembler;
pub use inference::{InferenceStats, OnnxClassifier};
pub use logistic::{LogisticClassifier, StandardScaler};
pub use output::{
    format_percent, format_probability, OutputConfig, OutputFormatter, HIGH_RISK_ACTION,
    HIGH_RISK_MESSAGE, LOWER_RISK_ACTION, LOWER_RISK_MESSAGE,
};

use crate::artifact::Artifacts;
use crate::error::PredictError;
use crate::models::{InputVector, PredictionResult};
use tracing::debug;

/// Trait for binary classifier implementations
pub trait Classifier: Send + Sync {
    /// Probability of the positive ("risk present") class for one feature
    /// vector, ordered as the model's metadata declares.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, PredictError>;

    /// Short description of the backing model format
    fn kind(&self) -> &str;

    /// Inference counters, for classifiers that keep them
    fn stats(&self) -> Option<InferenceStats> {
        None
    }
}

/// Turns the current form values into a prediction using the cached artifacts
#[derive(Default)]
pub struct PredictionOrchestrator {
    formatter: OutputFormatter,
}

impl PredictionOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatter(formatter: OutputFormatter) -> Self {
        Self { formatter }
    }

    pub fn predict(
        &self,
        input: &InputVector,
        artifacts: &Artifacts,
    ) -> Result<PredictionResult, PredictError> {
        let metadata = artifacts.metadata();
        let vector = FeatureAssembler::new(&metadata.features).assemble(input)?;

        let probability = artifacts.classifier().predict_proba(&vector)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictError::classifier(format!(
                "probability {} outside [0, 1]",
                probability
            )));
        }

        let result = self.formatter.format(probability, metadata.threshold);
        debug!(
            probability = probability,
            threshold = metadata.threshold,
            label = result.label.as_class(),
            "Prediction computed"
        );

        Ok(result)
    }
}

/// Convenience wrapper using the default message templates
pub fn predict(input: &InputVector, artifacts: &Artifacts) -> Result<PredictionResult, PredictError> {
    PredictionOrchestrator::new().predict(input, artifacts)
}
