//! CLI command implementations

pub mod fields;
pub mod info;
pub mod interactive;
pub mod predict;

use crate::output::OutputFormat;
use risk_lib::{
    Artifacts, ExtremeValueWarning, FeatureCatalog, FormModel, FormState, PredictError,
    PredictionOrchestrator, PredictionResult, StructuredLogger,
};
use serde::Serialize;

/// Everything a command needs once the artifacts are loaded
pub struct Session<'a> {
    pub artifacts: &'a Artifacts,
    pub form: FormModel,
    pub orchestrator: PredictionOrchestrator,
    pub logger: StructuredLogger,
    pub format: OutputFormat,
}

/// Outcome of one predict action
#[derive(Debug, Serialize)]
pub struct PredictionReport {
    pub warnings: Vec<ExtremeValueWarning>,
    pub prediction: PredictionResult,
}

impl<'a> Session<'a> {
    pub fn new(artifacts: &'a Artifacts, logger: StructuredLogger, format: OutputFormat) -> Self {
        let form = FormModel::build(&artifacts.metadata().features, &FeatureCatalog::builtin());
        Self {
            artifacts,
            form,
            orchestrator: PredictionOrchestrator::new(),
            logger,
            format,
        }
    }

    /// Advisories for the current values; never blocks a prediction
    pub fn check(&self, state: &FormState) -> Vec<ExtremeValueWarning> {
        let warnings = self.form.check_extremes(state);
        self.logger.log_extreme_values(&warnings);
        warnings
    }

    /// Run one prediction over the current form values
    pub fn predict(&self, state: &FormState) -> Result<PredictionResult, PredictError> {
        let input = state.input_vector();
        match self.orchestrator.predict(&input, self.artifacts) {
            Ok(result) => {
                self.logger
                    .log_prediction(&result, self.artifacts.classifier().kind());
                Ok(result)
            }
            Err(e) => {
                self.logger.log_prediction_failure(&e.to_string());
                Err(e)
            }
        }
    }
}
