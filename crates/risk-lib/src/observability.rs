//! Observability infrastructure for the risk predictor
//!
//! Provides tracing subscriber setup and a structured logger emitting
//! consistent events for startup, predictions and failures.

use crate::form::ExtremeValueWarning;
use crate::models::{ModelMetadata, PredictionResult};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `default_level` when set. Logs go to stderr so they never interleave
/// with command output.
pub fn init_tracing(default_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    // A subscriber may already be installed (tests, embedding)
    let _ = result;
}

/// Structured logger for predictor events
#[derive(Clone)]
pub struct StructuredLogger {
    session: String,
}

impl StructuredLogger {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
        }
    }

    /// Log tool startup once artifacts are available
    pub fn log_startup(&self, version: &str, metadata: &ModelMetadata) {
        info!(
            event = "predictor_started",
            session = %self.session,
            version = %version,
            model_type = %metadata.model_type.as_deref().unwrap_or("(not provided)"),
            features = metadata.features.len(),
            threshold = metadata.threshold,
            "Health risk predictor started"
        );
    }

    /// Log a startup failure that prevents the form from being built
    pub fn log_startup_failure(&self, reason: &str) {
        error!(
            event = "predictor_start_failed",
            session = %self.session,
            reason = %reason,
            "Model artifacts could not be loaded"
        );
    }

    /// Log extreme-value advisories raised for the current input
    pub fn log_extreme_values(&self, warnings: &[ExtremeValueWarning]) {
        for warning in warnings {
            info!(
                event = "extreme_value",
                session = %self.session,
                feature = %warning.feature,
                value = warning.value,
                "Input at or beyond its expected range"
            );
        }
    }

    /// Log a prediction generation event
    pub fn log_prediction(&self, result: &PredictionResult, classifier: &str) {
        info!(
            event = "prediction_generated",
            session = %self.session,
            classifier = %classifier,
            probability = result.probability,
            threshold = result.threshold,
            label = result.class(),
            "Generated risk prediction"
        );
    }

    /// Log a failed prediction; the form stays usable for a retry
    pub fn log_prediction_failure(&self, reason: &str) {
        warn!(
            event = "prediction_failed",
            session = %self.session,
            reason = %reason,
            "Prediction failed"
        );
    }

    pub fn log_shutdown(&self, predictions: usize) {
        info!(
            event = "predictor_shutdown",
            session = %self.session,
            predictions = predictions,
            "Health risk predictor exiting"
        );
    }
}
