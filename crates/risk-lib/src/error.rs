//! Error taxonomy for artifact loading and prediction

use std::path::PathBuf;

/// Startup errors raised while loading the model artifact and metadata.
/// All of them are fatal: no form can be built without the artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("model artifact at {} is unusable: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("model metadata not found at {}", path.display())]
    MetadataMissing { path: PathBuf },

    #[error("model metadata at {} is malformed: {reason}", path.display())]
    MetadataMalformed { path: PathBuf, reason: String },
}

/// Errors scoped to a single prediction
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("feature vector does not match the model: {reason}")]
    InvalidFeatureVector { reason: String },

    #[error("classifier invocation failed: {reason}")]
    ClassifierFailure { reason: String },
}

impl PredictError {
    pub fn invalid_vector(reason: impl Into<String>) -> Self {
        Self::InvalidFeatureVector {
            reason: reason.into(),
        }
    }

    pub fn classifier(reason: impl Into<String>) -> Self {
        Self::ClassifierFailure {
            reason: reason.into(),
        }
    }
}

/// Errors raised while filling in the input form
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown feature '{feature}' (expected one of: {expected})")]
    UnknownFeature { feature: String, expected: String },

    #[error("value for '{feature}' must be a finite number")]
    NonFiniteValue { feature: String },
}
