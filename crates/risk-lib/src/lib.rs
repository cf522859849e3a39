//! Core library for the health risk predictor
//!
//! This crate provides:
//! - Load-once access to the classifier artifact and its metadata
//! - The input form model (labels, ranges, defaults, advisories)
//! - Prediction orchestration over ONNX and logistic-regression models
//! - Structured logging

pub mod artifact;
pub mod error;
pub mod form;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifact::{ArtifactPaths, ArtifactStore, Artifacts};
pub use error::{ArtifactError, FormError, PredictError};
pub use form::{ExtremeValueWarning, FeatureCatalog, FormModel, FormState};
pub use models::*;
pub use observability::{init_tracing, LogFormat, StructuredLogger};
pub use predictor::{predict, Classifier, PredictionOrchestrator};
