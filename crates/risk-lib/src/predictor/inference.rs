//! ONNX inference using tract
//!
//! Runs binary classifiers exported to ONNX (for example with skl2onnx
//! and `zipmap` disabled). The input is a single `f32[1, n]` tensor; the
//! probability is read from the first f32 output shaped `[.., 2]`, or from
//! a single-valued f32 output when the model emits the positive class only.

use super::Classifier;
use crate::error::PredictError;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

/// Index of the positive class in a two-column probability output
const POSITIVE_CLASS: usize = 1;

type TractModel = TypedRunnableModel<TypedModel>;

/// ONNX-based classifier using tract for lightweight inference
pub struct OnnxClassifier {
    model: TractModel,
    num_features: usize,
    inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl OnnxClassifier {
    /// Create a classifier from model bytes with a fixed input width
    pub fn new(model_bytes: &[u8], num_features: usize) -> Result<Self> {
        let model = Self::load_model(model_bytes, num_features)?;
        Ok(Self {
            model,
            num_features,
            inference_count: AtomicU64::new(0),
            slow_inference_count: AtomicU64::new(0),
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], num_features: usize) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn features_to_tensor(&self, features: &[f64]) -> Result<Tensor, PredictError> {
        if features.len() != self.num_features {
            return Err(PredictError::invalid_vector(format!(
                "model expects {} features, got {}",
                self.num_features,
                features.len()
            )));
        }
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
            .map_err(|e| PredictError::invalid_vector(e.to_string()))?;
        Ok(array.into())
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}

fn positive_probability(outputs: &[TValue]) -> Result<f64, PredictError> {
    for output in outputs {
        if output.datum_type() != f32::datum_type() {
            continue;
        }
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::classifier(e.to_string()))?;
        let values: Vec<f32> = view.iter().copied().collect();
        match view.shape().last() {
            Some(2) => {
                return values
                    .get(POSITIVE_CLASS)
                    .map(|&p| p as f64)
                    .ok_or_else(|| PredictError::classifier("probability output is empty"))
            }
            _ if values.len() == 1 => return Ok(values[0] as f64),
            _ => continue,
        }
    }
    Err(PredictError::classifier("model produced no probability output"))
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, PredictError> {
        let start = Instant::now();
        let input = self.features_to_tensor(features)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictError::classifier(format!("{:#}", e)))?;

        let elapsed = start.elapsed();
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        positive_probability(&result)
    }

    fn kind(&self) -> &str {
        "onnx"
    }

    fn stats(&self) -> Option<InferenceStats> {
        Some(OnnxClassifier::stats(self))
    }
}

/// Inference statistics
#[derive(Debug, Clone)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(data: Vec<f32>, shape: (usize, usize)) -> TValue {
        let tensor: Tensor = tract_ndarray::Array2::from_shape_vec(shape, data)
            .unwrap()
            .into();
        tensor.into()
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        assert!(OnnxClassifier::new(b"definitely not onnx", 2).is_err());
    }

    #[test]
    fn test_two_column_output_takes_positive_class() {
        let outputs = vec![value(vec![0.28, 0.72], (1, 2))];
        let p = positive_probability(&outputs).unwrap();
        assert!((p - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_skips_non_float_outputs() {
        let label: Tensor = tract_ndarray::Array1::from_vec(vec![1i64]).into();
        let outputs = vec![label.into(), value(vec![0.9, 0.1], (1, 2))];
        let p = positive_probability(&outputs).unwrap();
        assert!((p - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_single_value_output() {
        let outputs = vec![value(vec![0.35], (1, 1))];
        let p = positive_probability(&outputs).unwrap();
        assert!((p - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_empty_two_column_output_is_failure() {
        let outputs = vec![value(vec![], (0, 2))];
        let err = positive_probability(&outputs).unwrap_err();
        assert!(matches!(err, PredictError::ClassifierFailure { .. }));
    }

    #[test]
    fn test_no_probability_output() {
        let label: Tensor = tract_ndarray::Array1::from_vec(vec![0i64]).into();
        assert!(positive_probability(&[label.into()]).is_err());
    }
}
