//! Feature vector assembly for classifier input
//!
//! The classifier is order-sensitive: a vector built in the wrong order
//! produces silently wrong predictions, so assembly walks the metadata's
//! feature list and refuses any mismatch in the key set.

use crate::error::PredictError;
use crate::models::InputVector;

/// Builds ordered feature vectors from form input
pub struct FeatureAssembler<'a> {
    features: &'a [String],
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(features: &'a [String]) -> Self {
        Self { features }
    }

    pub fn assemble(&self, input: &InputVector) -> Result<Vec<f64>, PredictError> {
        let mut vector = Vec::with_capacity(self.features.len());
        for feature in self.features {
            let value = input
                .get(feature)
                .ok_or_else(|| PredictError::invalid_vector(format!("missing feature '{}'", feature)))?;
            vector.push(value);
        }

        if input.len() != self.features.len() {
            let mut extra: Vec<&str> = input
                .keys()
                .filter(|k| !self.features.iter().any(|f| f == k))
                .collect();
            extra.sort_unstable();
            return Err(PredictError::invalid_vector(format!(
                "unexpected features: {}",
                extra.join(", ")
            )));
        }

        Ok(vector)
    }
}
