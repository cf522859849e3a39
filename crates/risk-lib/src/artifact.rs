//! Model artifact loading
//!
//! The classifier and its metadata descriptor are read from the local
//! filesystem once and then shared read-only for the lifetime of the
//! [`ArtifactStore`]. There is no reload or invalidation.

use crate::error::ArtifactError;
use crate::models::ModelMetadata;
use crate::predictor::{Classifier, LogisticClassifier, OnnxClassifier};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use tracing::{debug, info};

pub const DEFAULT_MODEL_PATH: &str = "risk_model.onnx";
pub const DEFAULT_METADATA_PATH: &str = "model_meta.json";

/// Locations of the classifier artifact and its metadata descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            metadata: metadata.into(),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH, DEFAULT_METADATA_PATH)
    }
}

/// A loaded classifier together with the metadata describing its input
pub struct Artifacts {
    classifier: Box<dyn Classifier>,
    metadata: ModelMetadata,
}

impl Artifacts {
    pub fn new(classifier: Box<dyn Classifier>, metadata: ModelMetadata) -> Self {
        Self {
            classifier,
            metadata,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier", &self.classifier.kind())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Load-once holder for the model artifacts.
///
/// Constructed at process start and passed by reference to whatever builds
/// the form or runs predictions. The first successful [`load`] reads both
/// files; every later call returns the cached pair.
///
/// [`load`]: ArtifactStore::load
pub struct ArtifactStore {
    paths: ArtifactPaths,
    cell: OnceLock<Artifacts>,
    loads: AtomicUsize,
}

impl ArtifactStore {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Store pre-populated with already loaded artifacts
    pub fn preloaded(paths: ArtifactPaths, artifacts: Artifacts) -> Self {
        let store = Self::new(paths);
        let _ = store.cell.set(artifacts);
        store
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Number of times the filesystem was actually read
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn load(&self) -> Result<&Artifacts, ArtifactError> {
        if let Some(artifacts) = self.cell.get() {
            return Ok(artifacts);
        }
        self.loads.fetch_add(1, Ordering::Relaxed);
        let artifacts = load_artifacts(&self.paths)?;
        info!(
            model = %self.paths.model.display(),
            classifier = %artifacts.classifier.kind(),
            features = artifacts.metadata.features.len(),
            threshold = artifacts.metadata.threshold,
            "Model artifacts loaded"
        );
        Ok(self.cell.get_or_init(|| artifacts))
    }
}

/// Read metadata first (its feature count fixes the classifier input
/// width), then the classifier. A missing model is reported before any
/// metadata problem.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts, ArtifactError> {
    if let Err(e) = fs::metadata(&paths.model) {
        if e.kind() == ErrorKind::NotFound {
            return Err(ArtifactError::ArtifactMissing {
                path: paths.model.clone(),
            });
        }
    }
    let metadata = load_metadata(&paths.metadata)?;
    let classifier = load_classifier(&paths.model, &metadata)?;
    Ok(Artifacts::new(classifier, metadata))
}

pub fn load_metadata(path: &Path) -> Result<ModelMetadata, ArtifactError> {
    let malformed = |reason: String| ArtifactError::MetadataMalformed {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::MetadataMissing {
            path: path.to_path_buf(),
        },
        _ => malformed(format!("failed to read: {}", e)),
    })?;

    let metadata: ModelMetadata =
        serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
    validate_metadata(&metadata).map_err(malformed)?;

    debug!(path = %path.display(), features = ?metadata.features, "Metadata loaded");
    Ok(metadata)
}

fn validate_metadata(metadata: &ModelMetadata) -> Result<(), String> {
    if metadata.features.is_empty() {
        return Err("feature list is empty".to_string());
    }
    let mut seen = HashSet::new();
    for feature in &metadata.features {
        if feature.trim().is_empty() {
            return Err("feature identifiers must not be blank".to_string());
        }
        if !seen.insert(feature.as_str()) {
            return Err(format!("duplicate feature '{}'", feature));
        }
    }
    if !metadata.threshold.is_finite() || !(0.0..=1.0).contains(&metadata.threshold) {
        return Err(format!("threshold {} outside [0, 1]", metadata.threshold));
    }
    if let Some(digest) = &metadata.model_sha256 {
        if digest.len() != 64 || hex::decode(digest).is_err() {
            return Err("model_sha256 must be a 64-character hex digest".to_string());
        }
    }
    Ok(())
}

pub fn load_classifier(
    path: &Path,
    metadata: &ModelMetadata,
) -> Result<Box<dyn Classifier>, ArtifactError> {
    let corrupt = |reason: String| ArtifactError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::ArtifactMissing {
            path: path.to_path_buf(),
        },
        _ => corrupt(format!("failed to read: {}", e)),
    })?;

    if let Some(expected) = &metadata.model_sha256 {
        let computed = compute_checksum(&bytes);
        if !computed.eq_ignore_ascii_case(expected) {
            return Err(corrupt(format!(
                "checksum mismatch: expected {}, got {}",
                expected, computed
            )));
        }
        debug!(checksum = %computed, "Model checksum validated");
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let classifier: Box<dyn Classifier> = match extension.as_deref() {
        Some("onnx") => {
            let model = OnnxClassifier::new(&bytes, metadata.features.len())
                .map_err(|e| corrupt(format!("{:#}", e)))?;
            Box::new(model)
        }
        Some("json") => {
            let model = LogisticClassifier::from_slice(&bytes).map_err(corrupt)?;
            if model.num_features() != metadata.features.len() {
                return Err(corrupt(format!(
                    "model has {} coefficients but metadata declares {} features",
                    model.num_features(),
                    metadata.features.len()
                )));
            }
            Box::new(model)
        }
        other => {
            return Err(corrupt(format!(
                "unsupported artifact format {:?}; expected .onnx or .json",
                other.unwrap_or("")
            )))
        }
    };

    debug!(path = %path.display(), size = bytes.len(), kind = classifier.kind(), "Classifier loaded");
    Ok(classifier)
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOGISTIC: &str = r#"{"coefficients": [0.05, 0.02], "intercept": -4.0}"#;

    fn write_fixture(dir: &TempDir, model: Option<&str>, metadata: Option<&str>) -> ArtifactPaths {
        let paths = ArtifactPaths::new(dir.path().join("risk_model.json"), dir.path().join("model_meta.json"));
        if let Some(model) = model {
            fs::write(&paths.model, model).unwrap();
        }
        if let Some(metadata) = metadata {
            fs::write(&paths.metadata, metadata).unwrap();
        }
        paths
    }

    fn meta_json(extra: &str) -> String {
        format!(
            r#"{{"features": ["age", "stab.glu"], "threshold": 0.5{}}}"#,
            extra
        )
    }

    #[test]
    fn test_loads_logistic_artifact() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, Some(LOGISTIC), Some(&meta_json(r#", "model_type": "LogisticRegression""#)));
        let artifacts = load_artifacts(&paths).unwrap();

        assert_eq!(artifacts.metadata().features, vec!["age", "stab.glu"]);
        assert_eq!(artifacts.metadata().model_type.as_deref(), Some("LogisticRegression"));
        assert_eq!(artifacts.metadata().rule, None);
        assert_eq!(artifacts.classifier().kind(), "logistic_regression");
    }

    #[test]
    fn test_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, None, Some(&meta_json("")));
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, Some("not json"), Some(&meta_json("")));
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_coefficient_count_must_match_features() {
        let dir = TempDir::new().unwrap();
        let model = r#"{"coefficients": [0.1, 0.2, 0.3], "intercept": 0.0}"#;
        let paths = write_fixture(&dir, Some(model), Some(&meta_json("")));
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::ArtifactCorrupt { .. }));
        assert!(err.to_string().contains("3 coefficients"), "{}", err);
    }

    #[test]
    fn test_missing_model_reported_before_metadata() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, None, None);
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_unsupported_extension_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let mut paths = write_fixture(&dir, None, Some(&meta_json("")));
        paths.model = dir.path().join("risk_model.pkl");
        fs::write(&paths.model, b"\x80\x04pickle").unwrap();
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::ArtifactCorrupt { .. }));
    }

    #[test]
    fn test_missing_metadata() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, Some(LOGISTIC), None);
        let err = load_artifacts(&paths).unwrap_err();
        assert!(matches!(err, ArtifactError::MetadataMissing { .. }));
    }

    #[test]
    fn test_malformed_metadata() {
        let cases = [
            "{ not json",
            r#"{"threshold": 0.5}"#,
            r#"{"features": ["age"]}"#,
            r#"{"features": [], "threshold": 0.5}"#,
            r#"{"features": ["age", "age"], "threshold": 0.5}"#,
            r#"{"features": ["age"], "threshold": 1.5}"#,
            r#"{"features": ["age"], "threshold": -0.1}"#,
            r#"{"features": ["age"], "threshold": 0.5, "model_sha256": "abc"}"#,
        ];
        for case in cases {
            let dir = TempDir::new().unwrap();
            let paths = write_fixture(&dir, Some(LOGISTIC), Some(case));
            let err = load_artifacts(&paths).unwrap_err();
            assert!(
                matches!(err, ArtifactError::MetadataMalformed { .. }),
                "expected malformed for {}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_checksum_verified() {
        let dir = TempDir::new().unwrap();
        let digest = compute_checksum(LOGISTIC.as_bytes());
        let paths = write_fixture(
            &dir,
            Some(LOGISTIC),
            Some(&meta_json(&format!(r#", "model_sha256": "{}""#, digest.to_uppercase()))),
        );
        assert!(load_artifacts(&paths).is_ok());
    }

    #[test]
    fn test_checksum_mismatch_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let digest = compute_checksum(b"some other model");
        let paths = write_fixture(
            &dir,
            Some(LOGISTIC),
            Some(&meta_json(&format!(r#", "model_sha256": "{}""#, digest))),
        );
        let err = load_artifacts(&paths).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn test_store_reads_filesystem_once() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, Some(LOGISTIC), Some(&meta_json("")));
        let store = ArtifactStore::new(paths.clone());
        assert!(!store.is_loaded());

        let first = store.load().unwrap() as *const Artifacts;
        fs::remove_file(&paths.model).unwrap();
        fs::remove_file(&paths.metadata).unwrap();
        let second = store.load().unwrap() as *const Artifacts;

        assert_eq!(first, second);
        assert_eq!(store.load_count(), 1);
        assert!(store.is_loaded());
    }

    #[test]
    fn test_store_failure_leaves_store_unloaded() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(&dir, None, Some(&meta_json("")));
        let store = ArtifactStore::new(paths);
        assert!(matches!(store.load(), Err(ArtifactError::ArtifactMissing { .. })));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_checksum_computation() {
        let checksum = compute_checksum(b"hello world");
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
