//! Artifact adapter: loads the fitted scaler, classifier and label encoder
//! from a directory of JSON exports.
//!
//! Files are read once at startup. When a `manifest.json` is present every
//! file it lists is checked against its SHA-256 digest before anything is
//! parsed; `require_manifest` turns a missing manifest into an error.

mod classifier;
mod encoder;
mod scaler;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ports::{Classifier, FeatureScaler, LabelDecoder};

pub use classifier::{ClassifierArtifact, DecisionTree, ForestModel, LinearModel, TreeNode};
pub use encoder::LabelEncoder;
pub use scaler::ScalerArtifact;

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const ENCODER_FILE: &str = "label_encoder.json";
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {file}: {reason}")]
    Malformed { file: String, reason: String },

    #[error("digest mismatch for {0}")]
    DigestMismatch(String),

    #[error("{MANIFEST_FILE} is required but missing from {0}")]
    ManifestRequired(PathBuf),

    /// The artifacts parse individually but disagree with each other.
    #[error("artifacts disagree: {0}")]
    Inconsistent(String),
}

fn malformed(file: &str, reason: impl Into<String>) -> ArtifactError {
    ArtifactError::Malformed {
        file: file.to_string(),
        reason: reason.into(),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// SHA-256 digests of the artifact files, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the three artifact files in `dir`.
    ///
    /// # Errors
    /// Returns error if any artifact file cannot be read.
    pub fn for_dir(dir: &Path) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in [SCALER_FILE, MODEL_FILE, ENCODER_FILE] {
            let bytes = read_file(&dir.join(name))?;
            files.insert(name.to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    /// Write the manifest as pretty JSON into `dir`.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(self).map_err(|e| malformed(MANIFEST_FILE, e.to_string()))?;
        fs::write(&path, json).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Read `manifest.json` from `dir`, `None` if absent.
    ///
    /// # Errors
    /// Returns error if the manifest exists but cannot be read or parsed.
    pub fn read(dir: &Path) -> Result<Option<Self>, ArtifactError> {
        let bytes = match read_file(&dir.join(MANIFEST_FILE)) {
            Ok(bytes) => bytes,
            Err(ArtifactError::Missing(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let manifest: Self =
            serde_json::from_slice(&bytes).map_err(|e| malformed(MANIFEST_FILE, e.to_string()))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(malformed(
                MANIFEST_FILE,
                format!("unsupported version {}", manifest.version),
            ));
        }
        Ok(Some(manifest))
    }

    /// Check every listed file against its digest.
    ///
    /// The manifest must cover all three artifact files and may only name
    /// plain file names inside `dir`.
    ///
    /// # Errors
    /// Returns `DigestMismatch` on the first file whose contents changed.
    pub fn verify(&self, dir: &Path) -> Result<(), ArtifactError> {
        for required in [SCALER_FILE, MODEL_FILE, ENCODER_FILE] {
            if !self.files.contains_key(required) {
                return Err(malformed(MANIFEST_FILE, format!("does not list {required}")));
            }
        }

        for (name, expected) in &self.files {
            if name.contains(['/', '\\']) || name == ".." {
                return Err(malformed(MANIFEST_FILE, format!("invalid file name '{name}'")));
            }
            let actual = sha256_hex(&read_file(&dir.join(name))?);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ArtifactError::DigestMismatch(name.clone()));
            }
        }
        Ok(())
    }
}

fn parse<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let bytes = read_file(&dir.join(file))?;
    serde_json::from_slice(&bytes).map_err(|e| malformed(file, e.to_string()))
}

/// The three fitted artifacts, validated against each other.
///
/// Cloning is cheap; every artifact sits behind an `Arc` and is read-only.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub scaler: Arc<ScalerArtifact>,
    pub classifier: Arc<ClassifierArtifact>,
    pub encoder: Arc<LabelEncoder>,
    /// Whether a manifest was present and every digest matched.
    pub verified: bool,
}

impl ArtifactBundle {
    /// Load and cross-check the artifacts in `dir`.
    ///
    /// # Errors
    /// Returns `Missing`/`Io`/`Malformed` for unreadable files, `DigestMismatch`
    /// or `ManifestRequired` for integrity failures, and `Inconsistent` when
    /// the files do not describe the same model.
    pub fn load(dir: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        let verified = match ArtifactManifest::read(dir)? {
            Some(manifest) => {
                manifest.verify(dir)?;
                tracing::info!("Artifact digests verified ({} files)", manifest.files.len());
                true
            }
            None if require_manifest => {
                return Err(ArtifactError::ManifestRequired(dir.to_path_buf()));
            }
            None => {
                tracing::warn!("No {} in {:?}; loading unverified artifacts", MANIFEST_FILE, dir);
                false
            }
        };

        let scaler: ScalerArtifact = parse(dir, SCALER_FILE)?;
        let classifier: ClassifierArtifact = parse(dir, MODEL_FILE)?;
        let encoder: LabelEncoder = parse(dir, ENCODER_FILE)?;

        let mut bundle = Self::from_parts(scaler, classifier, encoder)?;
        bundle.verified = verified;
        tracing::info!(
            "Loaded artifacts from {:?} (scaler={}, model={}, n_features={}, n_classes={})",
            dir,
            bundle.scaler.kind(),
            bundle.classifier.kind(),
            bundle.scaler.n_features(),
            bundle.classifier.n_classes()
        );
        Ok(bundle)
    }

    /// Validate and assemble a bundle from already-parsed artifacts.
    ///
    /// # Errors
    /// Returns `Malformed` naming the first artifact that fails its own
    /// checks, and `Inconsistent` if widths or class counts disagree.
    pub fn from_parts(
        scaler: ScalerArtifact,
        classifier: ClassifierArtifact,
        encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        scaler.validate().map_err(|r| malformed(SCALER_FILE, r))?;
        classifier.validate().map_err(|r| malformed(MODEL_FILE, r))?;
        encoder.validate().map_err(|r| malformed(ENCODER_FILE, r))?;

        if classifier.n_features() != scaler.n_features() {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler has {} columns, model expects {}",
                scaler.n_features(),
                classifier.n_features()
            )));
        }
        if encoder.classes().len() != classifier.n_classes() {
            return Err(ArtifactError::Inconsistent(format!(
                "encoder has {} classes, model predicts {}",
                encoder.classes().len(),
                classifier.n_classes()
            )));
        }

        Ok(Self {
            scaler: Arc::new(scaler),
            classifier: Arc::new(classifier),
            encoder: Arc::new(encoder),
            verified: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALER: &str = r#"{"kind":"standard","feature_names":["Age","Weight"],"mean":[20.0,80.0],"scale":[5.0,10.0]}"#;
    const MODEL: &str = r#"{"kind":"linear","coefficients":[[0.0,-1.0],[0.0,1.0]],"intercepts":[0.0,0.0]}"#;
    const ENCODER: &str = r#"{"classes":["Normal_Weight","Obesity_Type_I"]}"#;

    fn write_dir(scaler: &str, model: &str, encoder: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SCALER_FILE), scaler).unwrap();
        fs::write(dir.path().join(MODEL_FILE), model).unwrap();
        fs::write(dir.path().join(ENCODER_FILE), encoder).unwrap();
        dir
    }

    #[test]
    fn test_load_without_manifest() {
        let dir = write_dir(SCALER, MODEL, ENCODER);
        let bundle = ArtifactBundle::load(dir.path(), false).unwrap();
        assert_eq!(bundle.scaler.n_features(), 2);
        assert_eq!(bundle.encoder.classes().len(), 2);
        assert!(!bundle.verified);
    }

    #[test]
    fn test_manifest_required() {
        let dir = write_dir(SCALER, MODEL, ENCODER);
        assert!(matches!(
            ArtifactBundle::load(dir.path(), true),
            Err(ArtifactError::ManifestRequired(_))
        ));
    }

    #[test]
    fn test_manifest_round_trip_and_tamper() {
        let dir = write_dir(SCALER, MODEL, ENCODER);
        ArtifactManifest::for_dir(dir.path())
            .unwrap()
            .write(dir.path())
            .unwrap();
        assert!(ArtifactBundle::load(dir.path(), true).is_ok());

        fs::write(dir.path().join(ENCODER_FILE), r#"{"classes":["Obesity_Type_I","Normal_Weight"]}"#).unwrap();
        assert!(matches!(
            ArtifactBundle::load(dir.path(), true),
            Err(ArtifactError::DigestMismatch(name)) if name == ENCODER_FILE
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = write_dir(SCALER, MODEL, ENCODER);
        fs::remove_file(dir.path().join(MODEL_FILE)).unwrap();
        assert!(matches!(
            ArtifactBundle::load(dir.path(), false),
            Err(ArtifactError::Missing(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = write_dir(SCALER, "{not json", ENCODER);
        assert!(matches!(
            ArtifactBundle::load(dir.path(), false),
            Err(ArtifactError::Malformed { file, .. }) if file == MODEL_FILE
        ));
    }

    #[test]
    fn test_unknown_label_is_malformed() {
        let dir = write_dir(SCALER, MODEL, r#"{"classes":["Normal_Weight","Chubby"]}"#);
        assert!(matches!(
            ArtifactBundle::load(dir.path(), false),
            Err(ArtifactError::Malformed { file, .. }) if file == ENCODER_FILE
        ));
    }

    #[test]
    fn test_cross_artifact_disagreement() {
        let three = r#"{"classes":["Normal_Weight","Obesity_Type_I","Obesity_Type_II"]}"#;
        let dir = write_dir(SCALER, MODEL, three);
        assert!(matches!(
            ArtifactBundle::load(dir.path(), false),
            Err(ArtifactError::Inconsistent(_))
        ));

        let wide = r#"{"kind":"linear","coefficients":[[0.0,0.0,1.0],[0.0,0.0,-1.0]],"intercepts":[0.0,0.0]}"#;
        let dir = write_dir(SCALER, wide, ENCODER);
        assert!(matches!(
            ArtifactBundle::load(dir.path(), false),
            Err(ArtifactError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_from_parts_validates_each_artifact() {
        let encoder: LabelEncoder = serde_json::from_str(ENCODER).unwrap();
        let model: ClassifierArtifact = serde_json::from_str(MODEL).unwrap();

        let short_mean = ScalerArtifact::Standard {
            feature_names: vec!["Age".into(), "Weight".into()],
            mean: vec![20.0],
            scale: vec![5.0, 10.0],
        };
        assert!(matches!(
            ArtifactBundle::from_parts(short_mean, model, encoder.clone()),
            Err(ArtifactError::Malformed { file, .. }) if file == SCALER_FILE
        ));

        let scaler: ScalerArtifact = serde_json::from_str(SCALER).unwrap();
        let bad_forest = ClassifierArtifact::Forest(ForestModel {
            n_features: 2,
            n_classes: 2,
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode {
                        feature: Some(7),
                        threshold: 0.0,
                        left: Some(1),
                        right: Some(2),
                        value: vec![],
                    },
                    TreeNode {
                        feature: None,
                        threshold: 0.0,
                        left: None,
                        right: None,
                        value: vec![1.0, 0.0],
                    },
                    TreeNode {
                        feature: None,
                        threshold: 0.0,
                        left: None,
                        right: None,
                        value: vec![0.0, 1.0],
                    },
                ],
            }],
        });
        assert!(matches!(
            ArtifactBundle::from_parts(scaler, bad_forest, encoder),
            Err(ArtifactError::Malformed { file, .. }) if file == MODEL_FILE
        ));
    }

    #[test]
    fn test_bundled_models_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let bundle = ArtifactBundle::load(&dir, true).unwrap();
        assert_eq!(bundle.encoder.classes().len(), 7);
        assert_eq!(bundle.scaler.n_features(), 11);
        assert!(bundle.verified);
    }
}
