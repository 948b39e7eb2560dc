//! File-backed implementations of the inference capabilities.
//!
//! Each artifact is a JSON document holding the fitted parameters of one
//! transform or model. [`ArtifactBundle`] loads a whole directory at startup
//! and turns it into an [`InferenceContext`](crate::inference::InferenceContext).

mod bundle;
mod encoder;
mod imputer;
mod lime;
mod logistic;

pub use bundle::{
    ArtifactBundle, ENCODER_FILE, EXPLAINER_FILE, IMPUTER_FILE, MODEL_FILE,
};
pub use encoder::{HandleUnknown, OneHotEncoder};
pub use imputer::{ImputeStrategy, SimpleImputer};
pub use lime::{LimeExplainer, LimeSettings};
pub use logistic::LogisticRegression;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::inference::SchemaMismatch;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{artifact} artifact is inconsistent: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn ensure_columns(
    artifact: &'static str,
    declared: &[String],
    expected: &[&str],
) -> Result<(), ArtifactError> {
    if declared.iter().map(String::as_str).eq(expected.iter().copied()) {
        Ok(())
    } else {
        Err(ArtifactError::invalid(
            artifact,
            format!("features {:?} must be exactly {:?}", declared, expected),
        ))
    }
}
