//! Narrow interfaces over the trained artifacts.
//!
//! The pipeline only ever talks to these traits, so it can be exercised with
//! stub implementations that carry no trained weights.

use serde::{Deserialize, Serialize};

use super::features::{CategoricalBlock, FeatureVector, NumericBlock};

/// Fitted numeric imputer: replaces missing values with learned statistics.
pub trait NumericImputer: Send + Sync {
    /// Returns one finite value per numeric column, in column order.
    fn transform(&self, block: &NumericBlock) -> Result<Vec<f64>, TransformError>;
}

/// Fitted one-hot encoder over the categorical block.
pub trait CategoricalEncoder: Send + Sync {
    /// Output column names in the exact order produced by `transform`.
    fn feature_names(&self) -> Vec<String>;

    fn transform(&self, block: &CategoricalBlock) -> Result<Vec<f64>, TransformError>;
}

/// Pre-trained binary classifier.
pub trait ScoringModel: Send + Sync {
    /// Returns `[p(not delayed), p(delayed)]`.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], TransformError>;

    /// Column names the model was trained on, when the artifact records them.
    fn expected_features(&self) -> Option<&[String]> {
        None
    }

    fn name(&self) -> &str;
}

/// Local explanation backend.
pub trait Explainer: Send + Sync {
    /// Contributions for every column, ranked by decreasing influence.
    fn explain(&self, features: &FeatureVector) -> Result<Vec<FeatureContribution>, ExplainError>;

    fn expected_features(&self) -> Option<&[String]> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("column '{column}' is not finite after transformation")]
    NonFinite { column: String },
    #[error("unknown category '{category}' for feature '{feature}'")]
    UnknownCategory { feature: String, category: String },
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    #[error("explanation requested but no explainer is configured")]
    Unavailable,
    #[error("explainer could not score a perturbed sample: {0}")]
    Scoring(#[from] TransformError),
    #[error("local surrogate could not be fitted: {0}")]
    Surrogate(String),
    #[error("explainer worker panicked")]
    Panicked,
}

/// A capability disagrees with the feature builder about column identity or order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{component} expects {} columns but the feature builder produces {}{}",
    .expected.len(),
    .actual.len(),
    first_difference(.expected, .actual)
)]
pub struct SchemaMismatch {
    pub component: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

impl SchemaMismatch {
    /// Compares `expected` against the builder's `actual` columns.
    pub fn check(component: &str, expected: &[String], actual: &[String]) -> Result<(), Self> {
        if expected == actual {
            return Ok(());
        }

        Err(Self {
            component: component.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}

fn first_difference(expected: &[String], actual: &[String]) -> String {
    expected
        .iter()
        .zip(actual)
        .enumerate()
        .find(|(_, (left, right))| left != right)
        .map(|(index, (left, right))| {
            format!(" (column {index}: expected '{left}', found '{right}')")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn schema_check_accepts_identical_columns() {
        let columns = names(&["distance_km", "airline_AZ"]);
        assert!(SchemaMismatch::check("model", &columns, &columns).is_ok());
    }

    #[test]
    fn schema_check_reports_reordered_columns() {
        let expected = names(&["distance_km", "decimal_hour"]);
        let actual = names(&["decimal_hour", "distance_km"]);

        let err = SchemaMismatch::check("model", &expected, &actual).expect_err("order differs");
        assert_eq!(
            err.to_string(),
            "model expects 2 columns but the feature builder produces 2 \
             (column 0: expected 'distance_km', found 'decimal_hour')"
        );
    }
}
