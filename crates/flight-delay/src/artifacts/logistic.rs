use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::inference::{FeatureVector, ScoringModel, TransformError};

/// Binary logistic regression over the assembled feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "{} coefficients for {} features",
                    self.coefficients.len(),
                    self.feature_names.len()
                ),
            ));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::invalid("model", "parameters must be finite"));
        }

        Ok(())
    }

    fn decision_function(&self, values: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(values)
                .map(|(coefficient, value)| coefficient * value)
                .sum::<f64>()
    }
}

impl ScoringModel for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], TransformError> {
        if features.len() != self.coefficients.len() {
            return Err(TransformError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let delayed = sigmoid(self.decision_function(features.values()));
        Ok([1.0 - delayed, delayed])
    }

    fn expected_features(&self) -> Option<&[String]> {
        Some(&self.feature_names)
    }

    fn name(&self) -> &str {
        "LogisticRegression"
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_coefficient_count_mismatch() {
        let model = LogisticRegression {
            feature_names: vec!["distance_km".to_string(), "decimal_hour".to_string()],
            coefficients: vec![0.1],
            intercept: 0.0,
        };
        assert!(model.validate().is_err());
    }
}
