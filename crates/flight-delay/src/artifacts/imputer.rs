use serde::{Deserialize, Serialize};

use super::{ensure_columns, ArtifactError};
use crate::inference::features::{NumericBlock, NUMERIC_FEATURES, NUMERIC_WIDTH};
use crate::inference::{NumericImputer, TransformError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Mean,
    Median,
    MostFrequent,
    Constant,
}

/// Column-wise imputer with statistics fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputer {
    pub features: Vec<String>,
    pub strategy: ImputeStrategy,
    pub statistics: Vec<f64>,
}

impl SimpleImputer {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        ensure_columns("imputer", &self.features, &NUMERIC_FEATURES)?;

        if self.statistics.len() != NUMERIC_WIDTH {
            return Err(ArtifactError::invalid(
                "imputer",
                format!(
                    "{} statistics for {} features",
                    self.statistics.len(),
                    NUMERIC_WIDTH
                ),
            ));
        }

        if let Some(index) = self.statistics.iter().position(|value| !value.is_finite()) {
            return Err(ArtifactError::invalid(
                "imputer",
                format!("statistic for '{}' is not finite", self.features[index]),
            ));
        }

        Ok(())
    }
}

impl NumericImputer for SimpleImputer {
    fn transform(&self, block: &NumericBlock) -> Result<Vec<f64>, TransformError> {
        if self.statistics.len() != block.values.len() {
            return Err(TransformError::ShapeMismatch {
                expected: block.values.len(),
                actual: self.statistics.len(),
            });
        }

        Ok(block
            .values
            .iter()
            .zip(&self.statistics)
            .map(|(value, statistic)| match value {
                Some(value) if value.is_finite() => *value,
                _ => *statistic,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imputer() -> SimpleImputer {
        SimpleImputer {
            features: NUMERIC_FEATURES.iter().map(|name| name.to_string()).collect(),
            strategy: ImputeStrategy::Median,
            statistics: vec![812.0, 13.5, 22.0, 9.0, 9500.0],
        }
    }

    #[test]
    fn fills_only_missing_values() {
        let block = NumericBlock {
            values: [Some(350.0), None, Some(0.0), Some(5.0), Some(f64::NAN)],
        };

        let values = imputer().transform(&block).expect("imputes");
        assert_eq!(values, vec![350.0, 13.5, 0.0, 5.0, 9500.0]);
    }

    #[test]
    fn validation_rejects_reordered_features() {
        let mut imputer = imputer();
        imputer.features.swap(0, 1);
        assert!(matches!(
            imputer.validate(),
            Err(ArtifactError::Invalid { artifact: "imputer", .. })
        ));
    }

    #[test]
    fn validation_rejects_short_statistics() {
        let mut imputer = imputer();
        imputer.statistics.pop();
        assert!(imputer.validate().is_err());
    }

    #[test]
    fn parses_fitted_artifact() {
        let json = r#"{
            "features": ["distance_km", "decimal_hour", "temperature", "wind_speed", "visibility"],
            "strategy": "most_frequent",
            "statistics": [500.0, 12.0, 20.0, 5.0, 10000.0]
        }"#;
        let imputer: SimpleImputer = serde_json::from_str(json).expect("artifact parses");
        assert_eq!(imputer.strategy, ImputeStrategy::MostFrequent);
        assert!(imputer.validate().is_ok());
    }
}
