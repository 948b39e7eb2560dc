use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ensure_columns, ArtifactError};
use crate::inference::features::{CategoricalBlock, CATEGORICAL_FEATURES, CATEGORICAL_WIDTH};
use crate::inference::{CategoricalEncoder, TransformError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Unseen categories encode to an all-zero indicator block.
    #[default]
    Ignore,
    Error,
}

/// One-hot encoder with the categories learned at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub features: Vec<String>,
    /// Known categories per feature, in output order.
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        ensure_columns("encoder", &self.features, &CATEGORICAL_FEATURES)?;

        if self.categories.len() != CATEGORICAL_WIDTH {
            return Err(ArtifactError::invalid(
                "encoder",
                format!(
                    "{} category lists for {} features",
                    self.categories.len(),
                    CATEGORICAL_WIDTH
                ),
            ));
        }

        for (feature, categories) in self.features.iter().zip(&self.categories) {
            let mut seen = HashSet::new();
            if let Some(duplicate) = categories.iter().find(|category| !seen.insert(*category)) {
                return Err(ArtifactError::invalid(
                    "encoder",
                    format!("category '{duplicate}' listed twice for '{feature}'"),
                ));
            }
        }

        Ok(())
    }
}

impl CategoricalEncoder for OneHotEncoder {
    fn feature_names(&self) -> Vec<String> {
        self.features
            .iter()
            .zip(&self.categories)
            .flat_map(|(feature, categories)| {
                categories
                    .iter()
                    .map(move |category| format!("{feature}_{category}"))
            })
            .collect()
    }

    fn transform(&self, block: &CategoricalBlock) -> Result<Vec<f64>, TransformError> {
        let width = self.categories.iter().map(Vec::len).sum();
        let mut encoded = Vec::with_capacity(width);

        for ((feature, categories), value) in self
            .features
            .iter()
            .zip(&self.categories)
            .zip(&block.values)
        {
            let hit = categories.iter().position(|category| category == value);
            if hit.is_none() && self.handle_unknown == HandleUnknown::Error {
                return Err(TransformError::UnknownCategory {
                    feature: feature.clone(),
                    category: value.clone(),
                });
            }

            encoded.extend((0..categories.len()).map(|index| {
                if Some(index) == hit {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        Ok(encoded)
    }
}
