mod columns;
mod departure;

pub use columns::{
    CategoricalBlock, NumericBlock, CATEGORICAL_FEATURES, CATEGORICAL_WIDTH, NUMERIC_FEATURES,
    NUMERIC_WIDTH, UNKNOWN_CATEGORY,
};
pub use departure::DepartureTime;

use std::sync::Arc;

use super::capabilities::{CategoricalEncoder, NumericImputer, TransformError};
use super::domain::EnrichedRequest;
use departure::parse_departure;

/// Column names of the assembled vector: numeric block, then encoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(encoded_columns: Vec<String>) -> Self {
        let mut columns: Vec<String> =
            NUMERIC_FEATURES.iter().map(|name| name.to_string()).collect();
        columns.extend(encoded_columns);
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.columns[..NUMERIC_WIDTH]
    }

    pub fn encoded_columns(&self) -> &[String] {
        &self.columns[NUMERIC_WIDTH..]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }
}

/// Model input: values aligned one-to-one with a shared [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(schema: Arc<FeatureSchema>, values: Vec<f64>) -> Result<Self, TransformError> {
        ensure_width(values.len(), schema.len())?;
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|index| self.values[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Same schema, different values. Used to score perturbed copies.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, TransformError> {
        Self::new(Arc::clone(&self.schema), values)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureAssemblyError {
    #[error("departure timestamp '{value}' could not be parsed")]
    UnparseableDeparture { value: String },
    #[error("feature transform failed: {0}")]
    Transform(#[from] TransformError),
}

/// Turns enriched requests into model-ready vectors through the fitted transforms.
pub struct FeatureBuilder {
    imputer: Arc<dyn NumericImputer>,
    encoder: Arc<dyn CategoricalEncoder>,
    schema: Arc<FeatureSchema>,
}

impl FeatureBuilder {
    pub fn new(imputer: Arc<dyn NumericImputer>, encoder: Arc<dyn CategoricalEncoder>) -> Self {
        let schema = Arc::new(FeatureSchema::new(encoder.feature_names()));
        Self {
            imputer,
            encoder,
            schema,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn build(&self, request: &EnrichedRequest) -> Result<FeatureVector, FeatureAssemblyError> {
        let departure = parse_departure(request.departure.as_deref())?;
        let numeric = numeric_block(request, departure.as_ref());
        let categorical = categorical_block(request, departure.as_ref());

        let mut values = self.imputer.transform(&numeric)?;
        ensure_width(values.len(), NUMERIC_WIDTH)?;

        let encoded = self.encoder.transform(&categorical)?;
        ensure_width(encoded.len(), self.schema.encoded_columns().len())?;
        values.extend(encoded);

        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(TransformError::NonFinite {
                column: self.schema.columns()[index].clone(),
            }
            .into());
        }

        Ok(FeatureVector {
            schema: Arc::clone(&self.schema),
            values,
        })
    }
}

fn ensure_width(actual: usize, expected: usize) -> Result<(), TransformError> {
    if actual == expected {
        Ok(())
    } else {
        Err(TransformError::ShapeMismatch { expected, actual })
    }
}

/// Absent distance defaults to `0.0`; an absent departure leaves `decimal_hour`
/// for the imputer.
fn numeric_block(request: &EnrichedRequest, departure: Option<&DepartureTime>) -> NumericBlock {
    NumericBlock {
        values: [
            Some(request.distance_km.filter(|value| value.is_finite()).unwrap_or(0.0)),
            departure.map(|time| time.decimal_hour),
            Some(request.temperature),
            Some(request.wind_speed),
            Some(request.visibility),
        ],
    }
}

fn categorical_block(
    request: &EnrichedRequest,
    departure: Option<&DepartureTime>,
) -> CategoricalBlock {
    // Blank codes count as missing, like a blank departure.
    let category = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(UNKNOWN_CATEGORY)
            .to_string()
    };

    CategoricalBlock {
        values: [
            category(&request.airline),
            category(&request.origin),
            category(&request.destination),
            departure
                .map(|time| time.weekday.to_string())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        ],
    }
}
