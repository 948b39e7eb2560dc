use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::artifacts::{HandleUnknown, ImputeStrategy, OneHotEncoder, SimpleImputer};
use crate::inference::features::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use crate::inference::{
    DecisionPolicy, ExplainError, Explainer, FeatureBuilder, FeatureContribution, FeatureVector,
    InferenceContext, PredictionRequest, ScoringModel, TransformError,
};

pub(super) const IMPUTED_DECIMAL_HOUR: f64 = 13.25;

pub(super) fn imputer() -> SimpleImputer {
    SimpleImputer {
        features: NUMERIC_FEATURES.iter().map(|name| name.to_string()).collect(),
        strategy: ImputeStrategy::Mean,
        statistics: vec![790.0, IMPUTED_DECIMAL_HOUR, 21.5, 11.0, 9_400.0],
    }
}

pub(super) fn encoder() -> OneHotEncoder {
    let categories = |values: &[&str]| -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    };
    OneHotEncoder {
        features: CATEGORICAL_FEATURES.iter().map(|name| name.to_string()).collect(),
        categories: vec![
            categories(&["AD", "AZ", "G3", "LA"]),
            categories(&["BSB", "GIG", "GRU"]),
            categories(&["GIG", "GRU", "SSA"]),
            categories(&["0", "1", "2", "3", "4", "5", "6"]),
        ],
        handle_unknown: HandleUnknown::Ignore,
    }
}

pub(super) fn builder() -> FeatureBuilder {
    FeatureBuilder::new(Arc::new(imputer()), Arc::new(encoder()))
}

pub(super) fn scenario_request() -> PredictionRequest {
    PredictionRequest {
        airline: Some("AZ".to_string()),
        origin: Some("GIG".to_string()),
        destination: Some("GRU".to_string()),
        departure: Some("2025-11-10T14:30:00".to_string()),
        distance_km: Some(350.0),
        temperature: None,
        wind_speed: None,
        visibility: None,
    }
}

pub(super) fn observed_weather_request() -> PredictionRequest {
    PredictionRequest {
        temperature: Some(18.0),
        wind_speed: Some(22.0),
        visibility: Some(2_500.0),
        ..scenario_request()
    }
}

/// Returns a constant probability and remembers every vector it scored.
#[derive(Default)]
pub(super) struct RecordingModel {
    pub(super) probability: f64,
    pub(super) scored: Mutex<Vec<FeatureVector>>,
}

impl RecordingModel {
    pub(super) fn returning(probability: f64) -> Self {
        Self {
            probability,
            scored: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn scored(&self) -> Vec<FeatureVector> {
        self.scored.lock().expect("model mutex poisoned").clone()
    }
}

impl ScoringModel for RecordingModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], TransformError> {
        self.scored
            .lock()
            .expect("model mutex poisoned")
            .push(features.clone());
        Ok([1.0 - self.probability, self.probability])
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Probability grows with distance so different requests score differently.
pub(super) struct DistanceModel;

impl ScoringModel for DistanceModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], TransformError> {
        let distance = features.get("distance_km").unwrap_or(0.0);
        let delayed = (distance / 2_000.0).clamp(0.0, 1.0);
        Ok([1.0 - delayed, delayed])
    }

    fn name(&self) -> &str {
        "distance"
    }
}

pub(super) struct FailingModel;

impl ScoringModel for FailingModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], TransformError> {
        Err(TransformError::Failed("model artifact corrupted".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Declares a column order that disagrees with the builder.
pub(super) struct MisalignedModel {
    pub(super) columns: Vec<String>,
}

impl ScoringModel for MisalignedModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], TransformError> {
        Ok([0.5, 0.5])
    }

    fn expected_features(&self) -> Option<&[String]> {
        Some(&self.columns)
    }

    fn name(&self) -> &str {
        "misaligned"
    }
}

/// Ranks columns by absolute value and records the vectors it was given.
#[derive(Default)]
pub(super) struct RecordingExplainer {
    pub(super) calls: AtomicUsize,
    pub(super) seen: Mutex<Vec<FeatureVector>>,
}

impl RecordingExplainer {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().expect("explainer mutex poisoned").clone()
    }
}

impl Explainer for RecordingExplainer {
    fn explain(&self, features: &FeatureVector) -> Result<Vec<FeatureContribution>, ExplainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("explainer mutex poisoned")
            .push(features.clone());

        let mut ranked: Vec<FeatureContribution> = features
            .iter()
            .map(|(feature, value)| FeatureContribution {
                feature: feature.to_string(),
                contribution: value / 10_000.0,
            })
            .collect();
        ranked.sort_by(|left, right| {
            right
                .contribution
                .abs()
                .total_cmp(&left.contribution.abs())
        });
        Ok(ranked)
    }
}

pub(super) fn context_with(model: Arc<dyn ScoringModel>) -> InferenceContext {
    InferenceContext::new(
        Arc::new(imputer()),
        Arc::new(encoder()),
        model,
        DecisionPolicy::default(),
    )
    .expect("stub model accepts any schema")
}
