//! Request-scoped delay inference: weather fallbacks, feature assembly,
//! scoring, thresholding and optional local explanations.

pub mod batch;
pub mod capabilities;
mod decision;
mod domain;
mod explain;
mod fallback;
pub mod features;
mod pipeline;

#[cfg(test)]
mod tests;

pub use capabilities::{
    CategoricalEncoder, ExplainError, Explainer, FeatureContribution, NumericImputer,
    SchemaMismatch, ScoringModel, TransformError,
};
pub use decision::{decide, DecisionPolicy, DelayLabel, ThresholdError, DEFAULT_DELAY_THRESHOLD};
pub use domain::{
    EnrichedRequest, FieldViolation, PredictionRequest, PredictionResult, ValidationError,
};
pub use explain::{maybe_explain, ExplanationPayload, EXPLANATION_METHOD, TOP_FEATURES};
pub use fallback::{enrich, WeatherDefaults, DEFAULT_WEATHER};
pub use features::{FeatureAssemblyError, FeatureBuilder, FeatureSchema, FeatureVector};
pub use pipeline::{InferenceContext, InferenceError};
