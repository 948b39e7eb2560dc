use std::sync::Arc;
use std::thread;
use std::time::Instant;

use super::capabilities::{
    CategoricalEncoder, ExplainError, Explainer, NumericImputer, SchemaMismatch, ScoringModel,
    TransformError,
};
use super::decision::DecisionPolicy;
use super::domain::{round_to_hundredths, PredictionRequest, PredictionResult};
use super::explain::{maybe_explain, ExplanationPayload};
use super::fallback::enrich;
use super::features::{FeatureAssemblyError, FeatureBuilder, FeatureSchema, FeatureVector};

/// Immutable, process-wide inference state.
///
/// Built once at startup and shared by reference (typically behind an `Arc`);
/// nothing in it is mutated by `predict`, so concurrent callers need no locks.
pub struct InferenceContext {
    builder: FeatureBuilder,
    model: Arc<dyn ScoringModel>,
    explainer: Option<Arc<dyn Explainer>>,
    policy: DecisionPolicy,
}

impl InferenceContext {
    pub fn new(
        imputer: Arc<dyn NumericImputer>,
        encoder: Arc<dyn CategoricalEncoder>,
        model: Arc<dyn ScoringModel>,
        policy: DecisionPolicy,
    ) -> Result<Self, SchemaMismatch> {
        let builder = FeatureBuilder::new(imputer, encoder);
        if let Some(expected) = model.expected_features() {
            SchemaMismatch::check(model.name(), expected, builder.schema().columns())?;
        }

        Ok(Self {
            builder,
            model,
            explainer: None,
            policy,
        })
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn Explainer>) -> Result<Self, SchemaMismatch> {
        if let Some(expected) = explainer.expected_features() {
            SchemaMismatch::check("explainer", expected, self.builder.schema().columns())?;
        }
        self.explainer = Some(explainer);
        Ok(self)
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.builder.schema()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn has_explainer(&self) -> bool {
        self.explainer.is_some()
    }

    pub fn policy(&self) -> DecisionPolicy {
        self.policy
    }

    /// Enrichment and feature assembly only.
    pub fn features(&self, request: &PredictionRequest) -> Result<FeatureVector, InferenceError> {
        Ok(self.builder.build(&enrich(request))?)
    }

    /// Delay probability (index 1 of `predict_proba`) for an assembled vector.
    pub fn score(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let [_, delayed] = self
            .model
            .predict_proba(features)
            .map_err(InferenceError::Scoring)?;

        if !(0.0..=1.0).contains(&delayed) {
            return Err(InferenceError::InvalidProbability(delayed));
        }

        Ok(delayed)
    }

    pub fn predict(
        &self,
        request: &PredictionRequest,
        explain: bool,
    ) -> Result<PredictionResult, InferenceError> {
        let started = Instant::now();

        let enriched = enrich(request);
        let features = self.builder.build(&enriched)?;

        let (probability, explanation) = if explain {
            self.score_and_explain(&features)?
        } else {
            (self.score(&features)?, None)
        };

        let prediction = self.policy.decide(probability);
        let latency_ms = round_to_hundredths(started.elapsed().as_secs_f64() * 1_000.0);

        Ok(PredictionResult {
            prediction,
            probability: round_to_hundredths(probability),
            fallback_used: enriched.fallback_used,
            latency_ms,
            explanation,
        })
    }

    /// The explainer sees the same vector as the model and runs alongside it.
    fn score_and_explain(
        &self,
        features: &FeatureVector,
    ) -> Result<(f64, Option<ExplanationPayload>), InferenceError> {
        let explainer = self.explainer.as_deref();

        let (scored, explained) = thread::scope(|scope| {
            let worker = scope.spawn(|| maybe_explain(explainer, features, true));
            let scored = self.score(features);
            let explained = worker.join().unwrap_or(Err(ExplainError::Panicked));
            (scored, explained)
        });

        Ok((scored?, explained?))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error(transparent)]
    Features(#[from] FeatureAssemblyError),
    #[error("scoring model failed: {0}")]
    Scoring(#[source] TransformError),
    #[error("scoring model returned {0}, which is not a probability")]
    InvalidProbability(f64),
    #[error(transparent)]
    Explain(#[from] ExplainError),
}
