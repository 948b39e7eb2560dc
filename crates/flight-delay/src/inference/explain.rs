use serde::Serialize;

use super::capabilities::{ExplainError, Explainer, FeatureContribution};
use super::features::FeatureVector;

pub const EXPLANATION_METHOD: &str = "LIME";
pub const TOP_FEATURES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationPayload {
    pub method: &'static str,
    pub top_3_features: Vec<FeatureContribution>,
}

/// Runs the explainer only when asked, on the exact vector that was scored.
pub fn maybe_explain(
    explainer: Option<&dyn Explainer>,
    features: &FeatureVector,
    requested: bool,
) -> Result<Option<ExplanationPayload>, ExplainError> {
    if !requested {
        return Ok(None);
    }

    let explainer = explainer.ok_or(ExplainError::Unavailable)?;
    let mut ranked = explainer.explain(features)?;
    ranked.truncate(TOP_FEATURES);

    Ok(Some(ExplanationPayload {
        method: EXPLANATION_METHOD,
        top_3_features: ranked,
    }))
}
