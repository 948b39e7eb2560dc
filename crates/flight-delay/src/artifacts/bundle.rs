use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::{read_json, ArtifactError, LimeExplainer, LimeSettings, LogisticRegression};
use super::{OneHotEncoder, SimpleImputer};
use crate::inference::{DecisionPolicy, InferenceContext, ScoringModel};

pub const IMPUTER_FILE: &str = "num_imputer.json";
pub const ENCODER_FILE: &str = "onehot_encoder.json";
pub const MODEL_FILE: &str = "model.json";
pub const EXPLAINER_FILE: &str = "explainer.json";

/// Every persisted artifact the pipeline needs, validated individually.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub directory: PathBuf,
    pub imputer: SimpleImputer,
    pub encoder: OneHotEncoder,
    pub model: LogisticRegression,
    pub explainer: Option<LimeSettings>,
}

impl ArtifactBundle {
    /// Reads the bundle from `directory`. The explainer file is optional.
    pub fn load<P: AsRef<Path>>(directory: P) -> Result<Self, ArtifactError> {
        let directory = directory.as_ref();

        let imputer: SimpleImputer = read_json(&directory.join(IMPUTER_FILE))?;
        imputer.validate()?;

        let encoder: OneHotEncoder = read_json(&directory.join(ENCODER_FILE))?;
        encoder.validate()?;

        let model: LogisticRegression = read_json(&directory.join(MODEL_FILE))?;
        model.validate()?;

        let explainer_path = directory.join(EXPLAINER_FILE);
        let explainer = if explainer_path.is_file() {
            let settings: LimeSettings = read_json(&explainer_path)?;
            settings.validate()?;
            Some(settings)
        } else {
            warn!(
                path = %explainer_path.display(),
                "explainer artifact missing; explanations disabled"
            );
            None
        };

        Ok(Self {
            directory: directory.to_path_buf(),
            imputer,
            encoder,
            model,
            explainer,
        })
    }

    /// Wires the artifacts into an inference context, checking that the model
    /// and explainer agree with the builder's column order.
    pub fn into_context(self, policy: DecisionPolicy) -> Result<InferenceContext, ArtifactError> {
        let model: Arc<dyn ScoringModel> = Arc::new(self.model);
        let mut context = InferenceContext::new(
            Arc::new(self.imputer),
            Arc::new(self.encoder),
            Arc::clone(&model),
            policy,
        )?;

        if let Some(settings) = self.explainer {
            context = context.with_explainer(Arc::new(LimeExplainer::new(settings, model)))?;
        }

        info!(
            directory = %self.directory.display(),
            model = context.model_name(),
            columns = context.schema().len(),
            explainer = context.has_explainer(),
            threshold = context.policy().threshold(),
            "artifact bundle loaded"
        );

        Ok(context)
    }
}

impl InferenceContext {
    pub fn from_artifacts<P: AsRef<Path>>(
        directory: P,
        policy: DecisionPolicy,
    ) -> Result<Self, ArtifactError> {
        ArtifactBundle::load(directory)?.into_context(policy)
    }
}
