use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::ArtifactError;
use crate::inference::{ExplainError, Explainer, FeatureContribution, FeatureVector, ScoringModel};

fn default_num_samples() -> usize {
    500
}

fn default_ridge_alpha() -> f64 {
    1.0
}

fn default_seed() -> u64 {
    42
}

/// Fitted parameters of the tabular LIME explainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimeSettings {
    pub feature_names: Vec<String>,
    /// Reference value per column (training means) substituted when a column
    /// is switched off in a perturbed sample.
    pub baseline: Vec<f64>,
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,
    /// Defaults to `0.75 * sqrt(columns)`.
    #[serde(default)]
    pub kernel_width: Option<f64>,
    #[serde(default = "default_ridge_alpha")]
    pub ridge_alpha: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl LimeSettings {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.baseline.len() != self.feature_names.len() {
            return Err(ArtifactError::invalid(
                "explainer",
                format!(
                    "{} baseline values for {} features",
                    self.baseline.len(),
                    self.feature_names.len()
                ),
            ));
        }
        if self.baseline.iter().any(|value| !value.is_finite()) {
            return Err(ArtifactError::invalid("explainer", "baseline must be finite"));
        }
        if self.num_samples < 2 {
            return Err(ArtifactError::invalid(
                "explainer",
                "num_samples must be at least 2",
            ));
        }
        if !(self.ridge_alpha > 0.0) {
            return Err(ArtifactError::invalid("explainer", "ridge_alpha must be positive"));
        }
        if let Some(width) = self.kernel_width {
            if !(width > 0.0) {
                return Err(ArtifactError::invalid(
                    "explainer",
                    "kernel_width must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Local surrogate explainer.
///
/// Each sample keeps or replaces every column with its baseline value (a
/// fair coin per column, drawn from an RNG seeded per call), is scored by the
/// model, and is weighted by an exponential kernel on the number of replaced
/// columns. A weighted ridge regression of the delay probability on the keep
/// mask gives one coefficient per column; those are the contributions.
pub struct LimeExplainer {
    settings: LimeSettings,
    model: Arc<dyn ScoringModel>,
}

impl LimeExplainer {
    pub fn new(settings: LimeSettings, model: Arc<dyn ScoringModel>) -> Self {
        Self { settings, model }
    }

    pub fn settings(&self) -> &LimeSettings {
        &self.settings
    }
}

impl Explainer for LimeExplainer {
    fn explain(&self, features: &FeatureVector) -> Result<Vec<FeatureContribution>, ExplainError> {
        let width = features.len();
        if width != self.settings.baseline.len() {
            return Err(ExplainError::Surrogate(format!(
                "baseline covers {} columns, vector has {}",
                self.settings.baseline.len(),
                width
            )));
        }

        let kernel_width = self
            .settings
            .kernel_width
            .unwrap_or_else(|| 0.75 * (width as f64).sqrt());
        let mut rng = StdRng::seed_from_u64(self.settings.seed);

        let samples = self.settings.num_samples;
        let mut mask_data = Vec::with_capacity(samples * width);
        let mut targets = Vec::with_capacity(samples);
        let mut weights = Vec::with_capacity(samples);

        for sample in 0..samples {
            // The first sample is the instance itself.
            let mask: Vec<f64> = if sample == 0 {
                vec![1.0; width]
            } else {
                (0..width)
                    .map(|_| if rng.random_bool(0.5) { 1.0 } else { 0.0 })
                    .collect()
            };

            let perturbed = mask
                .iter()
                .zip(features.values())
                .zip(&self.settings.baseline)
                .map(|((keep, value), baseline)| if *keep > 0.5 { *value } else { *baseline })
                .collect();
            let [_, delayed] = self.model.predict_proba(&features.with_values(perturbed)?)?;

            let replaced = mask.iter().filter(|keep| **keep < 0.5).count() as f64;
            weights.push((-replaced / (kernel_width * kernel_width)).exp().sqrt());
            targets.push(delayed);
            mask_data.extend(mask);
        }

        let masks = Array2::from_shape_vec((samples, width), mask_data)
            .map_err(|err| ExplainError::Surrogate(format!("mask matrix: {err}")))?;
        let coefficients = weighted_ridge(
            &masks,
            &Array1::from_vec(targets),
            &Array1::from_vec(weights),
            self.settings.ridge_alpha,
        )?;

        let mut ranked: Vec<FeatureContribution> = features
            .columns()
            .iter()
            .zip(coefficients.iter().copied())
            .map(|(feature, contribution)| FeatureContribution {
                feature: feature.clone(),
                contribution,
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

    fn expected_features(&self) -> Option<&[String]> {
        Some(&self.settings.feature_names)
    }
}

/// Weighted ridge regression with an unpenalised intercept, solved through the
/// centred normal equations.
fn weighted_ridge(
    masks: &Array2<f64>,
    targets: &Array1<f64>,
    weights: &Array1<f64>,
    alpha: f64,
) -> Result<Array1<f64>, ExplainError> {
    let total = weights.sum();
    if !(total > 0.0) {
        return Err(ExplainError::Surrogate("sample weights sum to zero".to_string()));
    }

    let mean_x = masks.t().dot(weights) / total;
    let mean_y = targets.dot(weights) / total;

    // X_w = diag(sqrt(w)) * (X - mean_x), y_w = diag(sqrt(w)) * (y - mean_y)
    let sqrt_w = weights.mapv(f64::sqrt);
    let x_w = (masks - &mean_x) * &sqrt_w.view().insert_axis(Axis(1));
    let y_w = (targets - mean_y) * &sqrt_w;

    let mut gram = x_w.t().dot(&x_w);
    gram.diag_mut().mapv_inplace(|value| value + alpha);
    let rhs = x_w.t().dot(&y_w);

    cholesky_solve(&gram, &rhs).ok_or_else(|| {
        ExplainError::Surrogate("normal equations are not positive definite".to_string())
    })
}

fn cholesky_solve(matrix: &Array2<f64>, rhs: &Array1<f64>) -> Option<Array1<f64>> {
    let n = rhs.len();
    let mut lower = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| lower[[i, k]] * lower[[j, k]]).sum();
            let value = matrix[[i, j]] - partial;
            if i == j {
                if !(value > 0.0) {
                    return None;
                }
                lower[[i, i]] = value.sqrt();
            } else {
                lower[[i, j]] = value / lower[[j, j]];
            }
        }
    }

    let mut forward = Array1::<f64>::zeros(n);
    for i in 0..n {
        let partial: f64 = (0..i).map(|k| lower[[i, k]] * forward[k]).sum();
        forward[i] = (rhs[i] - partial) / lower[[i, i]];
    }

    let mut solution = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let partial: f64 = (i + 1..n).map(|k| lower[[k, i]] * solution[k]).sum();
        solution[i] = (forward[i] - partial) / lower[[i, i]];
    }

    Some(solution)
}
