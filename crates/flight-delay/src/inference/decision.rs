use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DELAY_THRESHOLD: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayLabel {
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Not Delayed")]
    NotDelayed,
}

impl DelayLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayLabel::Delayed => "Delayed",
            DelayLabel::NotDelayed => "Not Delayed",
        }
    }
}

impl fmt::Display for DelayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed cut-off turning a delay probability into a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    /// Accepts any probability in `[0, 1]`; NaN is refused.
    pub fn new(threshold: f64) -> Result<Self, ThresholdError> {
        if (0.0..=1.0).contains(&threshold) {
            Ok(Self { threshold })
        } else {
            Err(ThresholdError(threshold))
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The threshold itself counts as delayed.
    pub fn decide(&self, probability: f64) -> DelayLabel {
        if probability >= self.threshold {
            DelayLabel::Delayed
        } else {
            DelayLabel::NotDelayed
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DELAY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("decision threshold {0} is not a probability")]
pub struct ThresholdError(pub f64);

/// [`DecisionPolicy::decide`] with the default threshold.
pub fn decide(probability: f64) -> DelayLabel {
    DecisionPolicy::default().decide(probability)
}
