use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::inference::DEFAULT_DELAY_THRESHOLD;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub artifacts: ArtifactsConfig,
    pub decision: DecisionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let directory = env::var("ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("artifacts/current"));

        let threshold = match env::var("DECISION_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_DELAY_THRESHOLD,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            artifacts: ArtifactsConfig { directory },
            decision: DecisionConfig { threshold },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the persisted model, encoder, imputer and explainer files.
#[derive(Debug, Clone)]
pub struct ArtifactsConfig {
    pub directory: PathBuf,
}

/// Probability cut-off applied by the decision policy.
#[derive(Debug, Clone, Copy)]
pub struct DecisionConfig {
    pub threshold: f64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidThreshold {
            value: raw.to_string(),
        })?;

    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold {
            value: raw.to_string(),
        });
    }

    Ok(value)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { value } => write!(
                f,
                "DECISION_THRESHOLD must be a probability between 0 and 1 (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
