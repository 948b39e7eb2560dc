use flight_delay::config::{AppConfig, AppEnvironment, ConfigError};
use flight_delay::error::AppError;
use flight_delay::inference::{DecisionPolicy, InferenceContext};
use flight_delay::telemetry;
use serde::Serialize;
use tracing::info;

use crate::cli::GlobalArgs;

/// Configuration plus the inference context built from it, shared by every
/// command for the lifetime of the process.
pub(crate) struct Runtime {
    pub(crate) config: AppConfig,
    pub(crate) context: InferenceContext,
}

impl Runtime {
    pub(crate) fn bootstrap(overrides: &GlobalArgs) -> Result<Self, AppError> {
        let mut config = AppConfig::load()?;

        if let Some(directory) = overrides.artifacts.clone() {
            config.artifacts.directory = directory;
        }
        if let Some(threshold) = overrides.threshold {
            config.decision.threshold = threshold;
        }

        telemetry::init(&config.telemetry)?;

        let policy = DecisionPolicy::new(config.decision.threshold).map_err(|err| {
            ConfigError::InvalidThreshold {
                value: err.0.to_string(),
            }
        })?;
        let context = InferenceContext::from_artifacts(&config.artifacts.directory, policy)?;

        info!(
            environment = environment_label(config.environment),
            "flight delay inference ready"
        );

        Ok(Self { config, context })
    }
}

fn environment_label(environment: AppEnvironment) -> &'static str {
    match environment {
        AppEnvironment::Development => "development",
        AppEnvironment::Test => "test",
        AppEnvironment::Production => "production",
    }
}

pub(crate) fn print_pretty<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_line<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
