use std::path::PathBuf;

use clap::Args;
use flight_delay::error::AppError;
use flight_delay::inference::batch::{score_path, BatchOutcome};
use flight_delay::inference::{PredictionRequest, PredictionResult};
use serde::Serialize;
use tracing::{info, warn};

use crate::infra::{print_line, print_pretty, Runtime};

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Carrier code, e.g. AZ
    #[arg(long)]
    pub(crate) airline: String,
    /// Origin airport code
    #[arg(long)]
    pub(crate) origin: String,
    /// Destination airport code
    #[arg(long)]
    pub(crate) destination: String,
    /// Scheduled departure, ISO-8601 (2025-11-10T14:30:00)
    #[arg(long)]
    pub(crate) departure: String,
    /// Great-circle distance in kilometres
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) distance_km: f64,
    /// Temperature in degrees Celsius; defaults to 0 when omitted
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) temperature: Option<f64>,
    /// Wind speed; defaults to 5 when omitted
    #[arg(long)]
    pub(crate) wind_speed: Option<f64>,
    /// Visibility in metres; defaults to 10000 when omitted
    #[arg(long)]
    pub(crate) visibility: Option<f64>,
    /// Attach the top three feature contributions
    #[arg(long)]
    pub(crate) explain: bool,
    /// Score the request without checking field constraints first
    #[arg(long)]
    pub(crate) skip_validation: bool,
}

impl From<&PredictArgs> for PredictionRequest {
    fn from(args: &PredictArgs) -> Self {
        PredictionRequest {
            airline: Some(args.airline.clone()),
            origin: Some(args.origin.clone()),
            destination: Some(args.destination.clone()),
            departure: Some(args.departure.clone()),
            distance_km: Some(args.distance_km),
            temperature: args.temperature,
            wind_speed: args.wind_speed,
            visibility: args.visibility,
        }
    }
}

pub(crate) fn run_predict(runtime: &Runtime, args: PredictArgs) -> Result<(), AppError> {
    let request = PredictionRequest::from(&args);
    if !args.skip_validation {
        request.validate()?;
    }

    let result = runtime.context.predict(&request, args.explain)?;
    info!(
        prediction = %result.prediction,
        probability = result.probability,
        latency_ms = result.latency_ms,
        "flight scored"
    );
    print_pretty(&result)
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with airline,origin,destination,departure,distance_km and optional weather columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Attach explanations to every scored row
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Serialize)]
struct BatchLine<'a> {
    row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a BatchOutcome> for BatchLine<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        match &outcome.result {
            Ok(result) => BatchLine {
                row: outcome.row,
                result: Some(result),
                error: None,
            },
            Err(err) => BatchLine {
                row: outcome.row,
                result: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub(crate) fn run_batch(runtime: &Runtime, args: BatchArgs) -> Result<(), AppError> {
    let outcomes = score_path(&runtime.context, &args.input, args.explain)?;

    let failed = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .count();
    for outcome in &outcomes {
        print_line(&BatchLine::from(outcome))?;
    }

    if failed > 0 {
        warn!(
            input = %args.input.display(),
            rows = outcomes.len(),
            failed,
            "batch finished with row failures"
        );
    } else {
        info!(input = %args.input.display(), rows = outcomes.len(), "batch scored");
    }
    Ok(())
}

#[derive(Serialize)]
struct Inspection<'a> {
    artifacts: String,
    model: &'a str,
    explainer: bool,
    threshold: f64,
    columns: &'a [String],
}

pub(crate) fn run_inspect(runtime: &Runtime) -> Result<(), AppError> {
    let context = &runtime.context;
    print_pretty(&Inspection {
        artifacts: runtime.config.artifacts.directory.display().to_string(),
        model: context.model_name(),
        explainer: context.has_explainer(),
        threshold: context.policy().threshold(),
        columns: context.schema().columns(),
    })
}
