use clap::Args;
use flight_delay::error::AppError;
use flight_delay::inference::PredictionRequest;
use serde::Serialize;
use tracing::{info, warn};

use crate::infra::{print_pretty, Runtime};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only run the plain prediction, even when an explainer is loaded
    #[arg(long)]
    pub(crate) skip_explanation: bool,
}

/// Rio de Janeiro to São Paulo on a Monday afternoon with no weather data,
/// so every weather fallback is exercised.
pub(crate) fn sample_flight() -> PredictionRequest {
    PredictionRequest {
        airline: Some("AZ".to_string()),
        origin: Some("GIG".to_string()),
        destination: Some("GRU".to_string()),
        departure: Some("2025-11-10T14:30:00".to_string()),
        distance_km: Some(350.0),
        ..PredictionRequest::default()
    }
}

#[derive(Serialize)]
struct DemoStep<'a, T: Serialize> {
    step: &'a str,
    output: T,
}

pub(crate) fn run_demo(runtime: &Runtime, args: DemoArgs) -> Result<(), AppError> {
    let request = sample_flight();
    request.validate()?;

    print_pretty(&DemoStep {
        step: "request",
        output: &request,
    })?;

    let plain = runtime.context.predict(&request, false)?;
    info!(
        prediction = %plain.prediction,
        probability = plain.probability,
        fallback_used = plain.fallback_used,
        "demo flight scored"
    );
    print_pretty(&DemoStep {
        step: "prediction",
        output: &plain,
    })?;

    if args.skip_explanation {
        return Ok(());
    }
    if !runtime.context.has_explainer() {
        warn!("no explainer artifact loaded; skipping explained prediction");
        return Ok(());
    }

    let explained = runtime.context.predict(&request, true)?;
    print_pretty(&DemoStep {
        step: "explained_prediction",
        output: &explained,
    })
}
