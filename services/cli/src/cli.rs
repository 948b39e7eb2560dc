use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flight_delay::config::parse_threshold;
use flight_delay::error::AppError;

use crate::demo::{run_demo, DemoArgs};
use crate::infra::Runtime;
use crate::predict::{run_batch, run_inspect, run_predict, BatchArgs, PredictArgs};

#[derive(Parser, Debug)]
#[command(
    name = "flight-delay",
    about = "Score flights for delay risk with the persisted model artifacts",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Directory holding the imputer, encoder, model and explainer artifacts
    #[arg(long, global = true)]
    pub(crate) artifacts: Option<PathBuf>,
    /// Override the delay probability threshold (0.0 - 1.0)
    #[arg(long, global = true, value_parser = parse_threshold)]
    pub(crate) threshold: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single flight
    Predict(PredictArgs),
    /// Score every row of a flight CSV, one JSON line per row
    Batch(BatchArgs),
    /// Show the loaded feature schema and artifact metadata
    Inspect,
    /// Run the sample flight with and without an explanation (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    let runtime = Runtime::bootstrap(&cli.global)?;

    match command {
        Command::Predict(args) => run_predict(&runtime, args),
        Command::Batch(args) => run_batch(&runtime, args),
        Command::Inspect => run_inspect(&runtime),
        Command::Demo(args) => run_demo(&runtime, args),
    }
}
