mod cli;
mod demo;
mod infra;
mod predict;

use flight_delay::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
