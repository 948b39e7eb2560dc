pub mod artifacts;
pub mod config;
pub mod error;
pub mod inference;
pub mod telemetry;
