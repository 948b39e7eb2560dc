use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{PredictionRequest, PredictionResult, ValidationError};
use super::pipeline::{InferenceContext, InferenceError};

/// One CSV row; empty cells are absent values.
#[derive(Debug, Deserialize)]
struct FlightRow {
    airline: Option<String>,
    origin: Option<String>,
    destination: Option<String>,
    departure: Option<String>,
    distance_km: Option<f64>,
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    visibility: Option<f64>,
}

impl From<FlightRow> for PredictionRequest {
    fn from(row: FlightRow) -> Self {
        PredictionRequest {
            airline: row.airline,
            origin: row.origin,
            destination: row.destination,
            departure: row.departure,
            distance_km: row.distance_km,
            temperature: row.temperature,
            wind_speed: row.wind_speed,
            visibility: row.visibility,
        }
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub request: PredictionRequest,
    pub result: Result<PredictionResult, RowFailure>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowFailure {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to open flight batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid flight CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Validates and scores every row. Row failures are reported per row; a CSV
/// that cannot be read aborts the whole batch.
pub fn score_csv<R: Read>(
    context: &InferenceContext,
    reader: R,
    explain: bool,
) -> Result<Vec<BatchOutcome>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut outcomes = Vec::new();

    for (index, record) in csv_reader.deserialize::<FlightRow>().enumerate() {
        let request = PredictionRequest::from(record?);
        let result = request
            .validate()
            .map_err(RowFailure::from)
            .and_then(|()| {
                context
                    .predict(&request, explain)
                    .map_err(RowFailure::from)
            });

        outcomes.push(BatchOutcome {
            row: index + 1,
            request,
            result,
        });
    }

    Ok(outcomes)
}

pub fn score_path<P: AsRef<Path>>(
    context: &InferenceContext,
    path: P,
    explain: bool,
) -> Result<Vec<BatchOutcome>, BatchError> {
    let file = std::fs::File::open(path)?;
    score_csv(context, file, explain)
}
