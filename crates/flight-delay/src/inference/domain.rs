use std::fmt;

use serde::{Deserialize, Serialize};

use super::decision::DelayLabel;
use super::explain::ExplanationPayload;

/// Flight and weather attributes as received from the calling layer.
///
/// Every field is optional so that partial payloads can still be scored; use
/// [`PredictionRequest::validate`] to enforce the public field constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// ISO-8601 departure timestamp.
    pub departure: Option<String>,
    pub distance_km: Option<f64>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub visibility: Option<f64>,
}

impl PredictionRequest {
    /// Checks the field constraints, collecting every violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        require_text("airline", self.airline.as_deref(), &mut violations);
        require_text("origin", self.origin.as_deref(), &mut violations);
        require_text("destination", self.destination.as_deref(), &mut violations);
        require_text("departure", self.departure.as_deref(), &mut violations);

        match self.distance_km {
            None => violations.push(FieldViolation::missing("distance_km")),
            Some(distance) if !(distance > 0.0) => violations.push(FieldViolation::new(
                "distance_km",
                format!("must be greater than 0 (got {distance})"),
            )),
            Some(_) => {}
        }

        if let Some(temperature) = self.temperature {
            if !(temperature > -50.0 && temperature < 60.0) {
                violations.push(FieldViolation::new(
                    "temperature",
                    format!("must lie strictly between -50 and 60 (got {temperature})"),
                ));
            }
        }

        for (field, value) in [("wind_speed", self.wind_speed), ("visibility", self.visibility)] {
            if let Some(value) = value {
                if !(value >= 0.0) {
                    violations.push(FieldViolation::new(
                        field,
                        format!("must be zero or greater (got {value})"),
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn require_text(field: &'static str, value: Option<&str>, violations: &mut Vec<FieldViolation>) {
    if value.map(str::trim).map_or(true, str::is_empty) {
        violations.push(FieldViolation::missing(field));
    }
}

/// Request after weather fallbacks have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRequest {
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure: Option<String>,
    pub distance_km: Option<f64>,
    pub temperature: f64,
    pub wind_speed: f64,
    pub visibility: f64,
    /// True when at least one weather field was filled from the defaults table.
    pub fallback_used: bool,
}

/// Outcome of a single inference call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: DelayLabel,
    /// Delay probability rounded to two decimals.
    pub probability: f64,
    pub fallback_used: bool,
    pub latency_ms: f64,
    pub explanation: Option<ExplanationPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: String,
}

impl FieldViolation {
    fn new(field: &'static str, reason: String) -> Self {
        Self { field, reason }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, "is required".to_string())
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Malformed request shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid prediction request: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> PredictionRequest {
        PredictionRequest {
            airline: Some("AZ".to_string()),
            origin: Some("GIG".to_string()),
            destination: Some("GRU".to_string()),
            departure: Some("2025-11-10T14:30:00".to_string()),
            distance_km: Some(350.0),
            temperature: None,
            wind_speed: None,
            visibility: None,
        }
    }

    #[test]
    fn accepts_request_without_weather() {
        assert!(complete_request().validate().is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let request = PredictionRequest {
            airline: Some("  ".to_string()),
            distance_km: Some(0.0),
            temperature: Some(60.0),
            wind_speed: Some(-1.0),
            ..complete_request()
        };

        let err = request.validate().expect_err("request is invalid");
        let fields: Vec<_> = err.violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["airline", "distance_km", "temperature", "wind_speed"]
        );
        assert!(err.to_string().starts_with("invalid prediction request: airline"));
    }

    #[test]
    fn zero_weather_values_are_valid() {
        let request = PredictionRequest {
            temperature: Some(0.0),
            wind_speed: Some(0.0),
            visibility: Some(0.0),
            ..complete_request()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn deserializes_partial_payload() {
        let request: PredictionRequest =
            serde_json::from_str(r#"{"airline":"G3","distance_km":812.5,"visibility":null}"#)
                .expect("partial payload parses");
        assert_eq!(request.airline.as_deref(), Some("G3"));
        assert_eq!(request.distance_km, Some(812.5));
        assert!(request.visibility.is_none());
        assert!(request.departure.is_none());
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_hundredths(0.4567), 0.46);
        assert_eq!(round_to_hundredths(0.0), 0.0);
        assert_eq!(round_to_hundredths(1.0), 1.0);
    }
}
