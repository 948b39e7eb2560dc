use super::domain::{EnrichedRequest, PredictionRequest};

/// Safe stand-ins for weather signals the caller could not supply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherDefaults {
    pub temperature: f64,
    pub wind_speed: f64,
    pub visibility: f64,
}

pub const DEFAULT_WEATHER: WeatherDefaults = WeatherDefaults {
    temperature: 0.0,
    wind_speed: 5.0,
    visibility: 10_000.0,
};

/// Fills absent weather fields from [`DEFAULT_WEATHER`].
///
/// Only absence triggers the fallback: a supplied `0.0` is kept as is.
/// Non-finite values count as absent.
pub fn enrich(request: &PredictionRequest) -> EnrichedRequest {
    let mut fallback_used = false;
    let mut resolve = |value: Option<f64>, default: f64| match value.filter(|v| v.is_finite()) {
        Some(value) => value,
        None => {
            fallback_used = true;
            default
        }
    };

    let temperature = resolve(request.temperature, DEFAULT_WEATHER.temperature);
    let wind_speed = resolve(request.wind_speed, DEFAULT_WEATHER.wind_speed);
    let visibility = resolve(request.visibility, DEFAULT_WEATHER.visibility);

    EnrichedRequest {
        airline: request.airline.clone(),
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        departure: request.departure.clone(),
        distance_km: request.distance_km,
        temperature,
        wind_speed,
        visibility,
        fallback_used,
    }
}
