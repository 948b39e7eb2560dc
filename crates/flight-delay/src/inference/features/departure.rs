use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::FeatureAssemblyError;

/// ISO 8601 forms carrying an offset that strict RFC 3339 refuses: missing
/// seconds, basic `+hhmm` offsets, a space separator.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Time-of-day features derived from the departure timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartureTime {
    /// `hour + minute / 60`; seconds are ignored.
    pub decimal_hour: f64,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u32,
}

impl DepartureTime {
    fn from_naive(moment: NaiveDateTime) -> Self {
        Self {
            decimal_hour: f64::from(moment.hour()) + f64::from(moment.minute()) / 60.0,
            weekday: moment.weekday().num_days_from_monday(),
        }
    }
}

/// Derives departure features.
///
/// Absent or blank input yields `Ok(None)`; input that is present but not a
/// recognisable timestamp is an error. Offsets are honoured by reading the
/// wall-clock time in the stated offset.
pub(crate) fn parse_departure(
    raw: Option<&str>,
) -> Result<Option<DepartureTime>, FeatureAssemblyError> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    parse_timestamp(trimmed)
        .map(|moment| Some(DepartureTime::from_naive(moment)))
        .ok_or_else(|| FeatureAssemblyError::UnparseableDeparture {
            value: trimmed.to_string(),
        })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.naive_local());
    }

    if let Some(moment) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(moment.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
