use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layouts accepted from logs and CSV exports, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One observation from a balloon flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub timestamp: NaiveDateTime,
    /// Meters. Absent for rows decoded from the pressure message stream.
    pub altitude: Option<f64>,
    /// Degrees Celsius.
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_absolute: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_differential: Option<f64>,
}

impl SampleRow {
    pub fn new(timestamp: NaiveDateTime, altitude: f64, temperature: f64) -> Self {
        Self {
            timestamp,
            altitude: Some(altitude),
            temperature,
            pressure_absolute: None,
            pressure_differential: None,
        }
    }

    pub fn with_pressures(mut self, absolute: Option<f64>, differential: Option<f64>) -> Self {
        self.pressure_absolute = absolute;
        self.pressure_differential = differential;
        self
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// Parses the date-time layouts found in flight logs and sample exports.
///
/// Offsets are normalized to UTC before the zone is dropped. Returns `None`
/// when no layout matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parse_timestamp_accepts_iso_and_space_separated() {
        let iso = parse_timestamp("2021-01-01T00:00:00").unwrap();
        let spaced = parse_timestamp("2021-01-01 00:00:00").unwrap();
        assert_eq!(iso, spaced);
    }

    #[test]
    fn parse_timestamp_keeps_fractional_seconds() {
        let ts = parse_timestamp("2019-11-20 08:15:30.250").unwrap();
        assert_eq!(ts.nanosecond(), 250_000_000);
    }

    #[test]
    fn parse_timestamp_normalizes_offsets_to_utc() {
        let ts = parse_timestamp("2019-11-20T15:00:00+07:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("1013.25").is_none());
    }
}
