use crate::airquality::query::Pollutant;
use crate::airquality::window::FlightWindow;
use crate::model::sample::parse_timestamp;
use crate::prelude::{CoreError, CoreResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const TIMESTAMP_KEY: &str = "DATETIMEDATA";

/// One hourly reading. `value` is `None` where the station reported no data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
    pub during_flight: bool,
}

/// Decodes `stations[0].data` from a history response body.
pub fn parse_history(body: &str, pollutant: Pollutant) -> CoreResult<Vec<AirQualityPoint>> {
    let root: Value = serde_json::from_str(body)
        .map_err(|err| CoreError::Payload(format!("invalid JSON: {}", err)))?;

    let station = root
        .get("stations")
        .and_then(Value::as_array)
        .and_then(|stations| stations.first())
        .ok_or_else(|| CoreError::Payload("response has no stations".into()))?;

    let data = match station.get("data") {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(_) => return Err(CoreError::Payload("`data` is not an array".into())),
    };

    data.iter()
        .enumerate()
        .map(|(idx, entry)| {
            let fields = entry
                .as_object()
                .ok_or_else(|| CoreError::Payload(format!("entry {} is not an object", idx)))?;
            decode_entry(idx, fields, pollutant)
        })
        .collect()
}

/// Flags the points that fall inside the flight.
pub fn mark_flight(points: &mut [AirQualityPoint], window: &FlightWindow) {
    for point in points {
        point.during_flight = window.contains(point.timestamp);
    }
}

fn decode_entry(
    idx: usize,
    fields: &Map<String, Value>,
    pollutant: Pollutant,
) -> CoreResult<AirQualityPoint> {
    let raw_timestamp = fields
        .get(TIMESTAMP_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::Payload(format!("entry {} has no {}", idx, TIMESTAMP_KEY)))?;
    let timestamp = parse_timestamp(raw_timestamp).ok_or_else(|| {
        CoreError::Payload(format!(
            "entry {} has unreadable timestamp {:?}",
            idx, raw_timestamp
        ))
    })?;

    // Fall back to the only remaining column when the parameter key differs.
    let value_field = fields.get(pollutant.code()).or_else(|| {
        let mut others = fields.iter().filter(|(key, _)| key.as_str() != TIMESTAMP_KEY);
        match (others.next(), others.next()) {
            (Some((_, value)), None) => Some(value),
            _ => None,
        }
    });

    Ok(AirQualityPoint {
        timestamp,
        value: value_field.and_then(numeric),
        during_flight: false,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::SampleRow;

    const BODY: &str = r#"{
        "stations": [{
            "stationID": "50t",
            "data": [
                {"DATETIMEDATA": "2019-11-20 07:00:00", "PM25": 41},
                {"DATETIMEDATA": "2019-11-20 08:00:00", "PM25": "38.5"},
                {"DATETIMEDATA": "2019-11-20 09:00:00", "PM25": null}
            ]
        }]
    }"#;

    #[test]
    fn decodes_values_and_gaps() {
        let points = parse_history(BODY, Pollutant::Pm25).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].value, Some(41.0));
        assert_eq!(points[1].value, Some(38.5));
        assert_eq!(points[2].value, None);
        assert!(points.iter().all(|p| !p.during_flight));
    }

    #[test]
    fn single_unnamed_column_is_used() {
        let body = r#"{"stations":[{"data":[{"DATETIMEDATA":"2019-11-20 07:00:00","value":12.5}]}]}"#;
        let points = parse_history(body, Pollutant::No2).unwrap();
        assert_eq!(points[0].value, Some(12.5));
    }

    #[test]
    fn flight_window_marks_overlap() {
        let mut points = parse_history(BODY, Pollutant::Pm25).unwrap();
        let rows = vec![
            SampleRow::new(parse_timestamp("2019-11-20 07:30:00").unwrap(), 0.0, 20.0),
            SampleRow::new(parse_timestamp("2019-11-20 08:30:00").unwrap(), 90.0, 19.0),
        ];
        mark_flight(&mut points, &FlightWindow::from_samples(&rows).unwrap());
        let flags: Vec<bool> = points.iter().map(|p| p.during_flight).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn structural_problems_are_payload_errors() {
        assert!(matches!(
            parse_history("not json", Pollutant::Pm25),
            Err(CoreError::Payload(_))
        ));
        assert!(matches!(
            parse_history(r#"{"stations":[]}"#, Pollutant::Pm25),
            Err(CoreError::Payload(_))
        ));
        assert!(matches!(
            parse_history(
                r#"{"stations":[{"data":[{"DATETIMEDATA":"someday","PM25":1}]}]}"#,
                Pollutant::Pm25
            ),
            Err(CoreError::Payload(_))
        ));
    }

    #[test]
    fn missing_data_is_empty() {
        let points = parse_history(r#"{"stations":[{"stationID":"50t"}]}"#, Pollutant::Pm25).unwrap();
        assert!(points.is_empty());
    }
}
