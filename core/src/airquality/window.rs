use crate::model::sample::SampleRow;
use crate::prelude::{CoreError, CoreResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Time span covered by one flight's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Timestamp of the first row in source order; anchors the query dates.
    pub reference: NaiveDateTime,
}

impl FlightWindow {
    pub fn from_samples(rows: &[SampleRow]) -> CoreResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| CoreError::InsufficientData("no samples to span".into()))?;
        let (start, end) = rows.iter().fold(
            (first.timestamp, first.timestamp),
            |(lo, hi), row| (lo.min(row.timestamp), hi.max(row.timestamp)),
        );
        Ok(Self {
            start,
            end,
            reference: first.timestamp,
        })
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// One day either side of the reference date.
    pub fn query_dates(&self) -> (NaiveDate, NaiveDate) {
        let date = self.reference.date();
        (date - Duration::days(1), date + Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        crate::model::sample::parse_timestamp(raw).unwrap()
    }

    #[test]
    fn window_spans_unsorted_rows() {
        let rows = vec![
            SampleRow::new(at("2019-11-20 08:10:00"), 10.0, 20.0),
            SampleRow::new(at("2019-11-20 08:00:00"), 0.0, 21.0),
            SampleRow::new(at("2019-11-20 08:30:00"), 50.0, 19.0),
        ];
        let window = FlightWindow::from_samples(&rows).unwrap();
        assert_eq!(window.start, at("2019-11-20 08:00:00"));
        assert_eq!(window.end, at("2019-11-20 08:30:00"));
        assert_eq!(window.reference, at("2019-11-20 08:10:00"));
        assert_eq!(window.duration(), Duration::minutes(30));
        assert!(window.contains(at("2019-11-20 08:15:00")));
        assert!(!window.contains(at("2019-11-20 09:00:00")));
    }

    #[test]
    fn query_dates_cross_month_boundaries() {
        let rows = vec![SampleRow::new(at("2019-12-01 00:30:00"), 0.0, 20.0)];
        let (from, to) = FlightWindow::from_samples(&rows).unwrap().query_dates();
        assert_eq!(from.to_string(), "2019-11-30");
        assert_eq!(to.to_string(), "2019-12-02");
    }

    #[test]
    fn empty_rows_have_no_window() {
        assert!(matches!(
            FlightWindow::from_samples(&[]),
            Err(CoreError::InsufficientData(_))
        ));
    }
}
