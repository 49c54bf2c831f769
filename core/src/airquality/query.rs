use crate::airquality::window::FlightWindow;
use crate::prelude::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ENDPOINT: &str = "http://air4thai.pcd.go.th/webV2/history/api/data.php";
pub const DEFAULT_STATION: &str = "50t";

const QUERY_DATE_FORMAT: &str = "%y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pollutant {
    #[default]
    #[serde(rename = "PM25")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "O3")]
    O3,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
}

impl Pollutant {
    /// Parameter code used by the history API and as the payload column name.
    pub fn code(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM25",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O3",
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM 2.5",
            Pollutant::Pm10 => "PM 10",
            Pollutant::O3 => "O3",
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO2",
            Pollutant::So2 => "SO2",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Pollutant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "PM25" => Ok(Pollutant::Pm25),
            "PM10" => Ok(Pollutant::Pm10),
            "O3" => Ok(Pollutant::O3),
            "CO" => Ok(Pollutant::Co),
            "NO2" => Ok(Pollutant::No2),
            "SO2" => Ok(Pollutant::So2),
            _ => Err(CoreError::InvalidConfig(format!("unknown pollutant `{}`", s))),
        }
    }
}

/// Hourly history request for one station and parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub station_id: String,
    pub pollutant: Pollutant,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl HistoryQuery {
    /// Whole-day request covering the day before through the day after the flight.
    pub fn for_flight(station_id: &str, pollutant: Pollutant, window: &FlightWindow) -> Self {
        let (start_date, end_date) = window.query_dates();
        Self {
            station_id: station_id.to_string(),
            pollutant,
            start_date,
            end_date,
            start_hour: 0,
            end_hour: 24,
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}?stationID={}&param={}&type=hr&sdate={}&edate={}&stime={:02}&etime={:02}",
            endpoint,
            self.station_id,
            self.pollutant.code(),
            self.start_date.format(QUERY_DATE_FORMAT),
            self.end_date.format(QUERY_DATE_FORMAT),
            self.start_hour,
            self.end_hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample::{parse_timestamp, SampleRow};

    #[test]
    fn pollutant_codes_round_trip_through_labels() {
        assert_eq!("PM 2.5".parse::<Pollutant>().unwrap(), Pollutant::Pm25);
        assert_eq!("pm10".parse::<Pollutant>().unwrap(), Pollutant::Pm10);
        assert_eq!("NO2".parse::<Pollutant>().unwrap(), Pollutant::No2);
        assert!("lead".parse::<Pollutant>().is_err());
        assert_eq!(Pollutant::Pm25.to_string(), "PM25");
    }

    #[test]
    fn flight_query_builds_history_url() {
        let ts = parse_timestamp("2019-11-20 08:00:00").unwrap();
        let window = FlightWindow::from_samples(&[SampleRow::new(ts, 0.0, 20.0)]).unwrap();
        let query = HistoryQuery::for_flight(DEFAULT_STATION, Pollutant::Pm25, &window);
        assert_eq!(
            query.url(DEFAULT_ENDPOINT),
            "http://air4thai.pcd.go.th/webV2/history/api/data.php?stationID=50t&param=PM25\
             &type=hr&sdate=19-11-19&edate=19-11-21&stime=00&etime=24"
        );
    }
}
