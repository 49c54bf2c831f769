use crate::workflow::runner::WorkflowResult;
use chrono::NaiveDateTime;
use pollucore::airquality::{AirQualityPoint, FlightWindow};
use pollucore::diagnostics::MetricsSnapshot;
use pollucore::model::InversionFinding;
use serde::Serialize;

/// Chart-ready view of one analyzed flight.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardModel {
    /// Temperature against time, in source order.
    pub temperature_series: Vec<(NaiveDateTime, f64)>,
    /// Bin-averaged `(altitude, temperature)`; empty bins are omitted.
    pub temperature_profile: Vec<(f64, f64)>,
    /// `(altitude, rate)` of the lagged gradient.
    pub rate_of_change: Vec<(f64, f64)>,
    pub finding: Option<InversionFinding>,
    pub status: String,
    pub flight_window: Option<FlightWindow>,
    pub air_quality_url: Option<String>,
    pub air_quality: Vec<AirQualityPoint>,
    pub rejected_rows: Vec<String>,
    pub metrics: MetricsSnapshot,
}

impl DashboardModel {
    pub fn from_result(result: &WorkflowResult, endpoint: &str, metrics: MetricsSnapshot) -> Self {
        let estimate = result.estimate.as_ref();
        Self {
            temperature_series: result
                .rows
                .iter()
                .map(|row| (row.timestamp, row.temperature))
                .collect(),
            temperature_profile: estimate
                .map(|e| e.binned.temperature_profile())
                .unwrap_or_default(),
            rate_of_change: estimate
                .map(|e| e.rate_of_change.points())
                .unwrap_or_default(),
            finding: estimate.and_then(|e| e.finding),
            status: result.status_message(),
            flight_window: result.window,
            air_quality_url: result.query.as_ref().map(|q| q.url(endpoint)),
            air_quality: Vec::new(),
            rejected_rows: result.rejected.clone(),
            metrics,
        }
    }

    pub fn with_air_quality(mut self, points: Vec<AirQualityPoint>) -> Self {
        self.air_quality = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::build_flight;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn model_carries_series_and_status() {
        let runner = Runner::new(WorkflowConfig::default());
        let result = runner.execute_samples(build_flight(0).unwrap()).unwrap();
        let model = DashboardModel::from_result(
            &result,
            &runner.config().endpoint,
            runner.metrics().snapshot(),
        );
        assert_eq!(model.temperature_series.len(), 600);
        assert_eq!(model.temperature_profile.len(), 300);
        assert!(!model.rate_of_change.is_empty());
        assert!(model.finding.unwrap().layer_found);
        assert!(model.status.starts_with("Suspect inversion layer"));
        assert!(model.air_quality_url.unwrap().contains("stationID=50t"));
        assert_eq!(model.metrics.estimates, 1);
    }

    #[test]
    fn model_serializes_to_json() {
        let model = DashboardModel {
            status: "No inversion layer found".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["status"], "No inversion layer found");
        assert!(json["finding"].is_null());
    }
}
