use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::{info, warn};
use pollucore::airquality::{FlightWindow, HistoryQuery};
use pollucore::diagnostics::MetricsRecorder;
use pollucore::model::{InversionEstimate, SampleRow};
use pollucore::prelude::Stage;
use pollucore::processing::with_pressure_altitude;
use std::sync::Arc;

pub struct WorkflowResult {
    pub rows: Vec<SampleRow>,
    pub rejected: Vec<String>,
    pub estimate: Option<InversionEstimate>,
    pub window: Option<FlightWindow>,
    pub query: Option<HistoryQuery>,
}

impl WorkflowResult {
    pub fn status_message(&self) -> String {
        match &self.estimate {
            Some(estimate) => estimate.status_message(),
            None => "No flight samples to analyze".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Extracts the configured message type from a raw log and analyzes it.
    pub fn execute_log(&self, text: &str) -> anyhow::Result<WorkflowResult> {
        let extractor = self.config.extractor();
        let report = match extractor.execute(text) {
            Ok(report) => report,
            Err(err) => {
                self.metrics.record_error();
                return Err(err).with_context(|| format!("executing {}", extractor.name()));
            }
        };
        self.metrics.record_extraction(&report);
        if report.lines_matched == 0 {
            warn!("no `{}` lines in log", extractor.marker());
        }

        let rejected = report.rejected.iter().map(|err| err.to_string()).collect();
        let rows = if report.rows.iter().any(|row| row.altitude.is_none()) {
            with_pressure_altitude(&report.rows, self.config.altitude_reference)
                .context("deriving altitude from absolute pressure")?
        } else {
            report.rows
        };

        self.analyze(rows, rejected)
    }

    /// Analyzes rows that already came from a sample table.
    pub fn execute_samples(&self, rows: Vec<SampleRow>) -> anyhow::Result<WorkflowResult> {
        self.analyze(rows, Vec::new())
    }

    fn analyze(&self, rows: Vec<SampleRow>, rejected: Vec<String>) -> anyhow::Result<WorkflowResult> {
        if rows.is_empty() {
            return Ok(WorkflowResult {
                rows,
                rejected,
                estimate: None,
                window: None,
                query: None,
            });
        }

        let estimator = self.config.estimator();
        let estimate = match estimator.execute(&rows) {
            Ok(estimate) => estimate,
            Err(err) => {
                self.metrics.record_error();
                return Err(err).with_context(|| format!("executing {}", estimator.name()));
            }
        };
        self.metrics.record_estimate(&estimate);

        let window = FlightWindow::from_samples(&rows).context("deriving flight window")?;
        let query = HistoryQuery::for_flight(&self.config.station_id, self.config.pollutant, &window);
        info!(
            "{} rows from {} to {}: {}",
            rows.len(),
            window.start,
            window.end,
            estimate.status_message()
        );

        Ok(WorkflowResult {
            rows,
            rejected,
            estimate: Some(estimate),
            window: Some(window),
            query: Some(query),
        })
    }
}
