use crate::extract::schema::LineSchema;
use crate::model::sample::SampleRow;
use crate::prelude::{CoreError, CoreResult, Stage};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Message type carrying barometer and temperature readings.
pub const SCALED_PRESSURE_MARKER: &str = "mavlink_scaled_pressure_t";

/// What to do with a marker line that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Fail the whole batch on the first bad line.
    #[default]
    Abort,
    /// Keep going and collect the errors in the report.
    Skip,
}

/// Outcome of scanning one log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub rows: Vec<SampleRow>,
    pub rejected: Vec<CoreError>,
    pub lines_matched: usize,
}

/// Selects marker lines from a mixed telemetry log and decodes them.
#[derive(Debug, Clone)]
pub struct TelemetryExtractor {
    marker: String,
    schema: LineSchema,
    policy: ErrorPolicy,
}

impl TelemetryExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            schema: LineSchema::default(),
            policy: ErrorPolicy::default(),
        }
    }

    pub fn scaled_pressure() -> Self {
        Self::new(SCALED_PRESSURE_MARKER)
    }

    pub fn with_schema(mut self, schema: LineSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn schema(&self) -> &LineSchema {
        &self.schema
    }

    /// Lines containing the marker, paired with their 1-based line number.
    pub fn matching_lines<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        text.lines()
            .enumerate()
            .filter(move |(_, line)| line.contains(self.marker.as_str()))
            .map(|(idx, line)| (idx + 1, line))
    }

    /// Decodes every matching line lazily, leaving error handling to the caller.
    pub fn records<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = CoreResult<SampleRow>> + 'a {
        self.matching_lines(text)
            .map(move |(line_number, line)| self.schema.decode(line_number, line))
    }

    pub fn extract(&self, text: &str) -> CoreResult<ExtractionReport> {
        self.schema.validate()?;
        if self.marker.is_empty() {
            return Err(CoreError::InvalidConfig("marker must not be empty".into()));
        }

        let mut report = ExtractionReport::default();
        for record in self.records(text) {
            report.lines_matched += 1;
            match record {
                Ok(row) => report.rows.push(row),
                Err(err) => match self.policy {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Skip => {
                        warn!("skipping telemetry record: {}", err);
                        report.rejected.push(err);
                    }
                },
            }
        }

        debug!(
            "extracted {} rows from {} `{}` lines ({} rejected)",
            report.rows.len(),
            report.lines_matched,
            self.marker,
            report.rejected.len()
        );
        Ok(report)
    }
}

impl Default for TelemetryExtractor {
    fn default() -> Self {
        Self::scaled_pressure()
    }
}

impl Stage for TelemetryExtractor {
    type Input = str;
    type Output = ExtractionReport;

    fn name(&self) -> &'static str {
        "telemetry-extractor"
    }

    fn execute(&self, input: &str) -> CoreResult<ExtractionReport> {
        self.extract(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(timestamp: &str, temp: &str) -> String {
        let mut columns: Vec<String> = (0..22).map(|i| format!("{}", i)).collect();
        columns[0] = timestamp.to_string();
        columns[1] = SCALED_PRESSURE_MARKER.to_string();
        columns[13] = "1005.0".to_string();
        columns[15] = "0.5".to_string();
        columns[17] = temp.to_string();
        columns.join(",")
    }

    fn sample_log() -> String {
        [
            "2021-01-01T00:00:00,mavlink_heartbeat_t,type,1,autopilot,3".to_string(),
            line("2021-01-01T00:00:01", "25.0"),
            "2021-01-01T00:00:01,mavlink_gps_raw_int_t,lat,137000000".to_string(),
            line("2021-01-01T00:00:02", "24.5"),
        ]
        .join("\n")
    }

    #[test]
    fn extracts_only_marker_lines_in_order() {
        let report = TelemetryExtractor::scaled_pressure()
            .extract(&sample_log())
            .unwrap();
        assert_eq!(report.lines_matched, 2);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].temperature, 25.0);
        assert_eq!(report.rows[1].temperature, 24.5);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let extractor = TelemetryExtractor::scaled_pressure();
        assert!(extractor.extract("").unwrap().rows.is_empty());
        let unrelated = "2021-01-01T00:00:00,mavlink_heartbeat_t,1,2";
        assert!(extractor.extract(unrelated).unwrap().rows.is_empty());
    }

    #[test]
    fn short_marker_line_is_malformed() {
        let log = format!(
            "{}\n2021-01-01T00:00:03,{},1,2,3,4,5,6,7,8",
            line("2021-01-01T00:00:02", "24.5"),
            SCALED_PRESSURE_MARKER
        );
        let err = TelemetryExtractor::scaled_pressure()
            .extract(&log)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedRecord {
                line: 2,
                fields: 10,
                required: 18
            }
        );
    }

    #[test]
    fn skip_policy_collects_rejections() {
        let log = format!(
            "{}\n{}\n{}",
            line("2021-01-01T00:00:01", "25.0"),
            line("not-a-date", "24.0"),
            line("2021-01-01T00:00:03", "23.5"),
        );
        let report = TelemetryExtractor::scaled_pressure()
            .with_policy(ErrorPolicy::Skip)
            .extract(&log)
            .unwrap();
        assert_eq!(report.lines_matched, 3);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert!(matches!(
            report.rejected[0],
            CoreError::FieldParse { line: 2, .. }
        ));
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let log = format!(
            "{}\r\n{}\r\n",
            line("2021-01-01T00:00:01", "25.0"),
            line("2021-01-01T00:00:02", "26.0")
        );
        let report = TelemetryExtractor::scaled_pressure().extract(&log).unwrap();
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn stage_execute_matches_extract() {
        let extractor = TelemetryExtractor::scaled_pressure();
        let log = sample_log();
        assert_eq!(extractor.name(), "telemetry-extractor");
        assert_eq!(
            extractor.execute(&log).unwrap(),
            extractor.extract(&log).unwrap()
        );
    }

    #[test]
    fn empty_marker_is_rejected() {
        let err = TelemetryExtractor::new("").extract("anything").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }
}
