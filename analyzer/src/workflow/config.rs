use anyhow::Context;
use pollucore::airquality::{Pollutant, DEFAULT_ENDPOINT, DEFAULT_STATION};
use pollucore::extract::{ErrorPolicy, LineSchema, TelemetryExtractor, SCALED_PRESSURE_MARKER};
use pollucore::prelude::EstimatorConfig;
use pollucore::processing::{AltitudeReference, InversionEstimator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub marker: String,
    pub on_error: ErrorPolicy,
    pub schema: LineSchema,
    pub estimator: EstimatorConfig,
    pub altitude_reference: AltitudeReference,
    pub station_id: String,
    pub pollutant: Pollutant,
    pub endpoint: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            marker: SCALED_PRESSURE_MARKER.to_string(),
            on_error: ErrorPolicy::Abort,
            schema: LineSchema::scaled_pressure(),
            estimator: EstimatorConfig::default(),
            altitude_reference: AltitudeReference::Launch,
            station_id: DEFAULT_STATION.to_string(),
            pollutant: Pollutant::Pm25,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .estimator
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        config
            .schema
            .validate()
            .with_context(|| format!("validating line schema in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        marker: &str,
        threshold: f64,
        skip_malformed: bool,
        pollutant: Pollutant,
    ) -> Self {
        Self {
            marker: marker.to_string(),
            on_error: if skip_malformed {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            },
            estimator: EstimatorConfig {
                threshold,
                ..Default::default()
            },
            pollutant,
            ..Default::default()
        }
    }

    pub fn extractor(&self) -> TelemetryExtractor {
        TelemetryExtractor::new(self.marker.clone())
            .with_schema(self.schema.clone())
            .with_policy(self.on_error)
    }

    pub fn estimator(&self) -> InversionEstimator {
        InversionEstimator::new(self.estimator)
    }
}
