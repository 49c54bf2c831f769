use crate::model::series::{BinnedSeries, RateOfChangeSeries};
use serde::{Deserialize, Serialize};

/// Location of the steepest negative rate of change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InversionFinding {
    pub bin_index: usize,
    pub altitude: f64,
    pub rate: f64,
    pub threshold: f64,
    pub layer_found: bool,
    /// Inclusive bin range highlighted around `bin_index`.
    pub window_start: usize,
    pub window_end: usize,
}

/// Everything the estimator derives from one batch of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InversionEstimate {
    pub binned: BinnedSeries,
    pub rate_of_change: RateOfChangeSeries,
    /// `None` when the rate-of-change series is empty.
    pub finding: Option<InversionFinding>,
}

impl InversionEstimate {
    pub fn layer_found(&self) -> bool {
        self.finding.map(|f| f.layer_found).unwrap_or(false)
    }

    pub fn status_message(&self) -> String {
        match self.finding {
            Some(finding) if finding.layer_found => format!(
                "Suspect inversion layer around {:.1} meters",
                finding.altitude
            ),
            _ => "No inversion layer found".to_string(),
        }
    }
}
