use crate::math::stats::StatsHelper;
use crate::model::finding::{InversionEstimate, InversionFinding};
use crate::model::sample::SampleRow;
use crate::model::series::{BinnedSeries, RateOfChangeSeries};
use crate::prelude::{CoreResult, EstimatorConfig, Stage};
use crate::processing::binning::bin_samples;
use crate::processing::gradient::rate_of_change;
use log::{debug, info};

/// Bins a flight profile and locates the steepest temperature increase.
#[derive(Debug, Clone, Default)]
pub struct InversionEstimator {
    config: EstimatorConfig,
}

impl InversionEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate(&self, rows: &[SampleRow]) -> CoreResult<InversionEstimate> {
        self.config.validate()?;

        let binned = bin_samples(rows, self.config.bin_width)?;
        let rate_of_change = rate_of_change(&binned, self.config.lag);
        let finding = self.locate(&binned, &rate_of_change);

        debug!(
            "binned {} rows into {} bins ({} populated), {} rate points",
            rows.len(),
            binned.len(),
            binned.populated_count(),
            rate_of_change.len()
        );
        if let Some(finding) = finding.filter(|f| f.layer_found) {
            info!(
                "inversion candidate at bin {} ({:.1} m), rate {:.3} °C/m",
                finding.bin_index, finding.altitude, finding.rate
            );
        }

        Ok(InversionEstimate {
            binned,
            rate_of_change,
            finding,
        })
    }

    /// Picks the minimum rate (earliest bin on ties) and its highlight window.
    pub fn locate(
        &self,
        binned: &BinnedSeries,
        rate_of_change: &RateOfChangeSeries,
    ) -> Option<InversionFinding> {
        let rates = rate_of_change.rates();
        let point = rate_of_change.points[StatsHelper::argmin(&rates)?];

        let last_bin = binned.len().saturating_sub(1);
        let radius = self.config.window_radius;
        Some(InversionFinding {
            bin_index: point.index,
            altitude: point.altitude,
            rate: point.rate,
            threshold: self.config.threshold,
            layer_found: point.rate < self.config.threshold,
            window_start: point.index.saturating_sub(radius),
            window_end: point.index.saturating_add(radius).min(last_bin),
        })
    }
}

impl Stage for InversionEstimator {
    type Input = [SampleRow];
    type Output = InversionEstimate;

    fn name(&self) -> &'static str {
        "inversion-estimator"
    }

    fn execute(&self, input: &[SampleRow]) -> CoreResult<InversionEstimate> {
        self.estimate(input)
    }
}
