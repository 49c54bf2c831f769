use crate::extract::ExtractionReport;
use crate::model::InversionEstimate;
use serde::Serialize;
use std::sync::Mutex;

/// Counters shared by callers that run the stages on many inputs, possibly
/// from several threads.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines_matched: usize,
    pub rows_parsed: usize,
    pub rows_rejected: usize,
    pub estimates: usize,
    pub layers_found: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_extraction(&self, report: &ExtractionReport) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.lines_matched += report.lines_matched;
            metrics.rows_parsed += report.rows.len();
            metrics.rows_rejected += report.rejected.len();
        }
    }

    pub fn record_estimate(&self, estimate: &InversionEstimate) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.estimates += 1;
            if estimate.layer_found() {
                metrics.layers_found += 1;
            }
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
