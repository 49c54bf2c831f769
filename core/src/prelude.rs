use serde::{Deserialize, Serialize};

/// Width of one altitude bin, in meters.
pub const DEFAULT_BIN_WIDTH: f64 = 1.0;
/// Number of bins between the two endpoints of the backward difference.
pub const DEFAULT_LAG: usize = 5;
/// Rate of change (°C per meter) below which a layer is reported.
pub const DEFAULT_THRESHOLD: f64 = -0.1;
/// Bins highlighted on each side of the steepest point.
pub const DEFAULT_WINDOW_RADIUS: usize = 5;

/// Tunables for the inversion estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub bin_width: f64,
    pub lag: usize,
    pub threshold: f64,
    pub window_radius: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            bin_width: DEFAULT_BIN_WIDTH,
            lag: DEFAULT_LAG,
            threshold: DEFAULT_THRESHOLD,
            window_radius: DEFAULT_WINDOW_RADIUS,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.bin_width.is_finite() || self.bin_width <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "bin width must be positive, got {}",
                self.bin_width
            )));
        }
        if self.lag == 0 {
            return Err(CoreError::InvalidConfig("lag must be at least 1".into()));
        }
        if !self.threshold.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Common error type for the extraction and estimation stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("line {line}: expected at least {required} fields, found {fields}")]
    MalformedRecord {
        line: usize,
        fields: usize,
        required: usize,
    },
    #[error("line {line}: cannot parse field `{field}` from {raw:?}")]
    FieldParse {
        line: usize,
        field: String,
        raw: String,
    },
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed payload: {0}")]
    Payload(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// A pure transformation from borrowed tabular input to an owned result.
///
/// Stages hold configuration only, so one instance may be shared across
/// threads and invoked on unrelated inputs concurrently.
pub trait Stage: Send + Sync {
    type Input: ?Sized;
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&self, input: &Self::Input) -> CoreResult<Self::Output>;
}
