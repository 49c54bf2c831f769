pub mod altitude;
pub mod binning;
pub mod gradient;
pub mod inversion;

pub use altitude::{with_pressure_altitude, AltitudeReference};
pub use binning::bin_samples;
pub use gradient::rate_of_change;
pub use inversion::InversionEstimator;
