pub mod atmosphere;
pub mod stats;

pub use atmosphere::{pressure_altitude, STANDARD_SEA_LEVEL_HPA};
pub use stats::StatsHelper;
