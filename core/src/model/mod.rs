pub mod finding;
pub mod sample;
pub mod series;

pub use finding::{InversionEstimate, InversionFinding};
pub use sample::{parse_timestamp, SampleRow};
pub use series::{AltitudeBin, BinnedSeries, RateOfChangeSeries, RatePoint};
