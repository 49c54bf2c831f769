//! Transformation core for the PolluSmartCell balloon dashboards.
//!
//! Two independent stages live here: a telemetry line extractor that decodes
//! one message type out of a raw flight log, and an inversion estimator that
//! bins samples by altitude and looks for a temperature inversion. Everything
//! is synchronous and side-effect free; file, database and network access
//! belong to the caller.

pub mod airquality;
pub mod diagnostics;
pub mod extract;
pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;

pub use prelude::{CoreError, CoreResult, EstimatorConfig, Stage};
