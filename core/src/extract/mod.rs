pub mod extractor;
pub mod schema;

pub use extractor::{ErrorPolicy, ExtractionReport, TelemetryExtractor, SCALED_PRESSURE_MARKER};
pub use schema::{FieldKind, FieldSpec, LineSchema, SampleField};
