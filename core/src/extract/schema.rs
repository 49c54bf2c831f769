//! Declarative layout of a delimited telemetry line.
//!
//! A schema is an ordered list of `(position, field)` pairs; each
//! [`SampleField`] carries its column name and value kind. Positions not
//! listed are ignored, so changing the log layout only touches the schema.

use crate::model::sample::{parse_timestamp, SampleRow};
use crate::prelude::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Timestamp,
    Float,
}

/// Sample-row column a positional field is projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleField {
    Timestamp,
    Altitude,
    Temperature,
    PressureAbsolute,
    PressureDifferential,
}

impl SampleField {
    pub fn name(self) -> &'static str {
        match self {
            SampleField::Timestamp => "datetime",
            SampleField::Altitude => "altitude",
            SampleField::Temperature => "temperature",
            SampleField::PressureAbsolute => "press_abs",
            SampleField::PressureDifferential => "press_diff",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SampleField::Timestamp => FieldKind::Timestamp,
            _ => FieldKind::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Zero-based column position after splitting.
    pub position: usize,
    pub field: SampleField,
}

impl FieldSpec {
    pub const fn new(position: usize, field: SampleField) -> Self {
        Self { position, field }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSchema {
    pub delimiter: char,
    pub fields: Vec<FieldSpec>,
}

impl Default for LineSchema {
    fn default() -> Self {
        Self::scaled_pressure()
    }
}

/// Parsed values for one line, keyed by the schema's fields.
#[derive(Default)]
struct DecodedFields {
    timestamp: Option<chrono::NaiveDateTime>,
    altitude: Option<f64>,
    temperature: Option<f64>,
    pressure_absolute: Option<f64>,
    pressure_differential: Option<f64>,
}

impl LineSchema {
    /// Layout of the 22-column `mavlink_scaled_pressure_t` export: the 1st,
    /// 14th, 16th and 18th columns hold the timestamp, absolute pressure,
    /// differential pressure and temperature.
    pub fn scaled_pressure() -> Self {
        Self {
            delimiter: ',',
            fields: vec![
                FieldSpec::new(0, SampleField::Timestamp),
                FieldSpec::new(13, SampleField::PressureAbsolute),
                FieldSpec::new(15, SampleField::PressureDifferential),
                FieldSpec::new(17, SampleField::Temperature),
            ],
        }
    }

    /// Minimum number of columns a line needs.
    pub fn required_fields(&self) -> usize {
        self.fields
            .iter()
            .map(|spec| spec.position + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> CoreResult<()> {
        for required in [SampleField::Timestamp, SampleField::Temperature] {
            if !self.fields.iter().any(|spec| spec.field == required) {
                return Err(CoreError::InvalidConfig(format!(
                    "schema has no `{}` column",
                    required.name()
                )));
            }
        }
        for (idx, spec) in self.fields.iter().enumerate() {
            if self.fields[..idx].iter().any(|prev| prev.field == spec.field) {
                return Err(CoreError::InvalidConfig(format!(
                    "schema maps `{}` more than once",
                    spec.field.name()
                )));
            }
        }
        Ok(())
    }

    /// Splits `line` positionally and projects the schema's columns.
    ///
    /// `line_number` is only used to annotate errors.
    pub fn decode(&self, line_number: usize, line: &str) -> CoreResult<SampleRow> {
        let columns: Vec<&str> = line.split(self.delimiter).collect();
        let required = self.required_fields();
        if columns.len() < required {
            return Err(CoreError::MalformedRecord {
                line: line_number,
                fields: columns.len(),
                required,
            });
        }

        let mut decoded = DecodedFields::default();
        for spec in &self.fields {
            let raw = columns[spec.position].trim();
            let parse_error = || CoreError::FieldParse {
                line: line_number,
                field: spec.field.name().to_string(),
                raw: raw.to_string(),
            };

            match spec.field.kind() {
                FieldKind::Timestamp => {
                    decoded.timestamp = Some(parse_timestamp(raw).ok_or_else(parse_error)?);
                }
                FieldKind::Float => {
                    let value = raw.parse::<f64>().map_err(|_| parse_error())?;
                    match spec.field {
                        SampleField::Altitude => decoded.altitude = Some(value),
                        SampleField::Temperature => decoded.temperature = Some(value),
                        SampleField::PressureAbsolute => decoded.pressure_absolute = Some(value),
                        SampleField::PressureDifferential => {
                            decoded.pressure_differential = Some(value)
                        }
                        SampleField::Timestamp => {}
                    }
                }
            }
        }

        let missing = |field: SampleField| {
            CoreError::InvalidConfig(format!("schema has no `{}` column", field.name()))
        };
        Ok(SampleRow {
            timestamp: decoded
                .timestamp
                .ok_or_else(|| missing(SampleField::Timestamp))?,
            altitude: decoded.altitude,
            temperature: decoded
                .temperature
                .ok_or_else(|| missing(SampleField::Temperature))?,
            pressure_absolute: decoded.pressure_absolute,
            pressure_differential: decoded.pressure_differential,
        })
    }
}
