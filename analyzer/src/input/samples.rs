use anyhow::Context;
use pollucore::model::{parse_timestamp, SampleRow};
use pollucore::prelude::CoreError;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column layout of a balloon sample export. Header names from the field
/// logger are accepted as aliases.
#[derive(Debug, Deserialize)]
struct CsvSample {
    #[serde(alias = "datetime", alias = "dateTime")]
    timestamp: String,
    #[serde(default)]
    altitude: Option<f64>,
    temperature: f64,
    #[serde(default, alias = "press_abs")]
    pressure_absolute: Option<f64>,
    #[serde(default, alias = "press_diff")]
    pressure_differential: Option<f64>,
}

pub fn read_samples<R: Read>(reader: R) -> anyhow::Result<Vec<SampleRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (idx, record) in csv_reader.deserialize::<CsvSample>().enumerate() {
        // Header occupies line 1.
        let line = idx + 2;
        let sample = record.with_context(|| format!("decoding sample row on line {}", line))?;
        let timestamp = parse_timestamp(&sample.timestamp).ok_or_else(|| CoreError::FieldParse {
            line,
            field: "timestamp".into(),
            raw: sample.timestamp.clone(),
        })?;
        rows.push(SampleRow {
            timestamp,
            altitude: sample.altitude,
            temperature: sample.temperature,
            pressure_absolute: sample.pressure_absolute,
            pressure_differential: sample.pressure_differential,
        });
    }

    Ok(rows)
}

pub fn load_samples<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SampleRow>> {
    let path_ref = path.as_ref();
    let file =
        File::open(path_ref).with_context(|| format!("opening samples {}", path_ref.display()))?;
    read_samples(file).with_context(|| format!("reading samples {}", path_ref.display()))
}
