use crate::math::atmosphere::{pressure_altitude, STANDARD_SEA_LEVEL_HPA};
use crate::model::sample::SampleRow;
use crate::prelude::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Zero point for barometric altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "hpa")]
pub enum AltitudeReference {
    /// Height above the first row's absolute pressure.
    Launch,
    /// Height above a fixed sea-level pressure, hPa.
    SeaLevel(f64),
}

impl Default for AltitudeReference {
    fn default() -> Self {
        AltitudeReference::Launch
    }
}

impl AltitudeReference {
    pub fn standard() -> Self {
        AltitudeReference::SeaLevel(STANDARD_SEA_LEVEL_HPA)
    }
}

/// Fills missing altitudes from absolute pressure. Rows that already carry
/// an altitude, or lack a usable pressure, are returned unchanged.
pub fn with_pressure_altitude(
    rows: &[SampleRow],
    reference: AltitudeReference,
) -> CoreResult<Vec<SampleRow>> {
    let reference_hpa = match reference {
        AltitudeReference::SeaLevel(hpa) => hpa,
        AltitudeReference::Launch => rows
            .iter()
            .find_map(|row| row.pressure_absolute.filter(|p| p.is_finite() && *p > 0.0))
            .ok_or_else(|| {
                CoreError::InsufficientData("no absolute pressure to anchor launch altitude".into())
            })?,
    };
    if !reference_hpa.is_finite() || reference_hpa <= 0.0 {
        return Err(CoreError::InvalidConfig(format!(
            "reference pressure must be positive, got {}",
            reference_hpa
        )));
    }

    Ok(rows
        .iter()
        .map(|row| {
            if row.altitude.is_some() {
                return row.clone();
            }
            match row
                .pressure_absolute
                .and_then(|p| pressure_altitude(p, reference_hpa))
            {
                Some(altitude) => row.clone().with_altitude(altitude),
                None => row.clone(),
            }
        })
        .collect())
}
