//! International Standard Atmosphere helpers for turning barometer readings
//! into altitude.

/// Mean sea-level pressure, hPa.
pub const STANDARD_SEA_LEVEL_HPA: f64 = 1013.25;

const ISA_SCALE_M: f64 = 44_330.0;
const ISA_EXPONENT: f64 = 1.0 / 5.255;

/// Altitude in meters above the reference level for a static pressure.
///
/// Both pressures are in the same unit. Returns `None` for non-positive or
/// non-finite inputs.
pub fn pressure_altitude(pressure: f64, reference: f64) -> Option<f64> {
    if !pressure.is_finite() || !reference.is_finite() || pressure <= 0.0 || reference <= 0.0 {
        return None;
    }
    Some(ISA_SCALE_M * (1.0 - (pressure / reference).powf(ISA_EXPONENT)))
}
