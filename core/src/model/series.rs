use serde::{Deserialize, Serialize};

/// Per-bin means. Every mean is `None` when no sample landed in the bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudeBin {
    pub index: usize,
    pub count: usize,
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub pressure_absolute: Option<f64>,
    pub pressure_differential: Option<f64>,
}

impl AltitudeBin {
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            count: 0,
            altitude: None,
            temperature: None,
            pressure_absolute: None,
            pressure_differential: None,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.count > 0
    }

    /// Mean altitude and temperature, when both are defined.
    pub fn profile_point(&self) -> Option<(f64, f64)> {
        match (self.altitude, self.temperature) {
            (Some(alt), Some(temp)) => Some((alt, temp)),
            _ => None,
        }
    }
}

/// Samples averaged into fixed-width altitude bins, indexed from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSeries {
    pub bin_width: f64,
    pub bins: Vec<AltitudeBin>,
}

impl BinnedSeries {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AltitudeBin> {
        self.bins.get(index)
    }

    pub fn populated_count(&self) -> usize {
        self.bins.iter().filter(|bin| bin.is_populated()).count()
    }

    /// `(altitude, temperature)` pairs for charting; gaps are skipped.
    pub fn temperature_profile(&self) -> Vec<(f64, f64)> {
        self.bins
            .iter()
            .filter_map(AltitudeBin::profile_point)
            .collect()
    }
}

/// A defined entry of the rate-of-change series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Bin index of the upper endpoint of the difference.
    pub index: usize,
    /// Mean altitude of that bin, in meters.
    pub altitude: f64,
    /// Negated temperature slope, °C per meter.
    pub rate: f64,
}

/// Sparse lagged difference aligned to the source bin indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOfChangeSeries {
    pub lag: usize,
    pub points: Vec<RatePoint>,
}

impl RateOfChangeSeries {
    pub fn empty(lag: usize) -> Self {
        Self {
            lag,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.index == index)
            .map(|point| point.rate)
    }

    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.rate).collect()
    }

    /// `(altitude, rate)` pairs for charting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|point| (point.altitude, point.rate))
            .collect()
    }
}
