use crate::math::stats::StatsHelper;
use crate::model::sample::SampleRow;
use crate::model::series::{AltitudeBin, BinnedSeries};
use crate::prelude::{CoreError, CoreResult};
use log::debug;

/// Upper bound on the number of bins one profile may span.
pub const MAX_BINS: usize = 1_000_000;

#[derive(Default, Clone)]
struct BinAccumulator {
    count: usize,
    altitude: f64,
    temperature: f64,
    pressure_absolute: (f64, usize),
    pressure_differential: (f64, usize),
}

impl BinAccumulator {
    fn push(&mut self, altitude: f64, row: &SampleRow) {
        self.count += 1;
        self.altitude += altitude;
        self.temperature += row.temperature;
        if let Some(p) = row.pressure_absolute.filter(|p| p.is_finite()) {
            self.pressure_absolute.0 += p;
            self.pressure_absolute.1 += 1;
        }
        if let Some(p) = row.pressure_differential.filter(|p| p.is_finite()) {
            self.pressure_differential.0 += p;
            self.pressure_differential.1 += 1;
        }
    }

    fn finish(self, index: usize) -> AltitudeBin {
        if self.count == 0 {
            return AltitudeBin::empty(index);
        }
        let n = self.count as f64;
        let mean = |(sum, count): (f64, usize)| (count > 0).then(|| sum / count as f64);
        AltitudeBin {
            index,
            count: self.count,
            altitude: Some(self.altitude / n),
            temperature: Some(self.temperature / n),
            pressure_absolute: mean(self.pressure_absolute),
            pressure_differential: mean(self.pressure_differential),
        }
    }
}

/// Averages rows into `[k * width, (k + 1) * width)` altitude bins.
///
/// Bins run from 0 up to the bin holding the highest altitude. Rows without
/// an altitude, below zero, or with a non-finite temperature are left out,
/// and bins that receive nothing stay undefined.
pub fn bin_samples(rows: &[SampleRow], bin_width: f64) -> CoreResult<BinnedSeries> {
    if rows.is_empty() {
        return Err(CoreError::InsufficientData("no samples supplied".into()));
    }
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(CoreError::InvalidConfig(format!(
            "bin width must be positive, got {}",
            bin_width
        )));
    }

    let altitudes: Vec<f64> = rows
        .iter()
        .filter(|row| row.temperature.is_finite())
        .filter_map(|row| row.altitude)
        .collect();
    if altitudes.iter().any(|alt| *alt == f64::INFINITY) {
        return Err(CoreError::InsufficientData("maximum altitude is inf".into()));
    }
    let max_altitude = StatsHelper::finite_max(&altitudes).ok_or_else(|| {
        CoreError::InsufficientData("no samples with a finite altitude".into())
    })?;
    if max_altitude < 0.0 {
        return Err(CoreError::InsufficientData(
            "no samples at or above zero altitude".into(),
        ));
    }

    let top_bin = (max_altitude / bin_width).floor();
    let bin_count = if top_bin < MAX_BINS as f64 {
        (top_bin as usize).checked_add(1)
    } else {
        None
    }
    .filter(|count| *count <= MAX_BINS)
    .ok_or_else(|| {
        CoreError::InsufficientData(format!(
            "altitude {} spans more than {} bins of width {}",
            max_altitude, MAX_BINS, bin_width
        ))
    })?;
    let mut accumulators = vec![BinAccumulator::default(); bin_count];
    let mut discarded = 0usize;

    for row in rows {
        let altitude = match row.altitude {
            Some(alt) if alt.is_finite() && alt >= 0.0 && row.temperature.is_finite() => alt,
            _ => {
                discarded += 1;
                continue;
            }
        };
        let index = ((altitude / bin_width).floor() as usize).min(bin_count - 1);
        accumulators[index].push(altitude, row);
    }

    if discarded > 0 {
        debug!("binning discarded {} of {} rows", discarded, rows.len());
    }

    Ok(BinnedSeries {
        bin_width,
        bins: accumulators
            .into_iter()
            .enumerate()
            .map(|(index, acc)| acc.finish(index))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(altitude: f64, temperature: f64) -> SampleRow {
        let ts = NaiveDate::from_ymd_opt(2019, 11, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        SampleRow::new(ts, altitude, temperature)
    }

    #[test]
    fn bins_cover_zero_to_floor_of_max() {
        let rows = vec![row(0.2, 20.0), row(3.7, 18.0), row(7.9, 15.0)];
        let binned = bin_samples(&rows, 1.0).unwrap();
        assert_eq!(binned.len(), 8);
        for (expected, bin) in binned.bins.iter().enumerate() {
            assert_eq!(bin.index, expected);
        }
    }

    #[test]
    fn empty_bins_stay_undefined() {
        let rows = vec![row(0.5, 20.0), row(4.5, 19.0)];
        let binned = bin_samples(&rows, 1.0).unwrap();
        assert_eq!(binned.populated_count(), 2);
        for idx in 1..4 {
            let bin = binned.get(idx).unwrap();
            assert!(!bin.is_populated());
            assert_eq!(bin.temperature, None);
            assert_eq!(bin.altitude, None);
        }
    }

    #[test]
    fn bins_average_every_column() {
        let rows = vec![
            row(2.2, 10.0).with_pressures(Some(1000.0), Some(0.2)),
            row(2.8, 12.0).with_pressures(Some(1002.0), None),
        ];
        let bin = bin_samples(&rows, 1.0).unwrap().bins[2].clone();
        assert_eq!(bin.count, 2);
        assert!((bin.altitude.unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(bin.temperature, Some(11.0));
        assert_eq!(bin.pressure_absolute, Some(1001.0));
        assert_eq!(bin.pressure_differential, Some(0.2));
    }

    #[test]
    fn rows_without_altitude_or_below_ground_are_ignored() {
        let mut no_alt = row(0.0, 30.0);
        no_alt.altitude = None;
        let rows = vec![no_alt, row(-3.0, 40.0), row(1.5, 20.0)];
        let binned = bin_samples(&rows, 1.0).unwrap();
        assert_eq!(binned.len(), 2);
        assert!(!binned.bins[0].is_populated());
        assert_eq!(binned.bins[1].temperature, Some(20.0));
    }

    #[test]
    fn wider_bins_group_more_samples() {
        let rows = vec![row(0.5, 20.0), row(9.5, 10.0), row(12.0, 9.0)];
        let binned = bin_samples(&rows, 10.0).unwrap();
        assert_eq!(binned.len(), 2);
        assert_eq!(binned.bins[0].temperature, Some(15.0));
    }

    #[test]
    fn nan_temperature_rows_do_not_extend_the_range() {
        let rows = vec![row(0.5, 20.0), row(2.5, 19.0), row(9.5, f64::NAN)];
        let binned = bin_samples(&rows, 1.0).unwrap();
        assert_eq!(binned.len(), 3);
    }

    #[test]
    fn oversized_altitude_span_is_rejected() {
        for altitude in [1e20, f64::MAX, MAX_BINS as f64] {
            let err = bin_samples(&[row(0.0, 20.0), row(altitude, 19.0)], 1.0).unwrap_err();
            assert!(matches!(err, CoreError::InsufficientData(_)));
        }
        let tiny_width = bin_samples(&[row(0.0, 20.0), row(10.0, 19.0)], 1e-12).unwrap_err();
        assert!(matches!(tiny_width, CoreError::InsufficientData(_)));

        let stratosphere = bin_samples(&[row(0.0, 20.0), row(40_000.5, -50.0)], 1.0).unwrap();
        assert_eq!(stratosphere.len(), 40_001);
    }

    #[test]
    fn degenerate_inputs_are_insufficient() {
        assert!(matches!(
            bin_samples(&[], 1.0),
            Err(CoreError::InsufficientData(_))
        ));

        let mut no_alt = row(0.0, 20.0);
        no_alt.altitude = None;
        assert!(matches!(
            bin_samples(&[no_alt], 1.0),
            Err(CoreError::InsufficientData(_))
        ));

        assert!(matches!(
            bin_samples(&[row(f64::INFINITY, 20.0)], 1.0),
            Err(CoreError::InsufficientData(_))
        ));

        assert!(matches!(
            bin_samples(&[row(-10.0, 20.0)], 1.0),
            Err(CoreError::InsufficientData(_))
        ));
    }
}
