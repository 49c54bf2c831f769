use crate::model::series::{BinnedSeries, RateOfChangeSeries, RatePoint};

/// Lagged backward difference of temperature over altitude, negated so that
/// a normal lapse (cooling with height) is positive:
///
/// `roc[i] = -(temp[i] - temp[i - lag]) / (alt[i] - alt[i - lag])`
///
/// Only bins where both endpoints are defined produce a point. Fewer than
/// `lag + 1` populated bins yields an empty series.
pub fn rate_of_change(binned: &BinnedSeries, lag: usize) -> RateOfChangeSeries {
    if lag == 0 || binned.populated_count() < lag + 1 {
        return RateOfChangeSeries::empty(lag);
    }

    let points = (lag..binned.len())
        .filter_map(|i| {
            let (alt_hi, temp_hi) = binned.bins[i].profile_point()?;
            let (alt_lo, temp_lo) = binned.bins[i - lag].profile_point()?;
            let run = alt_hi - alt_lo;
            if run == 0.0 {
                return None;
            }
            let rate = -(temp_hi - temp_lo) / run;
            rate.is_finite().then_some(RatePoint {
                index: i,
                altitude: alt_hi,
                rate,
            })
        })
        .collect();

    RateOfChangeSeries { lag, points }
}
