pub struct StatsHelper;

impl StatsHelper {
    /// Position of the smallest value. Ties resolve to the earliest position;
    /// NaN entries never win.
    pub fn argmin(samples: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &value) in samples.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((_, current)) if value >= current => {}
                _ => best = Some((idx, value)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Largest finite value, or `None` when there is none.
    pub fn finite_max(samples: &[f64]) -> Option<f64> {
        samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                Some(current) if current >= v => Some(current),
                _ => Some(v),
            })
    }
}
