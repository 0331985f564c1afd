/// Exponential Moving Average.
///
/// Seeded with the SMA of the first `period` values, then
/// `EMA[i] = x[i] * k + EMA[i-1] * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    pub period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// EMA aligned to `values`: index `i` is `None` until `period` values
    /// have been seen.
    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.period {
            return out;
        }

        let k = 2.0 / (self.period as f64 + 1.0);
        let mut ema = values[..self.period].iter().sum::<f64>() / self.period as f64;
        out[self.period - 1] = Some(ema);

        for (i, &value) in values.iter().enumerate().skip(self.period) {
            ema = value * k + ema * (1.0 - k);
            out[i] = Some(ema);
        }
        out
    }

    /// EMA at the last value, or `None` with fewer than `period` values.
    pub fn latest(&self, values: &[f64]) -> Option<f64> {
        self.series(values).last().copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn undefined_before_period_values() {
        let series = Ema::new(3).series(&[1.0, 2.0]);
        assert_eq!(series, vec![None, None]);
        assert!(Ema::new(3).latest(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn seeded_with_sma() {
        let series = Ema::new(3).series(&[10.0, 20.0, 30.0]);
        assert!(series[0].is_none() && series[1].is_none());
        assert_relative_eq!(series[2].unwrap(), 20.0);
    }

    #[test]
    fn recurrence_after_seed() {
        // k = 0.5 for period 3
        let series = Ema::new(3).series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_relative_eq!(series[3].unwrap(), 30.0);
        assert_relative_eq!(series[4].unwrap(), 40.0);
    }

    #[test]
    fn constant_input_stays_constant() {
        let values = vec![42.0; 50];
        let latest = Ema::new(10).latest(&values).unwrap();
        assert_relative_eq!(latest, 42.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_period_is_never_defined() {
        assert!(Ema::new(0).latest(&[1.0, 2.0, 3.0]).is_none());
    }
}
