/// RSI (Relative Strength Index) indicator.
///
/// Uses Wilder's smoothed moving average (same as TradingView / standard RSI).
/// Returns `None` until at least `period + 1` closed price values are available.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    pub period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Compute RSI at the last close (oldest first).
    /// Returns `None` if there are fewer than `period + 1` values.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if self.period == 0 || closes.len() < self.period + 1 {
            return None;
        }

        // First average gain/loss over the initial `period` changes
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let initial = &changes[..self.period];
        let period = self.period as f64;

        let mut avg_gain = initial.iter().filter(|&&c| c > 0.0).sum::<f64>() / period;
        let mut avg_loss = initial.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>() / period;

        // Wilder smoothing over remaining changes
        for &change in &changes[self.period..] {
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            avg_gain = (avg_gain * (period - 1.0) + gain) / period;
            avg_loss = (avg_loss * (period - 1.0) + loss) / period;
        }

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rsi_returns_none_when_insufficient_data() {
        // Need at least period+1 = 15 values
        let prices = vec![100.0; 14];
        assert!(Rsi::new(14).compute(&prices).is_none());
    }

    #[test]
    fn rsi_returns_some_with_exactly_period_plus_one() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(Rsi::new(14).compute(&prices).is_some());
    }

    #[test]
    fn rsi_all_gains_returns_100() {
        let value = Rsi::new(3).compute(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
        assert_relative_eq!(value, 100.0);
    }

    #[test]
    fn rsi_all_losses_returns_0() {
        let value = Rsi::new(3).compute(&[14.0, 13.0, 12.0, 11.0, 10.0]).unwrap();
        assert_relative_eq!(value, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_flat_series_returns_100() {
        // No losses at all: the denominator case resolves to 100.
        let value = Rsi::new(14).compute(&[250.0; 40]).unwrap();
        assert_relative_eq!(value, 100.0);
    }

    #[test]
    fn rsi_seed_only_matches_hand_computation() {
        // changes: +2, -1, +1 → avg_gain = 1.0, avg_loss = 1/3, RS = 3
        let value = Rsi::new(3).compute(&[10.0, 12.0, 11.0, 12.0]).unwrap();
        assert_relative_eq!(value, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_wilder_step_matches_hand_computation() {
        // seed as above, then change -2:
        // avg_gain = (1.0*2 + 0)/3 = 2/3, avg_loss = (1/3*2 + 2)/3 = 8/9
        // RS = 0.75 → RSI = 100 - 100/1.75
        let value = Rsi::new(3).compute(&[10.0, 12.0, 11.0, 12.0, 10.0]).unwrap();
        assert_relative_eq!(value, 100.0 - 100.0 / 1.75, epsilon = 1e-9);
    }

    #[test]
    fn rsi_known_series_stays_in_range() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
            45.15, 44.34, 44.09,
        ];
        let v = Rsi::new(14).compute(&prices).unwrap();
        assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
    }
}
