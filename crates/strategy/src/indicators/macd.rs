use super::ema::Ema;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal_period),
/// Histogram = MACD line − Signal.
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// MACD values at the last close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }

    /// Minimum number of closes for a defined value at the last index.
    pub fn min_len(&self) -> usize {
        self.fast.max(self.slow) + self.signal.saturating_sub(1)
    }

    /// Compute MACD at the last close (oldest first).
    /// Returns `None` if there isn't enough data.
    pub fn compute(&self, closes: &[f64]) -> Option<MacdValue> {
        if self.fast == 0 || self.slow == 0 || self.signal == 0 {
            return None;
        }

        let fast = Ema::new(self.fast).series(closes);
        let slow = Ema::new(self.slow).series(closes);

        // The signal EMA runs over the MACD line from its first defined value.
        let macd_line: Vec<f64> = fast
            .iter()
            .zip(&slow)
            .filter_map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        let signal = Ema::new(self.signal).latest(&macd_line)?;
        let macd = *macd_line.last()?;

        Some(MacdValue {
            macd,
            signal,
            histogram: macd - signal,
        })
    }

    pub fn histogram(&self, closes: &[f64]) -> Option<f64> {
        self.compute(closes).map(|v| v.histogram)
    }
}
