/// Simple Moving Average (SMA)
/// Calculates the arithmetic mean of the last N values
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate SMA for a series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup period)
    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; values.len()];

        if self.period == 0 || values.len() < self.period {
            return result;
        }

        for i in (self.period - 1)..values.len() {
            let window_start = i + 1 - self.period;
            let window = &values[window_start..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

/// Exponential Moving Average (EMA)
/// Gives more weight to recent prices using exponential smoothing
pub struct EMA {
    span: usize,
}

impl EMA {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    /// Smoothing factor (alpha) for EMA calculation
    /// alpha = 2 / (span + 1)
    fn smoothing_factor(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }

    /// Calculate EMA for a series
    /// Returns a vector of the same length as input with every entry defined.
    /// Seeded with the first value, so there is no warmup gap:
    /// EMA(0) = x(0), EMA(t) = alpha * x(t) + (1 - alpha) * EMA(t-1)
    pub fn calculate(&self, values: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(values.len());

        let Some(&first) = values.first() else {
            return result;
        };

        let alpha = self.smoothing_factor();
        let mut prev = first;
        result.push(prev);

        // prev + alpha * (x - prev) is the same recurrence, but stays exact on flat input
        for &value in &values[1..] {
            prev += alpha * (value - prev);
            result.push(prev);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_basic() {
        let prices = vec![100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0];
        let sma = SMA::new(3);
        let result = sma.calculate(&prices);

        assert_eq!(result.len(), prices.len());
        assert!(result[0].is_none());
        assert!(result[1].is_none());

        // (100 + 102 + 101) / 3 = 101.0
        assert!((result[2].unwrap() - 101.0).abs() < 0.001);
        // (102 + 101 + 103) / 3 = 102.0
        assert!((result[3].unwrap() - 102.0).abs() < 0.001);
        // (101 + 103 + 105) / 3 = 103.0
        assert!((result[4].unwrap() - 103.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let prices = vec![100.0, 102.0];
        let result = SMA::new(3).calculate(&prices);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_zero_period() {
        let result = SMA::new(0).calculate(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let prices = vec![100.0, 102.0, 101.0, 103.0, 105.0];
        let ema = EMA::new(3);
        let result = ema.calculate(&prices);

        assert_eq!(result.len(), prices.len());
        assert_eq!(result[0], 100.0);

        // alpha = 2 / (3 + 1) = 0.5
        // 102 * 0.5 + 100 * 0.5 = 101.0
        assert!((result[1] - 101.0).abs() < 1e-9);
        // 101 * 0.5 + 101 * 0.5 = 101.0
        assert!((result[2] - 101.0).abs() < 1e-9);
        // 103 * 0.5 + 101 * 0.5 = 102.0
        assert!((result[3] - 102.0).abs() < 1e-9);
        // 105 * 0.5 + 102 * 0.5 = 103.5
        assert!((result[4] - 103.5).abs() < 1e-9);
    }

    #[test]
    fn test_ema_length_matches_input() {
        for len in [0usize, 1, 2, 50, 251] {
            let prices: Vec<f64> = (0..len).map(|i| 50.0 + (i as f64).sin()).collect();
            let result = EMA::new(12).calculate(&prices);
            assert_eq!(result.len(), len);
            if let Some(first) = prices.first() {
                assert_eq!(result[0], *first);
            }
        }
    }

    #[test]
    fn test_ema_flat_series_is_exact() {
        let prices = vec![100.0; 300];
        let result = EMA::new(200).calculate(&prices);
        assert!(result.iter().all(|v| *v == 100.0));
    }

    #[test]
    fn test_ema_smoothing_factor() {
        let k = EMA::new(12).smoothing_factor();
        assert!((k - 2.0 / 13.0).abs() < 0.0001);

        let k26 = EMA::new(26).smoothing_factor();
        assert!((k26 - 2.0 / 27.0).abs() < 0.0001);
    }
}
