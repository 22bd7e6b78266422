use super::moving_averages::SMA;

/// Relative Strength Index (RSI)
/// Measures momentum by comparing magnitude of recent gains to recent losses
/// Returns values between 0-100:
/// - Below 30: Oversold (potentially undervalued)
/// - Above 70: Overbought (potentially overvalued)
pub struct RSI {
    window: usize,
}

impl RSI {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Calculate RSI using simple rolling means of gains and losses
    /// Returns a vector of the same length as input
    /// First (window - 1) values are None (warmup period)
    ///
    /// The first bar has no prior close and counts as zero movement.
    /// When the mean loss is zero the result is 100 if there were gains,
    /// and None if the window saw no movement at all.
    pub fn calculate(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut gains = Vec::with_capacity(prices.len());
        let mut losses = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            let change = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
            gains.push(if change > 0.0 { change } else { 0.0 });
            losses.push(if change < 0.0 { -change } else { 0.0 });
        }

        let sma = SMA::new(self.window);
        let avg_gains = sma.calculate(&gains);
        let avg_losses = sma.calculate(&losses);

        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(gain), Some(loss)) => Self::from_averages(gain, loss),
                _ => None,
            })
            .collect()
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss <= 0.0 {
            return if avg_gain > 0.0 { Some(100.0) } else { None };
        }

        let rs = avg_gain / avg_loss;
        Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
    }
}
