use super::moving_averages::EMA;

/// Moving Average Convergence/Divergence (MACD)
/// MACD line = EMA(fast) - EMA(slow), signal line = EMA(MACD, signal)
pub struct MACD {
    fast: usize,
    slow: usize,
    signal: usize,
}

/// MACD output, each series aligned to the input index
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MACD {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }

    pub fn calculate(&self, prices: &[f64]) -> MacdOutput {
        let fast_ema = EMA::new(self.fast).calculate(prices);
        let slow_ema = EMA::new(self.slow).calculate(prices);

        let macd: Vec<f64> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(fast, slow)| fast - slow)
            .collect();
        let signal = EMA::new(self.signal).calculate(&macd);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdOutput {
            macd,
            signal,
            histogram,
        }
    }
}

impl Default for MACD {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}
