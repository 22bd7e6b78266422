use crate::models::{IndicatorSet, SignalSeries};

/// Decision for a single date
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Fast EMA above slow EMA while RSI is oversold
    Buy,

    /// Fast EMA below slow EMA while RSI is overbought
    Sell,
}

/// Threshold/crossover rule evaluated independently for every date.
/// No hysteresis and no de-duplication: consecutive qualifying dates all fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRule {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalRule {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalRule {
    pub fn new(oversold: f64, overbought: f64) -> Self {
        Self {
            oversold,
            overbought,
        }
    }

    /// Undefined RSI never fires
    pub fn classify(&self, ema_fast: f64, ema_slow: f64, rsi: Option<f64>) -> Option<Signal> {
        let rsi = rsi?;

        if ema_fast > ema_slow && rsi < self.oversold {
            Some(Signal::Buy)
        } else if ema_fast < ema_slow && rsi > self.overbought {
            Some(Signal::Sell)
        } else {
            None
        }
    }

    pub fn evaluate(&self, indicators: &IndicatorSet) -> SignalSeries {
        let decisions: Vec<Option<Signal>> = indicators
            .ema_fast
            .iter()
            .zip(&indicators.ema_slow)
            .zip(&indicators.rsi)
            .map(|((fast, slow), rsi)| self.classify(*fast, *slow, *rsi))
            .collect();

        SignalSeries {
            buy: decisions.iter().map(|d| *d == Some(Signal::Buy)).collect(),
            sell: decisions.iter().map(|d| *d == Some(Signal::Sell)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(ema_fast: Vec<f64>, ema_slow: Vec<f64>, rsi: Vec<Option<f64>>) -> IndicatorSet {
        let len = ema_fast.len();
        IndicatorSet {
            ema_fast,
            ema_slow,
            rsi,
            macd: vec![0.0; len],
            macd_signal: vec![0.0; len],
            macd_histogram: vec![0.0; len],
        }
    }

    #[test]
    fn test_buy_when_uptrend_and_oversold() {
        let rule = SignalRule::default();
        assert_eq!(rule.classify(105.0, 100.0, Some(25.0)), Some(Signal::Buy));
        assert_eq!(rule.classify(105.0, 100.0, Some(30.0)), None);
        assert_eq!(rule.classify(95.0, 100.0, Some(25.0)), None);
    }

    #[test]
    fn test_sell_when_downtrend_and_overbought() {
        let rule = SignalRule::default();
        assert_eq!(rule.classify(95.0, 100.0, Some(75.0)), Some(Signal::Sell));
        assert_eq!(rule.classify(95.0, 100.0, Some(70.0)), None);
        assert_eq!(rule.classify(105.0, 100.0, Some(75.0)), None);
    }

    #[test]
    fn test_equal_emas_never_fire() {
        let rule = SignalRule::default();
        assert_eq!(rule.classify(100.0, 100.0, Some(10.0)), None);
        assert_eq!(rule.classify(100.0, 100.0, Some(90.0)), None);
    }

    #[test]
    fn test_undefined_rsi_never_fires() {
        let rule = SignalRule::default();
        assert_eq!(rule.classify(105.0, 100.0, None), None);
        assert_eq!(rule.classify(95.0, 100.0, None), None);
    }

    #[test]
    fn test_consecutive_signals_all_fire() {
        let set = indicators(
            vec![105.0, 105.0, 105.0, 95.0, 95.0],
            vec![100.0; 5],
            vec![Some(20.0), Some(22.0), Some(50.0), Some(80.0), Some(85.0)],
        );
        let signals = SignalRule::default().evaluate(&set);

        assert_eq!(signals.buy, vec![true, true, false, false, false]);
        assert_eq!(signals.sell, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_buy_and_sell_exclusive() {
        let rule = SignalRule::default();
        let mut fast = Vec::new();
        let mut slow = Vec::new();
        let mut rsi = Vec::new();
        for i in 0..200 {
            fast.push(100.0 + ((i * 7) % 11) as f64 - 5.0);
            slow.push(100.0);
            rsi.push(if i % 13 == 0 { None } else { Some(((i * 37) % 101) as f64) });
        }

        let signals = rule.evaluate(&indicators(fast, slow, rsi));

        assert_eq!(signals.buy.len(), 200);
        assert!(signals.buy_count() > 0);
        assert!(signals.sell_count() > 0);
        for t in 0..200 {
            assert!(!(signals.buy[t] && signals.sell[t]), "both fired at {}", t);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let rule = SignalRule::new(40.0, 60.0);
        assert_eq!(rule.classify(105.0, 100.0, Some(35.0)), Some(Signal::Buy));
        assert_eq!(rule.classify(95.0, 100.0, Some(65.0)), Some(Signal::Sell));
    }
}
