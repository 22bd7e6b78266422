use crate::config::Config;
use crate::indicators::{EMA, MACD, RSI};
use crate::models::{Analysis, IndicatorSet, PriceSeries};
use crate::signals::SignalRule;
use tracing::{debug, info};

/// Indicator and signal parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub ema_fast_span: usize,
    pub ema_slow_span: usize,
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rule: SignalRule,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AnalysisParams {
    fn from(config: &Config) -> Self {
        Self {
            ema_fast_span: config.ema_fast_span,
            ema_slow_span: config.ema_slow_span,
            rsi_window: config.rsi_window,
            macd_fast: config.macd_fast,
            macd_slow: config.macd_slow,
            macd_signal: config.macd_signal,
            rule: SignalRule::new(config.rsi_oversold, config.rsi_overbought),
        }
    }
}

pub fn compute_indicators(closes: &[f64], params: &AnalysisParams) -> IndicatorSet {
    let macd = MACD::new(params.macd_fast, params.macd_slow, params.macd_signal).calculate(closes);

    IndicatorSet {
        ema_fast: EMA::new(params.ema_fast_span).calculate(closes),
        ema_slow: EMA::new(params.ema_slow_span).calculate(closes),
        rsi: RSI::new(params.rsi_window).calculate(closes),
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_histogram: macd.histogram,
    }
}

/// Run the indicator engine and the signal rule over a fetched series
pub fn analyze(prices: PriceSeries, params: &AnalysisParams) -> Analysis {
    let closes = prices.closes();
    let indicators = compute_indicators(&closes, params);
    let signals = params.rule.evaluate(&indicators);

    debug_assert_eq!(indicators.len(), prices.len());
    debug_assert_eq!(signals.buy.len(), prices.len());

    let analysis = Analysis {
        prices,
        indicators,
        signals,
    };

    info!(
        "Signals for {}: {} buy, {} sell",
        analysis.prices.ticker,
        analysis.signals.buy_count(),
        analysis.signals.sell_count()
    );
    for date in analysis.buy_dates() {
        debug!("Buy signal on {}", date);
    }
    for date in analysis.sell_dates() {
        debug!("Sell signal on {}", date);
    }

    analysis
}

/// Log the most recent close and indicator readings
pub fn log_latest(analysis: &Analysis) {
    let Some(last) = analysis.prices.points.last() else {
        return;
    };
    let i = analysis.prices.len() - 1;
    let ind = &analysis.indicators;

    let rsi = ind.rsi[i]
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string());

    info!(
        "Latest {} close ${:.2}: EMA fast {:.2}, EMA slow {:.2}, RSI {}, MACD {:.3} / signal {:.3}",
        last.date,
        last.close,
        ind.ema_fast[i],
        ind.ema_slow[i],
        rsi,
        ind.macd[i],
        ind.macd_signal[i]
    );
}
