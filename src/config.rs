use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::api_client::Lookback;

const ENV_PREFIX: &str = "STOCK_SIGNALS_";

/// Everything the pipeline needs, with the historical NVDA / 1y / 50-200 setup as defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ticker: String,
    pub lookback: Lookback,
    pub ema_fast_span: usize,
    pub ema_slow_span: usize,
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub provider: ProviderConfig,
    pub chart: ChartConfig,
}

/// HTTP settings for the price provider, scoped to the one client built from them
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticker: "NVDA".to_string(),
            lookback: Lookback::OneYear,
            ema_fast_span: 50,
            ema_slow_span: 200,
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            provider: ProviderConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            user_agent: concat!("stock-signals/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            height: 800,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidValue { key: String, value: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Defaults overridden by `STOCK_SIGNALS_*` variables from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(ticker) = var("TICKER") {
            config.ticker = ticker.trim().to_uppercase();
        }
        override_parsed(&var, "LOOKBACK", &mut config.lookback)?;
        override_parsed(&var, "EMA_FAST", &mut config.ema_fast_span)?;
        override_parsed(&var, "EMA_SLOW", &mut config.ema_slow_span)?;
        override_parsed(&var, "RSI_WINDOW", &mut config.rsi_window)?;
        override_parsed(&var, "MACD_FAST", &mut config.macd_fast)?;
        override_parsed(&var, "MACD_SLOW", &mut config.macd_slow)?;
        override_parsed(&var, "MACD_SIGNAL", &mut config.macd_signal)?;
        override_parsed(&var, "RSI_OVERSOLD", &mut config.rsi_oversold)?;
        override_parsed(&var, "RSI_OVERBOUGHT", &mut config.rsi_overbought)?;

        if let Some(url) = var("PROVIDER_URL") {
            config.provider.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(agent) = var("USER_AGENT") {
            config.provider.user_agent = agent;
        }
        override_parsed(&var, "TIMEOUT_SECS", &mut config.provider.timeout_secs)?;
        override_parsed(&var, "BIND_ADDR", &mut config.chart.bind_addr)?;
        if let Some(dir) = var("STATIC_DIR") {
            config.chart.static_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("ticker must not be empty".to_string()));
        }
        // the ticker becomes a URL path segment
        if self
            .ticker
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '&' | '%'))
        {
            return Err(ConfigError::Invalid(format!(
                "ticker contains characters not allowed in a symbol: {:?}",
                self.ticker
            )));
        }

        let spans = [
            ("ema_fast_span", self.ema_fast_span),
            ("ema_slow_span", self.ema_slow_span),
            ("rsi_window", self.rsi_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = spans.iter().find(|(_, span)| *span == 0) {
            return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
        }

        if self.ema_fast_span >= self.ema_slow_span {
            return Err(ConfigError::Invalid(format!(
                "ema_fast_span ({}) must be shorter than ema_slow_span ({})",
                self.ema_fast_span, self.ema_slow_span
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold) || !in_range(self.rsi_overbought) {
            return Err(ConfigError::Invalid(
                "RSI thresholds must lie within 0-100".to_string(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ConfigError::Invalid(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn log_summary(&self) {
        info!(
            "Config: ticker={} lookback={} EMA {}/{} RSI({}) thresholds {}/{} MACD {}/{}/{}",
            self.ticker,
            self.lookback,
            self.ema_fast_span,
            self.ema_slow_span,
            self.rsi_window,
            self.rsi_oversold,
            self.rsi_overbought,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal
        );
    }
}

fn override_parsed<T, V>(var: &V, name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    if let Some(raw) = var(name) {
        *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: format!("{}{}", ENV_PREFIX, name),
            value: raw.clone(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.ticker, "NVDA");
        assert_eq!(config.lookback, Lookback::OneYear);
        assert_eq!((config.ema_fast_span, config.ema_slow_span), (50, 200));
        assert_eq!(config.rsi_window, 14);
        assert_eq!((config.macd_fast, config.macd_slow, config.macd_signal), (12, 26, 9));
        assert_eq!((config.rsi_oversold, config.rsi_overbought), (30.0, 70.0));
        assert_eq!(config.chart.height, 800);
        assert!(config.provider.base_url.starts_with("https://"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_overrides_gives_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STOCK_SIGNALS_TICKER", " aapl "),
            ("STOCK_SIGNALS_LOOKBACK", "6mo"),
            ("STOCK_SIGNALS_EMA_FAST", "20"),
            ("STOCK_SIGNALS_EMA_SLOW", "100"),
            ("STOCK_SIGNALS_RSI_OVERSOLD", "25.5"),
            ("STOCK_SIGNALS_BIND_ADDR", "0.0.0.0:8080"),
            ("STOCK_SIGNALS_PROVIDER_URL", "http://localhost:9000/chart/"),
        ]))
        .unwrap();

        assert_eq!(config.ticker, "AAPL");
        assert_eq!(config.lookback, Lookback::SixMonths);
        assert_eq!((config.ema_fast_span, config.ema_slow_span), (20, 100));
        assert_eq!(config.rsi_oversold, 25.5);
        assert_eq!(config.chart.bind_addr.port(), 8080);
        assert_eq!(config.provider.base_url, "http://localhost:9000/chart");
    }

    #[test]
    fn test_unparsable_value() {
        let err = Config::from_lookup(lookup_from(&[("STOCK_SIGNALS_RSI_WINDOW", "fourteen")]))
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "STOCK_SIGNALS_RSI_WINDOW".to_string(),
                value: "fourteen".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = Config {
            rsi_window: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_inverted_spans() {
        let config = Config {
            ema_fast_span: 200,
            ema_slow_span: 50,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            macd_fast: 26,
            macd_slow: 12,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let config = Config {
            rsi_oversold: 70.0,
            rsi_overbought: 30.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            rsi_overbought: 120.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_ticker() {
        let err = Config::from_lookup(lookup_from(&[("STOCK_SIGNALS_TICKER", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_ticker_with_url_syntax() {
        for ticker in ["NVDA?range=5y#", "NVDA/../AAPL", "NV DA", "NVDA#"] {
            let config = Config {
                ticker: ticker.to_string(),
                ..Config::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{} should be rejected",
                ticker
            );
        }

        for ticker in ["BRK-B", "^GSPC", "BTC-USD", "7203.T"] {
            let config = Config {
                ticker: ticker.to_string(),
                ..Config::default()
            };
            assert!(config.validate().is_ok(), "{} should be accepted", ticker);
        }
    }
}
