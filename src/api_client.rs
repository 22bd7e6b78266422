use crate::config::ProviderConfig;
use crate::models::{PricePoint, PriceSeries};
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Trailing window of daily bars, as the chart endpoint's `range` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Lookback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
            Lookback::TwoYears => "2y",
            Lookback::FiveYears => "5y",
            Lookback::TenYears => "10y",
            Lookback::YearToDate => "ytd",
            Lookback::Max => "max",
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lookback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Lookback::OneMonth),
            "3mo" => Ok(Lookback::ThreeMonths),
            "6mo" => Ok(Lookback::SixMonths),
            "1y" => Ok(Lookback::OneYear),
            "2y" => Ok(Lookback::TwoYears),
            "5y" => Ok(Lookback::FiveYears),
            "10y" => Ok(Lookback::TenYears),
            "ytd" => Ok(Lookback::YearToDate),
            "max" => Ok(Lookback::Max),
            other => Err(format!("unsupported lookback: {}", other)),
        }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ProviderError>,
}

#[derive(Deserialize)]
struct ProviderError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize, Default)]
struct ChartMeta {
    // seconds east of UTC for the listing exchange
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// The price history could not be obtained; terminal for the run
#[derive(Debug)]
pub enum DataUnavailable {
    RequestFailed(String),
    HttpStatus(u16),
    ParseError(String),
    Provider { code: String, description: String },
    NoData(String),
}

impl std::fmt::Display for DataUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataUnavailable::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            DataUnavailable::HttpStatus(status) => write!(f, "Provider returned HTTP {}", status),
            DataUnavailable::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataUnavailable::Provider { code, description } => {
                write!(f, "Provider error [{}]: {}", code, description)
            }
            DataUnavailable::NoData(ticker) => write!(f, "No price data returned for {}", ticker),
        }
    }
}

impl std::error::Error for DataUnavailable {}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client owned by this caller. Certificate verification stays on.
    pub fn new(config: &ProviderConfig) -> Result<Self, DataUnavailable> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataUnavailable::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn history_request(&self, ticker: &str, lookback: Lookback) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base_url, ticker))
            .query(&[("range", lookback.as_str()), ("interval", "1d")])
    }

    /// Fetch daily OHLCV bars for `ticker` over the trailing `lookback`
    pub async fn fetch_daily_history(
        &self,
        ticker: &str,
        lookback: Lookback,
    ) -> Result<PriceSeries, DataUnavailable> {
        let request = self
            .history_request(ticker, lookback)
            .build()
            .map_err(|e| DataUnavailable::RequestFailed(e.to_string()))?;
        debug!("Requesting {}", request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| DataUnavailable::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataUnavailable::ParseError(format!("Failed to read response body: {}", e)))?;

        // The provider reports unknown symbols as a 404 with a JSON error body
        if !status.is_success() {
            return match parse_chart(ticker, &body) {
                Err(err @ DataUnavailable::Provider { .. }) => Err(err),
                _ => Err(DataUnavailable::HttpStatus(status.as_u16())),
            };
        }

        parse_chart(ticker, &body)
    }
}

/// Parse a chart endpoint body into an ordered series.
/// Bars missing any of open/high/low/close are skipped; a missing volume counts as 0.
pub fn parse_chart(ticker: &str, body: &str) -> Result<PriceSeries, DataUnavailable> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DataUnavailable::ParseError(e.to_string()))?;

    if let Some(error) = response.chart.error {
        return Err(DataUnavailable::Provider {
            code: error.code,
            description: error.description,
        });
    }

    let no_data = || DataUnavailable::NoData(ticker.to_string());
    let results = response.chart.result.ok_or_else(no_data)?;
    let data = results.first().ok_or_else(no_data)?;
    let quotes = data.indicators.quote.first().ok_or_else(no_data)?;

    let mut points = Vec::with_capacity(data.timestamp.len());
    for (i, &timestamp) in data.timestamp.iter().enumerate() {
        let column = |values: &[Option<f64>]| values.get(i).copied().flatten();

        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&quotes.open),
            column(&quotes.high),
            column(&quotes.low),
            column(&quotes.close),
        ) else {
            continue;
        };

        let date = DateTime::from_timestamp(timestamp + data.meta.gmtoffset, 0)
            .ok_or_else(|| DataUnavailable::ParseError(format!("Invalid timestamp: {}", timestamp)))?
            .date_naive();

        points.push(PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume: quotes.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    if points.is_empty() {
        return Err(no_data());
    }

    Ok(PriceSeries::new(ticker, points))
}
