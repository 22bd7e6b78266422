use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use crate::state::AppState;

#[derive(Serialize)]
pub struct IndicatorResponse {
    pub ticker: String,
    pub dates: Vec<String>,
    pub closes: Vec<f64>,
    pub indicators: BTreeMap<String, Vec<Option<f64>>>,
    pub buy_dates: Vec<String>,
    pub sell_dates: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The full analysis table as JSON; undefined entries are null
pub async fn get_indicators(
    State(state): State<AppState>,
) -> Result<Json<IndicatorResponse>, (StatusCode, Json<ErrorResponse>)> {
    let analysis = state.analysis.as_ref();

    if analysis.prices.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No price data found for ticker: {}", analysis.prices.ticker),
            }),
        ));
    }

    let ind = &analysis.indicators;
    let dense = |values: &[f64]| values.iter().copied().map(Some).collect::<Vec<_>>();

    let mut indicators = BTreeMap::new();
    indicators.insert("ema_fast".to_string(), dense(&ind.ema_fast));
    indicators.insert("ema_slow".to_string(), dense(&ind.ema_slow));
    indicators.insert("rsi".to_string(), ind.rsi.clone());
    indicators.insert("macd".to_string(), dense(&ind.macd));
    indicators.insert("macd_signal".to_string(), dense(&ind.macd_signal));
    indicators.insert("macd_histogram".to_string(), dense(&ind.macd_histogram));

    let iso = |dates: Vec<chrono::NaiveDate>| -> Vec<String> {
        dates.iter().map(|d| d.to_string()).collect()
    };

    Ok(Json(IndicatorResponse {
        ticker: analysis.prices.ticker.clone(),
        dates: iso(analysis.prices.dates()),
        closes: analysis.prices.closes(),
        indicators,
        buy_dates: iso(analysis.buy_dates()),
        sell_dates: iso(analysis.sell_dates()),
    }))
}
