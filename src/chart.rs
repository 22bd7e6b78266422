// Plotly figure for the three-panel view: price + signals, RSI, MACD.
// Pure presentation; every value comes precomputed from the Analysis.

use crate::config::ChartConfig;
use crate::models::Analysis;
use crate::services::analysis_service::AnalysisParams;
use serde::Serialize;
use serde_json::{json, Value};

const ROWS: usize = 3;
const VERTICAL_SPACING: f64 = 0.1;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Value,
    pub config: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Value>,
    pub xaxis: &'static str,
    pub yaxis: &'static str,
}

impl Trace {
    fn line(
        name: impl Into<String>,
        x: &[String],
        y: Vec<Option<f64>>,
        color: &str,
        row: usize,
    ) -> Self {
        let (xaxis, yaxis) = axes(row);
        Self {
            kind: "scatter",
            name: name.into(),
            x: x.to_vec(),
            y,
            mode: Some("lines"),
            line: Some(json!({ "color": color })),
            marker: None,
            xaxis,
            yaxis,
        }
    }

    fn markers(name: &str, x: Vec<String>, y: Vec<Option<f64>>, color: &str, symbol: &str) -> Self {
        let (xaxis, yaxis) = axes(1);
        Self {
            kind: "scatter",
            name: name.to_string(),
            x,
            y,
            mode: Some("markers"),
            line: None,
            marker: Some(json!({ "color": color, "symbol": symbol, "size": 10 })),
            xaxis,
            yaxis,
        }
    }

    fn bars(name: &str, x: &[String], y: Vec<Option<f64>>, color: &str, row: usize) -> Self {
        let (xaxis, yaxis) = axes(row);
        Self {
            kind: "bar",
            name: name.to_string(),
            x: x.to_vec(),
            y,
            mode: None,
            line: None,
            marker: Some(json!({ "color": color })),
            xaxis,
            yaxis,
        }
    }
}

fn axes(row: usize) -> (&'static str, &'static str) {
    match row {
        1 => ("x", "y"),
        2 => ("x2", "y2"),
        _ => ("x3", "y3"),
    }
}

/// Vertical domains, top row first, matching plotly's make_subplots spacing
fn row_domains(rows: usize, spacing: f64) -> Vec<[f64; 2]> {
    let height = (1.0 - spacing * (rows - 1) as f64) / rows as f64;
    (0..rows)
        .map(|i| {
            let top = 1.0 - i as f64 * (height + spacing);
            [(top - height).max(0.0), top]
        })
        .collect()
}

fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

pub fn build_figure(analysis: &Analysis, config: &ChartConfig, params: &AnalysisParams) -> Figure {
    let rule = &params.rule;
    let ticker = &analysis.prices.ticker;
    let ind = &analysis.indicators;
    let dates: Vec<String> = analysis
        .prices
        .dates()
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let pick = |indices: Vec<usize>| -> (Vec<String>, Vec<Option<f64>>) {
        indices
            .into_iter()
            .map(|i| (dates[i].clone(), Some(ind.ema_fast[i])))
            .unzip()
    };
    let (buy_x, buy_y) = pick(analysis.signals.buy_indices());
    let (sell_x, sell_y) = pick(analysis.signals.sell_indices());

    let data = vec![
        Trace::line(
            format!("{} Close Price", ticker),
            &dates,
            defined(&analysis.prices.closes()),
            "blue",
            1,
        ),
        Trace::line(
            format!("{}EMA", params.ema_fast_span),
            &dates,
            defined(&ind.ema_fast),
            "orange",
            1,
        ),
        Trace::line(
            format!("{}EMA", params.ema_slow_span),
            &dates,
            defined(&ind.ema_slow),
            "green",
            1,
        ),
        Trace::markers("Buy Signal", buy_x, buy_y, "green", "triangle-up"),
        Trace::markers("Sell Signal", sell_x, sell_y, "red", "triangle-down"),
        Trace::line("RSI", &dates, ind.rsi.clone(), "orange", 2),
        Trace::line("MACD", &dates, defined(&ind.macd), "blue", 3),
        Trace::line("Signal Line", &dates, defined(&ind.macd_signal), "orange", 3),
        Trace::bars("MACD Histogram", &dates, defined(&ind.macd_histogram), "gray", 3),
    ];

    let shapes: Vec<Value> = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => vec![
            threshold_line(first, last, rule.overbought, "red"),
            threshold_line(first, last, rule.oversold, "green"),
        ],
        _ => Vec::new(),
    };

    let domains = row_domains(ROWS, VERTICAL_SPACING);
    let layout = json!({
        "title": { "text": format!("{} Stock Price with Buy/Sell Signals, RSI, and MACD", ticker) },
        "height": config.height,
        "dragmode": "zoom",
        "hovermode": "x unified",
        "showlegend": true,
        "xaxis": {
            "anchor": "y", "domain": [0.0, 1.0], "matches": "x3", "showticklabels": false,
            "type": "date", "rangeslider": { "visible": false }
        },
        "xaxis2": {
            "anchor": "y2", "domain": [0.0, 1.0], "matches": "x3", "showticklabels": false,
            "type": "date"
        },
        "xaxis3": {
            "anchor": "y3", "domain": [0.0, 1.0], "type": "date",
            "title": { "text": "Date" }, "rangeslider": { "visible": false }
        },
        "yaxis": { "anchor": "x", "domain": domains[0], "title": { "text": "Price" } },
        "yaxis2": { "anchor": "x2", "domain": domains[1], "title": { "text": "RSI" } },
        "yaxis3": { "anchor": "x3", "domain": domains[2], "title": { "text": "MACD" } },
        "shapes": shapes,
    });

    Figure {
        data,
        layout,
        config: json!({ "scrollZoom": true, "responsive": true, "displaylogo": false }),
    }
}

fn threshold_line(x0: &str, x1: &str, level: f64, color: &str) -> Value {
    json!({
        "type": "line",
        "xref": "x2",
        "yref": "y2",
        "x0": x0,
        "x1": x1,
        "y0": level,
        "y1": level,
        "line": { "color": color }
    })
}
