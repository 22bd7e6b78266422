use chrono::NaiveDate;

/// One daily bar
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily bars for one ticker, strictly increasing by date
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts by date and keeps the last bar for any repeated date
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            ticker: ticker.into(),
            points: deduped,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Derived columns, each the same length as the price series.
/// `rsi` is None where the rolling window has not filled or momentum is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_histogram: Vec<f64>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.ema_fast.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

impl SignalSeries {
    pub fn buy_count(&self) -> usize {
        self.buy.iter().filter(|b| **b).count()
    }

    pub fn sell_count(&self) -> usize {
        self.sell.iter().filter(|s| **s).count()
    }

    /// Indices where the buy rule fired
    pub fn buy_indices(&self) -> Vec<usize> {
        fired(&self.buy)
    }

    /// Indices where the sell rule fired
    pub fn sell_indices(&self) -> Vec<usize> {
        fired(&self.sell)
    }
}

fn fired(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, flag)| flag.then_some(i))
        .collect()
}

/// The indexed table the pipeline produces: prices plus every derived column
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub prices: PriceSeries,
    pub indicators: IndicatorSet,
    pub signals: SignalSeries,
}

impl Analysis {
    pub fn buy_dates(&self) -> Vec<NaiveDate> {
        self.signals
            .buy_indices()
            .into_iter()
            .map(|i| self.prices.points[i].date)
            .collect()
    }

    pub fn sell_dates(&self) -> Vec<NaiveDate> {
        self.signals
            .sell_indices()
            .into_iter()
            .map(|i| self.prices.points[i].date)
            .collect()
    }
}
