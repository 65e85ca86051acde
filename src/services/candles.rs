// src/services/candles.rs
use crate::models::{Candle, RawCandle};

/// Price-history query parameters for one chart period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodParams {
    pub period_type: &'static str,
    pub period: u32,
    pub frequency_type: &'static str,
    pub frequency: u32,
}

/// Map a chart period ("1d", "5d", "1m", "6m", "1y", "5y") to the
/// upstream query parameters. Anything unrecognized falls back to "5d".
pub fn period_params(period: &str) -> PeriodParams {
    match period {
        "1d" => PeriodParams { period_type: "day", period: 1, frequency_type: "minute", frequency: 5 },
        "1m" => PeriodParams { period_type: "month", period: 1, frequency_type: "daily", frequency: 1 },
        "6m" => PeriodParams { period_type: "month", period: 6, frequency_type: "daily", frequency: 1 },
        "1y" => PeriodParams { period_type: "year", period: 1, frequency_type: "daily", frequency: 1 },
        "5y" => PeriodParams { period_type: "year", period: 5, frequency_type: "weekly", frequency: 1 },
        _ => PeriodParams { period_type: "day", period: 5, frequency_type: "minute", frequency: 5 },
    }
}

/// Project raw OHLC records into the chart format. Timestamps come in as
/// epoch milliseconds and go out as epoch seconds, truncated.
pub fn to_chart_candles(raw: &[RawCandle]) -> Vec<Candle> {
    raw.iter()
        .map(|c| Candle {
            time: c.datetime / 1000,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
        })
        .collect()
}
