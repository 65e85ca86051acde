// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---- Raw Schwab payloads (deserialized as-is) ----

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub candles: Vec<RawCandle>,
}

/// One OHLC record as the price-history endpoint returns it.
/// `datetime` is epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandle {
    pub datetime: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Deserialize)]
pub struct AccountNumber {
    #[serde(rename = "hashValue")]
    pub hash_value: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountDetails {
    #[serde(rename = "securitiesAccount", default)]
    pub securities_account: SecuritiesAccount,
}

#[derive(Debug, Default, Deserialize)]
pub struct SecuritiesAccount {
    #[serde(default)]
    pub positions: Vec<RawPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub instrument: Instrument,
    #[serde(rename = "longQuantity", default)]
    pub long_quantity: f64,
    #[serde(rename = "averagePrice", default)]
    pub average_price: f64,
    #[serde(rename = "marketValue", default)]
    pub market_value: f64,
    #[serde(rename = "longOpenProfitLoss", default)]
    pub long_open_profit_loss: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    #[serde(rename = "assetType")]
    pub asset_type: String,
    pub symbol: String,
}

/// Option chain keyed by expiration ("YYYY-MM-DD:dte") then strike ("650.0"),
/// each strike holding a list of contract variants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionChain {
    #[serde(rename = "underlyingPrice", default)]
    pub underlying_price: f64,
    #[serde(rename = "callExpDateMap", default)]
    pub call_exp_date_map: HashMap<String, HashMap<String, Vec<OptionContract>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionContract {
    #[serde(default)]
    pub delta: f64,
    #[serde(rename = "daysToExpiration", default)]
    pub days_to_expiration: i64,
    #[serde(default)]
    pub bid: f64,
    #[serde(rename = "strikePrice", default)]
    pub strike_price: f64,
}

// ---- Outgoing JSON ----

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub shares: i64,
    pub avg_price: f64,
    pub market_value: f64,
    pub gain_loss: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub strike: f64,
    pub exp: String,
    pub dte: i64,
    pub delta: f64,
    pub bid: f64,
    pub weekly_pct: f64,
    pub annualized_pct: f64,
    pub total_premium: f64,
    pub otm_dollar: f64,
    pub otm_pct: f64,
}

/// One symbol's entry in the bulk recommendations response.
#[derive(Debug, Serialize)]
pub struct SymbolOverview {
    pub info: Holding,
    pub price: f64,
    pub contracts: i64,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub symbol: String,
    pub recommendation: String,
    pub candidates: Vec<Candidate>,
    pub position: Holding,
    pub current_price: f64,
}
