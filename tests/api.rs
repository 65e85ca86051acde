//! End-to-end route tests against fake upstream collaborators.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use covered_call_dashboard::models::{OptionChain, PriceHistory, RawPosition};
use covered_call_dashboard::routes::routes;
use covered_call_dashboard::services::candles::PeriodParams;
use covered_call_dashboard::services::llm::{Advisor, LlmProvider};
use covered_call_dashboard::services::market::{self, MarketData};
use covered_call_dashboard::services::screener::ScreenerConfig;
use covered_call_dashboard::AppContext;

#[derive(Default)]
struct FakeMarket {
    history: PriceHistory,
    positions: Vec<RawPosition>,
    chains: HashMap<String, OptionChain>,
    fail_chain_for: Vec<String>,
    fail_history: bool,
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn price_history(&self, _symbol: &str, _params: &PeriodParams) -> market::Result<PriceHistory> {
        if self.fail_history {
            return Err("price history unavailable".into());
        }
        Ok(self.history.clone())
    }

    async fn positions(&self) -> market::Result<Vec<RawPosition>> {
        Ok(self.positions.clone())
    }

    async fn option_chain(&self, symbol: &str) -> market::Result<OptionChain> {
        if self.fail_chain_for.iter().any(|s| s == symbol) {
            return Err(format!("chain fetch failed for {}", symbol).into());
        }
        self.chains
            .get(symbol)
            .cloned()
            .ok_or_else(|| format!("no chain for {}", symbol).into())
    }
}

struct FakeAdvisor;

#[async_trait]
impl Advisor for FakeAdvisor {
    async fn complete(&self, _provider: &LlmProvider, prompt: &str) -> anyhow::Result<String> {
        assert!(prompt.contains("Candidate short calls"));
        Ok("SELL the 650 call expiring 2026-08-14".to_string())
    }
}

fn equity_position(symbol: &str, quantity: f64) -> RawPosition {
    serde_json::from_value(json!({
        "instrument": { "assetType": "EQUITY", "symbol": symbol },
        "longQuantity": quantity,
        "averagePrice": 500.0,
        "marketValue": quantity * 633.0,
        "longOpenProfitLoss": 1500.0
    }))
    .unwrap()
}

fn chain(price: f64) -> OptionChain {
    serde_json::from_value(json!({
        "underlyingPrice": price,
        "callExpDateMap": {
            "2026-08-14:7": {
                "650.0": [
                    { "delta": 0.20, "daysToExpiration": 7, "bid": 3.80, "strikePrice": 650.0 }
                ],
                "660.0": [
                    { "delta": 0.12, "daysToExpiration": 7, "bid": 2.10, "strikePrice": 660.0 }
                ]
            }
        }
    }))
    .unwrap()
}

fn app(market: FakeMarket) -> Arc<AppContext> {
    Arc::new(AppContext {
        market: Arc::new(market),
        advisor: Arc::new(FakeAdvisor),
        screener: ScreenerConfig::default(),
    })
}

async fn get(ctx: Arc<AppContext>, path: &str) -> (warp::http::StatusCode, Value) {
    let resp = warp::test::request()
        .method("GET")
        .path(path)
        .reply(&routes(ctx))
        .await;
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (resp.status(), body)
}

#[tokio::test]
async fn candles_endpoint_projects_raw_history() {
    let market = FakeMarket {
        history: serde_json::from_value(json!({
            "candles": [
                { "datetime": 1_700_000_000_000i64, "open": 180.0, "high": 182.0, "low": 179.0, "close": 181.0 }
            ]
        }))
        .unwrap(),
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/candles/NVDA?period=1d").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([{ "time": 1_700_000_000i64, "open": 180.0, "high": 182.0, "low": 179.0, "close": 181.0 }])
    );
}

#[tokio::test]
async fn candles_endpoint_maps_upstream_failure_to_500() {
    let market = FakeMarket { fail_history: true, ..Default::default() };

    let (status, body) = get(app(market), "/api/candles/NVDA").await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "price history unavailable");
}

#[tokio::test]
async fn bulk_recommendations_cover_every_screenable_holding() {
    let mut chains = HashMap::new();
    chains.insert("NVDA".to_string(), chain(633.0));
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 950.0)],
        chains,
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendations").await;

    assert_eq!(status, 200);
    let rec = &body["NVDA"];
    assert_eq!(rec["info"]["shares"], 900);
    assert_eq!(rec["price"], 633.0);
    assert_eq!(rec["contracts"], 9);

    let candidates = rec["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    // Ranked by weekly yield: the 650 bid dominates.
    assert_eq!(candidates[0]["strike"], 650.0);
    assert_eq!(candidates[0]["weeklyPct"], 0.60);
    assert_eq!(candidates[0]["totalPremium"], 3420.0);
    assert_eq!(candidates[1]["strike"], 660.0);
}

#[tokio::test]
async fn bulk_recommendations_skip_symbols_whose_chain_fails() {
    let mut chains = HashMap::new();
    chains.insert("NVDA".to_string(), chain(633.0));
    chains.insert("AAPL".to_string(), chain(220.0));
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0), equity_position("AAPL", 200.0)],
        chains,
        fail_chain_for: vec!["AAPL".to_string()],
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendations").await;

    assert_eq!(status, 200);
    let map = body.as_object().unwrap();
    assert!(map.contains_key("NVDA"));
    assert!(!map.contains_key("AAPL"));
}

#[tokio::test]
async fn bulk_recommendations_skip_symbols_with_unusable_quotes() {
    let mut chains = HashMap::new();
    chains.insert("NVDA".to_string(), chain(633.0));
    chains.insert("MSFT".to_string(), chain(0.0));
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0), equity_position("MSFT", 300.0)],
        chains,
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendations").await;

    assert_eq!(status, 200);
    let map = body.as_object().unwrap();
    assert!(map.contains_key("NVDA"));
    assert!(!map.contains_key("MSFT"));
}

#[tokio::test]
async fn advice_endpoint_returns_the_model_verdict() {
    let mut chains = HashMap::new();
    chains.insert("NVDA".to_string(), chain(633.0));
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0)],
        chains,
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendation/NVDA?provider=openai").await;

    assert_eq!(status, 200);
    assert_eq!(body["symbol"], "NVDA");
    assert_eq!(body["recommendation"], "SELL the 650 call expiring 2026-08-14");
    assert_eq!(body["currentPrice"], 633.0);
    assert_eq!(body["position"]["shares"], 900);
    assert_eq!(body["candidates"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn advice_endpoint_404s_for_unheld_symbols() {
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0)],
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendation/TSLA").await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Position not found");
}

#[tokio::test]
async fn advice_endpoint_rejects_unknown_providers() {
    let mut chains = HashMap::new();
    chains.insert("NVDA".to_string(), chain(633.0));
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0)],
        chains,
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendation/NVDA?provider=llama").await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "unknown LLM provider 'llama'");
}

#[tokio::test]
async fn advice_endpoint_maps_chain_failure_to_500() {
    let market = FakeMarket {
        positions: vec![equity_position("NVDA", 900.0)],
        fail_chain_for: vec!["NVDA".to_string()],
        ..Default::default()
    };

    let (status, body) = get(app(market), "/api/recommendation/NVDA").await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "chain fetch failed for NVDA");
}
