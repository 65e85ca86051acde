// src/lib.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use services::llm::Advisor;
use services::market::MarketData;
use services::screener::ScreenerConfig;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared state handed to every handler. The upstream clients sit behind
/// traits so route tests can swap in fakes.
pub struct AppContext {
    pub market: Arc<dyn MarketData>,
    pub advisor: Arc<dyn Advisor>,
    pub screener: ScreenerConfig,
}
