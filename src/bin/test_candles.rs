// src/bin/test_candles.rs
use dotenv::dotenv;
use std::env;

use covered_call_dashboard::services::candles::{period_params, to_chart_candles};
use covered_call_dashboard::services::market::{MarketData, SchwabClient};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let symbol = env::args().nth(1).unwrap_or_else(|| "NVDA".to_string());
    let period = env::args().nth(2).unwrap_or_else(|| "5d".to_string());

    let client = SchwabClient::new(
        env::var("SCHWAB_APP_KEY").expect("SCHWAB_APP_KEY must be set"),
        env::var("SCHWAB_APP_SECRET").expect("SCHWAB_APP_SECRET must be set"),
        env::var("SCHWAB_REFRESH_TOKEN").expect("SCHWAB_REFRESH_TOKEN must be set"),
    )?;

    let history = client.price_history(&symbol, &period_params(&period)).await?;
    let candles = to_chart_candles(&history.candles);
    println!("{} candles for {} over {}", candles.len(), symbol, period);
    for c in candles.iter().take(5) {
        println!("  t={} o={} h={} l={} c={}", c.time, c.open, c.high, c.low, c.close);
    }

    Ok(())
}
