// src/bin/test_chain.rs
use dotenv::dotenv;
use std::env;

use covered_call_dashboard::services::market::{MarketData, SchwabClient};
use covered_call_dashboard::services::screener::{screen_chain, ScreenerConfig};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let symbol = env::args().nth(1).unwrap_or_else(|| "NVDA".to_string());

    let client = SchwabClient::new(
        env::var("SCHWAB_APP_KEY").expect("SCHWAB_APP_KEY must be set"),
        env::var("SCHWAB_APP_SECRET").expect("SCHWAB_APP_SECRET must be set"),
        env::var("SCHWAB_REFRESH_TOKEN").expect("SCHWAB_REFRESH_TOKEN must be set"),
    )?;

    let chain = client.option_chain(&symbol).await?;
    println!("{} underlying price: {}", symbol, chain.underlying_price);

    let candidates = screen_chain(&chain, 100, &ScreenerConfig::default())?;
    println!("{} candidates pass the screen:", candidates.len());
    for c in &candidates {
        println!(
            "  {} exp {} ({} DTE)  delta {:.3}  bid {:.2}  weekly {:.2}%  annualized {:.2}%",
            c.strike, c.exp, c.dte, c.delta, c.bid, c.weekly_pct, c.annualized_pct
        );
    }

    Ok(())
}
