use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use covered_call_dashboard::routes;
use covered_call_dashboard::services::llm::LlmClient;
use covered_call_dashboard::services::market::SchwabClient;
use covered_call_dashboard::services::screener::ScreenerConfig;
use covered_call_dashboard::AppContext;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("${} not set, defaulting to {}", key, default);
        default.to_string()
    })
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port: u16 = env_or("PORT", "5001").parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    let market = SchwabClient::new(
        env::var("SCHWAB_APP_KEY").expect("SCHWAB_APP_KEY must be set"),
        env::var("SCHWAB_APP_SECRET").expect("SCHWAB_APP_SECRET must be set"),
        env::var("SCHWAB_REFRESH_TOKEN").expect("SCHWAB_REFRESH_TOKEN must be set"),
    )
    .expect("failed to build Schwab client");

    let advisor = LlmClient::new(
        env::var("ANTHROPIC_API_KEY").ok(),
        env::var("OPENAI_API_KEY").ok(),
    )
    .expect("failed to build LLM client");

    let screener = ScreenerConfig {
        delta_min: env_or("DELTA_MIN", "0.10").parse().expect("DELTA_MIN must be a number"),
        delta_max: env_or("DELTA_MAX", "0.30").parse().expect("DELTA_MAX must be a number"),
        max_candidates: env_or("MAX_CANDIDATES", "5")
            .parse()
            .expect("MAX_CANDIDATES must be a number"),
    };
    info!(
        "Screening with delta {}..{}, top {} candidates",
        screener.delta_min, screener.delta_max, screener.max_candidates
    );

    let ctx = Arc::new(AppContext {
        market: Arc::new(market),
        advisor: Arc::new(advisor),
        screener,
    });

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(ctx).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
