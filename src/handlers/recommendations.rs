// src/handlers/recommendations.rs
use log::{error, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{Advice, SymbolOverview};
use crate::services::llm::LlmProvider;
use crate::services::prompt::build_prompt;
use crate::services::screener::{extract_holdings, screen_chain};
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct AdviceQuery {
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Screen every coverable holding. A symbol whose chain cannot be fetched
/// or whose quote is unusable is dropped from the result; the rest proceed.
pub async fn get_recommendations(ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling request for covered call recommendations");

    let positions = ctx.market.positions().await.map_err(|e| {
        error!("Failed to fetch account positions: {}", e);
        warp::reject::custom(ApiError::upstream_error(e.to_string()))
    })?;
    let holdings = extract_holdings(&positions);
    info!("Screening {} coverable holdings", holdings.len());

    let mut recommendations = BTreeMap::new();
    for (symbol, info) in holdings {
        let chain = match ctx.market.option_chain(&symbol).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!("Skipping {}: option chain fetch failed: {}", symbol, e);
                continue;
            }
        };
        let candidates = match screen_chain(&chain, info.shares, &ctx.screener) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Skipping {}: {}", symbol, e);
                continue;
            }
        };

        recommendations.insert(
            symbol,
            SymbolOverview {
                contracts: info.shares / 100,
                price: chain.underlying_price,
                info,
                candidates,
            },
        );
    }

    Ok(warp::reply::json(&recommendations))
}

/// Screen one held symbol and ask the configured model for a verdict.
pub async fn get_recommendation(
    symbol: String,
    query: AdviceQuery,
    ctx: Arc<AppContext>,
) -> Result<Json, Rejection> {
    info!("Handling advice request for {}", symbol);

    let provider = LlmProvider::from_request(query.provider.as_deref(), query.model.as_deref())
        .map_err(|e| warp::reject::custom(ApiError::invalid_data(e.to_string())))?;

    let positions = ctx.market.positions().await.map_err(|e| {
        error!("Failed to fetch account positions: {}", e);
        warp::reject::custom(ApiError::upstream_error(e.to_string()))
    })?;
    let holdings = extract_holdings(&positions);
    let position = holdings
        .get(&symbol)
        .cloned()
        .ok_or_else(|| warp::reject::custom(ApiError::not_found("Position not found")))?;

    let chain = ctx.market.option_chain(&symbol).await.map_err(|e| {
        error!("Failed to fetch option chain for {}: {}", symbol, e);
        warp::reject::custom(ApiError::upstream_error(e.to_string()))
    })?;
    let candidates = screen_chain(&chain, position.shares, &ctx.screener).map_err(|e| {
        error!("Cannot screen {}: {}", symbol, e);
        warp::reject::custom(ApiError::invalid_data(e.to_string()))
    })?;

    let prompt = build_prompt(&symbol, &position, chain.underlying_price, &candidates);
    let recommendation = ctx.advisor.complete(&provider, &prompt).await.map_err(|e| {
        error!("LLM call failed for {}: {}", symbol, e);
        warp::reject::custom(ApiError::llm_error(e.to_string()))
    })?;

    Ok(warp::reply::json(&Advice {
        symbol,
        recommendation,
        candidates,
        position,
        current_price: chain.underlying_price,
    }))
}
