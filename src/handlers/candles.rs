// src/handlers/candles.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::candles::{period_params, to_chart_candles};
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct CandlesQuery {
    pub period: Option<String>,
}

pub async fn get_candles(
    symbol: String,
    query: CandlesQuery,
    ctx: Arc<AppContext>,
) -> Result<Json, Rejection> {
    let period = query.period.as_deref().unwrap_or("5d");
    info!("Handling candle request for {} over {}", symbol, period);

    let params = period_params(period);
    let history = ctx.market.price_history(&symbol, &params).await.map_err(|e| {
        error!("Failed to fetch price history for {}: {}", symbol, e);
        warp::reject::custom(ApiError::upstream_error(e.to_string()))
    })?;

    Ok(warp::reply::json(&to_chart_candles(&history.candles)))
}
