// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{candles::get_candles, candles::CandlesQuery,
                      recommendations::get_recommendation, recommendations::get_recommendations,
                      recommendations::AdviceQuery};
use crate::AppContext;

// Turn our custom rejections back into JSON error bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status();
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(ctx: Arc<AppContext>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let ctx_filter = warp::any().map(move || ctx.clone());

    let chart_page = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file("static/index.html"));

    let assets = warp::path("static").and(warp::fs::dir("static"));

    let candles_route = warp::path!("api" / "candles" / String)
        .and(warp::get())
        .and(warp::query::<CandlesQuery>())
        .and(ctx_filter.clone())
        .and_then(get_candles);

    let recommendations_route = warp::path!("api" / "recommendations")
        .and(warp::get())
        .and(ctx_filter.clone())
        .and_then(get_recommendations);

    let recommendation_route = warp::path!("api" / "recommendation" / String)
        .and(warp::get())
        .and(warp::query::<AdviceQuery>())
        .and(ctx_filter.clone())
        .and_then(get_recommendation);

    info!("All routes configured successfully.");

    chart_page
        .or(assets)
        .or(candles_route)
        .or(recommendations_route)
        .or(recommendation_route)
        .recover(handle_rejection)
}
