// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::info;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::forecast::{get_chart, get_forecast, get_records, post_forecast};
use crate::services::dashboard::DashboardState;
use crate::services::forecast::PipelineConfig;

const MAX_BODY_BYTES: u64 = 1024 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = format!("Invalid request body: {}", body_error);
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload Too Large".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    state: Arc<DashboardState>,
    defaults: PipelineConfig,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());
    let defaults = Arc::new(defaults);
    let defaults_filter = warp::any().map(move || defaults.clone());

    let health_route = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let forecast_route = warp::path!("api" / "v1" / "forecast")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_forecast);

    let forecast_post_route = warp::path!("api" / "v1" / "forecast")
        .and(warp::post())
        .and(defaults_filter)
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(post_forecast);

    let chart_route = warp::path!("api" / "v1" / "chart")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_chart);

    let records_route = warp::path!("api" / "v1" / "records")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_records);

    info!("All routes configured successfully.");

    health_route
        .or(forecast_route)
        .or(forecast_post_route)
        .or(chart_route)
        .or(records_route)
        .recover(handle_rejection)
}
