// src/handlers/forecast.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::Record;
use crate::services::chart::DEFAULT_DATE_FORMAT;
use crate::services::dashboard::DashboardState;
use crate::services::forecast::PipelineConfig;
use super::error::ApiError;

pub async fn get_forecast(state: Arc<DashboardState>) -> Result<Json, Rejection> {
    info!("Handling request to get forecast");
    Ok(warp::reply::json(&state.forecast))
}

pub async fn get_chart(state: Arc<DashboardState>) -> Result<Json, Rejection> {
    info!("Handling request to get chart data");
    Ok(warp::reply::json(&state.chart))
}

pub async fn get_records(state: Arc<DashboardState>) -> Result<Json, Rejection> {
    info!("Handling request to get records ({} loaded)", state.records.len());
    Ok(warp::reply::json(&state.records))
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub records: Vec<Record>,
    #[serde(default)]
    pub config: Option<PipelineConfig>,
    #[serde(default)]
    pub date_format: Option<String>,
}

/// Runs the pipeline on caller-supplied records. The loaded dashboard state is
/// untouched.
pub async fn post_forecast(
    defaults: Arc<PipelineConfig>,
    request: ForecastRequest,
) -> Result<Json, Rejection> {
    info!("Handling forecast request for {} records", request.records.len());

    let config = request.config.unwrap_or(*defaults);
    let date_format = request
        .date_format
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());

    // Training is CPU-bound; keep it off the async workers.
    let records = request.records;
    let built = tokio::task::spawn_blocking(move || {
        DashboardState::build(records, &config, &date_format)
    })
    .await
    .map_err(|e| {
        error!("Forecast task failed: {}", e);
        warp::reject::custom(ApiError::internal("forecast task failed"))
    })?;

    match built {
        Ok(state) => Ok(warp::reply::json(&state)),
        Err(e) => {
            error!("Forecast request failed: {}", e);
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}
