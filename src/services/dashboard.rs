// src/services/dashboard.rs
use log::info;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{ForecastResult, Record};
use super::chart::{build_chart_payload, ChartPayload};
use super::forecast::{run_forecast_pipeline, PipelineConfig};

/// Everything the dashboard serves, computed once per data load and read-only
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub records: Vec<Record>,
    pub forecast: ForecastResult,
    pub chart: ChartPayload,
}

impl DashboardState {
    pub fn build(records: Vec<Record>, pipeline: &PipelineConfig, date_format: &str) -> Result<Self> {
        let forecast = run_forecast_pipeline(&records, pipeline)?;
        let chart = build_chart_payload(&records, &forecast, date_format)?;
        Ok(DashboardState { records, forecast, chart })
    }

    pub async fn load(config: &AppConfig) -> Result<Self> {
        let records = config.source.load().await?;
        let state = Self::build(records, &config.pipeline, &config.date_format)?;
        info!("Dashboard ready: forecasted expenditure {:.2}", state.forecast.future_forecast);
        Ok(state)
    }
}
