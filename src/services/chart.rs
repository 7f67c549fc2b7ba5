// src/services/chart.rs
//! Data handed to the chart renderer. Values are final; the renderer only draws.
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::models::{ForecastResult, Record};

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
pub const CHART_TITLE: &str = "Savings and Expenditure Over Time";
pub const FORECAST_LABEL: &str = "Forecasted Expenditure";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    pub fill: bool,
    pub tension: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastCard {
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub forecast: ForecastCard,
}

/// Formatting a date with a malformed pattern panics, so patterns from the
/// outside are checked up front.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub fn build_chart_payload(
    records: &[Record],
    result: &ForecastResult,
    date_format: &str,
) -> Result<ChartPayload> {
    if records.len() != result.actual.len() || records.len() != result.predicted.len() {
        return Err(ForecastError::invalid_input(format!(
            "forecast covers {} points but there are {} records",
            result.predicted.len(),
            records.len()
        )));
    }

    if !is_valid_date_format(date_format) {
        return Err(ForecastError::invalid_input(format!("invalid date format '{}'", date_format)));
    }

    let labels = records
        .iter()
        .map(|r| r.date.format(date_format).to_string())
        .collect();

    let actual = ChartDataset {
        label: "Actual Expenditure".to_string(),
        data: result.actual.clone(),
        border_color: "#3b82f6",
        border_dash: None,
        fill: false,
        tension: 0.3,
    };
    let predicted = ChartDataset {
        label: "Predicted Expenditure".to_string(),
        data: result.predicted.clone(),
        border_color: "#ef4444",
        border_dash: Some([5, 5]),
        fill: false,
        tension: 0.3,
    };

    Ok(ChartPayload {
        title: CHART_TITLE,
        labels,
        datasets: vec![actual, predicted],
        forecast: ForecastCard {
            label: FORECAST_LABEL,
            value: result.future_forecast,
        },
    })
}
