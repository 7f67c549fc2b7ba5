// src/services/forecast.rs
use serde::{Deserialize, Serialize};
use log::{debug, info};

use crate::error::{ForecastError, ForecastResultExt, Result};
use crate::models::{ForecastResult, Record};
use super::normalize::{normalize, DegeneratePolicy};
use super::regression::{fit, FitConfig};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fit: FitConfig,
    pub degenerate_policy: DegeneratePolicy,
}

pub fn validate_records(records: &[Record]) -> Result<()> {
    if records.is_empty() {
        return Err(ForecastError::invalid_input("no records to forecast from"));
    }
    for (idx, r) in records.iter().enumerate() {
        if !r.savings.is_finite() || !r.expenditure.is_finite() {
            return Err(ForecastError::invalid_input(format!(
                "record {} ({}) has a non-finite value: savings={}, expenditure={}",
                idx, r.date, r.savings, r.expenditure
            )));
        }
    }
    Ok(())
}

/// Normalizes both series, fits expenditure against savings, and returns the
/// denormalized predictions together with a one-step-ahead forecast made from
/// the last savings value.
pub fn run_forecast_pipeline(records: &[Record], config: &PipelineConfig) -> Result<ForecastResult> {
    validate_records(records)?;

    let savings: Vec<f64> = records.iter().map(|r| r.savings).collect();
    let expenditure: Vec<f64> = records.iter().map(|r| r.expenditure).collect();

    let norm_savings = normalize(&savings, config.degenerate_policy).in_series("savings")?;
    let norm_expenditure = normalize(&expenditure, config.degenerate_policy).in_series("expenditure")?;
    debug!(
        "Normalized savings [{}, {}], expenditure [{}, {}]",
        norm_savings.min, norm_savings.max, norm_expenditure.min, norm_expenditure.max
    );

    let report = fit(&norm_savings.values, &norm_expenditure.values, &config.fit)?;
    let model = report.model;

    // Predictions live in expenditure space, so they are mapped back with
    // the expenditure bounds.
    let predicted = norm_expenditure.denormalize_all(&model.predict_series(&norm_savings.values));

    let last_savings = norm_savings
        .last()
        .ok_or_else(|| ForecastError::invalid_input("no records to forecast from"))?;
    let future_forecast = norm_expenditure.denormalize(model.predict(last_savings));

    info!(
        "Trained on {} records (weight={:.4}, bias={:.4}, loss={:.6}); forecast {:.2}",
        records.len(),
        model.weight,
        model.bias,
        report.final_loss(),
        future_forecast
    );

    Ok(ForecastResult {
        actual: expenditure,
        predicted,
        future_forecast,
        model,
        loss_history: report.loss_history,
    })
}
