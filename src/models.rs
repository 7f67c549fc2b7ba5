// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;

use crate::services::regression::LinearModel;

/// One dated observation. Order within a series is chronological and
/// significant: the last record drives the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub savings: f64,
    pub expenditure: f64,
}

impl Record {
    pub fn new(date: NaiveDate, savings: f64, expenditure: f64) -> Self {
        Record { date, savings, expenditure }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub future_forecast: f64,
    pub model: LinearModel,
    pub loss_history: Vec<f64>,
}

impl ForecastResult {
    pub fn final_loss(&self) -> Option<f64> {
        self.loss_history.last().copied()
    }
}
