// src/lib.rs

pub mod config;
pub mod error;
pub mod services;
pub mod models;
pub mod handlers;
pub mod routes;

pub use error::{ForecastError, ForecastResultExt};
pub use services::forecast::run_forecast_pipeline;
