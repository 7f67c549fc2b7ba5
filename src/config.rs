// src/config.rs
use anyhow::{anyhow, Context, Result};
use log::warn;
use std::env;

use crate::services::chart::{is_valid_date_format, DEFAULT_DATE_FORMAT};
use crate::services::dataset::DatasetSource;
use crate::services::forecast::PipelineConfig;
use crate::services::normalize::DegeneratePolicy;
use crate::services::regression::Initializer;

const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub source: DatasetSource,
    pub pipeline: PipelineConfig,
    pub date_format: String,
}

impl AppConfig {
    /// Reads settings from the process environment. Call `dotenv().ok()` first
    /// to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse::<u16>().with_context(|| format!("PORT must be a number, got '{}'", p))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let source = match (lookup("FORECAST_DATA_URL"), lookup("FORECAST_DATA_PATH")) {
            (Some(url), _) => DatasetSource::Url(url),
            (None, Some(path)) => DatasetSource::from_path(path),
            (None, None) => DatasetSource::Embedded,
        };

        let mut pipeline = PipelineConfig::default();
        if let Some(lr) = lookup("FORECAST_LEARNING_RATE") {
            pipeline.fit.learning_rate = lr
                .trim()
                .parse()
                .with_context(|| format!("FORECAST_LEARNING_RATE must be a number, got '{}'", lr))?;
        }
        if let Some(epochs) = lookup("FORECAST_EPOCHS") {
            pipeline.fit.epochs = epochs
                .trim()
                .parse()
                .with_context(|| format!("FORECAST_EPOCHS must be a non-negative integer, got '{}'", epochs))?;
        }
        if let Some(seed) = lookup("FORECAST_SEED") {
            pipeline.fit.initializer = parse_initializer(&seed)?;
        }
        if let Some(policy) = lookup("FORECAST_DEGENERATE_POLICY") {
            pipeline.degenerate_policy = policy.parse::<DegeneratePolicy>().map_err(|e| anyhow!(e))?;
        }
        pipeline.fit.validate()?;

        let date_format = lookup("FORECAST_DATE_FORMAT").unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        if !is_valid_date_format(&date_format) {
            return Err(anyhow!("FORECAST_DATE_FORMAT '{}' is not a valid chrono format", date_format));
        }

        Ok(AppConfig { port, source, pipeline, date_format })
    }
}

fn parse_initializer(value: &str) -> Result<Initializer> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(Initializer::Zeros);
    }
    let seed = value
        .parse::<u64>()
        .with_context(|| format!("FORECAST_SEED must be an integer or 'none', got '{}'", value))?;
    Ok(Initializer::GlorotUniform { seed })
}
