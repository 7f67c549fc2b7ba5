// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ForecastError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ForecastError::InvalidInput(message.into())
    }

    /// True when the caller handed us data the pipeline cannot work with,
    /// as opposed to a failure reading the data in the first place.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ForecastError::InvalidInput(_))
    }
}

pub trait ForecastResultExt<T> {
    /// Prefixes an `InvalidInput` message with the name of the series it came from.
    fn in_series(self, series: &str) -> Result<T>;
}

impl<T> ForecastResultExt<T> for Result<T> {
    fn in_series(self, series: &str) -> Result<T> {
        self.map_err(|e| match e {
            ForecastError::InvalidInput(msg) => {
                ForecastError::InvalidInput(format!("{} series: {}", series, msg))
            }
            other => other,
        })
    }
}
