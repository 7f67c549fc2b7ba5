// src/services/normalize.rs
use serde::{Deserialize, Serialize};
use log::debug;

use crate::error::{ForecastError, Result};

/// What to do with a series whose values are all equal, where min-max
/// scaling would divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with `InvalidInput`.
    #[default]
    Reject,
    /// Map every value to 0.0. Denormalizing then yields the constant back.
    Zeros,
}

impl std::str::FromStr for DegeneratePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DegeneratePolicy::Reject),
            "zeros" | "zero" => Ok(DegeneratePolicy::Zeros),
            other => Err(format!("unknown degenerate policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl NormalizedSeries {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Maps a value from [0,1] space back to the original units.
    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.range() + self.min
    }

    pub fn denormalize_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.denormalize(v)).collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Min-max scales `values` into [0,1].
pub fn normalize(values: &[f64], policy: DegeneratePolicy) -> Result<NormalizedSeries> {
    if values.is_empty() {
        return Err(ForecastError::invalid_input("cannot normalize an empty series"));
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(ForecastError::invalid_input(format!(
                "non-finite value {} at index {}",
                v, idx
            )));
        }
        min = min.min(v);
        max = max.max(v);
    }

    let range = max - min;
    let normalized = if range == 0.0 {
        match policy {
            DegeneratePolicy::Reject => {
                return Err(ForecastError::invalid_input(format!(
                    "constant series (every value is {}) cannot be min-max normalized",
                    min
                )));
            }
            DegeneratePolicy::Zeros => {
                debug!("Constant series at {}, normalizing to zeros", min);
                vec![0.0; values.len()]
            }
        }
    } else {
        values.iter().map(|&v| (v - min) / range).collect()
    };

    Ok(NormalizedSeries { values: normalized, min, max })
}
