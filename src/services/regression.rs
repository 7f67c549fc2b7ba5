// src/services/regression.rs
//! Single-input linear regression fitted by full-batch gradient descent on
//! mean squared error. Equivalent to a one-unit dense layer trained with SGD.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use log::debug;

use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearModel {
    pub weight: f64,
    pub bias: f64,
}

impl LinearModel {
    pub fn new(weight: f64, bias: f64) -> Self {
        LinearModel { weight, bias }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.weight * x + self.bias
    }

    pub fn predict_series(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}

/// How the weight and bias are set before the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Initializer {
    Zeros,
    /// Weight drawn from U(-limit, limit) with limit = sqrt(6 / (fan_in + fan_out)),
    /// which is sqrt(3) for one input and one output. Bias starts at zero.
    GlorotUniform { seed: u64 },
}

impl Default for Initializer {
    fn default() -> Self {
        Initializer::GlorotUniform { seed: 42 }
    }
}

impl Initializer {
    pub fn init(&self) -> LinearModel {
        match *self {
            Initializer::Zeros => LinearModel::default(),
            Initializer::GlorotUniform { seed } => {
                let limit = 3.0f64.sqrt();
                let mut rng = StdRng::seed_from_u64(seed);
                LinearModel::new(rng.gen_range(-limit..=limit), 0.0)
            }
        }
    }
}

/// Upper bound on training passes accepted from configuration or requests.
pub const MAX_EPOCHS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub initializer: Initializer,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            learning_rate: 0.001,
            epochs: 100,
            initializer: Initializer::default(),
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ForecastError::invalid_input(format!(
                "learning rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if self.epochs > MAX_EPOCHS {
            return Err(ForecastError::invalid_input(format!(
                "epochs must be at most {}, got {}",
                MAX_EPOCHS, self.epochs
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub model: LinearModel,
    /// MSE before each pass, followed by the MSE after the last one.
    pub loss_history: Vec<f64>,
}

impl FitReport {
    pub fn initial_loss(&self) -> f64 {
        self.loss_history[0]
    }

    pub fn final_loss(&self) -> f64 {
        self.loss_history[self.loss_history.len() - 1]
    }
}

fn check_inputs(x: &[f64], y: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(ForecastError::invalid_input("cannot fit on an empty series"));
    }
    if x.len() != y.len() {
        return Err(ForecastError::invalid_input(format!(
            "input and target lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    for (name, series) in [("x", x), ("y", y)] {
        if let Some(idx) = series.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::invalid_input(format!(
                "non-finite training value in {} at index {}",
                name, idx
            )));
        }
    }
    Ok(())
}

pub fn mean_squared_error(model: &LinearModel, x: &[f64], y: &[f64]) -> Result<f64> {
    check_inputs(x, y)?;
    Ok(mse(model, x, y))
}

fn mse(model: &LinearModel, x: &[f64], y: &[f64]) -> f64 {
    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let err = model.predict(xi) - yi;
            err * err
        })
        .sum();
    sum / x.len() as f64
}

/// Runs exactly `config.epochs` full-batch passes. There is no convergence
/// check; the loss trajectory never cuts training short.
pub fn fit(x: &[f64], y: &[f64], config: &FitConfig) -> Result<FitReport> {
    check_inputs(x, y)?;
    config.validate()?;

    let n = x.len() as f64;
    let lr = config.learning_rate;
    let mut model = config.initializer.init();
    let mut loss_history = Vec::with_capacity(config.epochs + 1);

    debug!(
        "Fitting {} samples: lr={}, epochs={}, init weight={}, bias={}",
        x.len(), lr, config.epochs, model.weight, model.bias
    );

    for _ in 0..config.epochs {
        let mut grad_w = 0.0;
        let mut grad_b = 0.0;
        let mut sq_err = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            let err = model.predict(xi) - yi;
            sq_err += err * err;
            grad_w += err * xi;
            grad_b += err;
        }
        loss_history.push(sq_err / n);

        model.weight -= lr * 2.0 * grad_w / n;
        model.bias -= lr * 2.0 * grad_b / n;
    }
    let final_loss = mse(&model, x, y);
    loss_history.push(final_loss);

    if !model.weight.is_finite() || !model.bias.is_finite() || !final_loss.is_finite() {
        return Err(ForecastError::invalid_input(format!(
            "training diverged with learning rate {} (weight={}, bias={}); use a smaller learning rate",
            lr, model.weight, model.bias
        )));
    }

    debug!(
        "Fit finished: weight={}, bias={}, loss {} -> {}",
        model.weight,
        model.bias,
        loss_history[0],
        loss_history[loss_history.len() - 1]
    );

    Ok(FitReport { model, loss_history })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_applies_line() {
        let model = LinearModel::new(2.0, 1.0);
        assert_eq!(model.predict(0.5), 2.0);
        assert_eq!(model.predict_series(&[0.0, 1.0]), vec![1.0, 3.0]);
    }

    #[test]
    fn seeded_init_is_reproducible_and_bounded() {
        let a = Initializer::GlorotUniform { seed: 7 }.init();
        let b = Initializer::GlorotUniform { seed: 7 }.init();
        assert_eq!(a, b);
        assert!(a.weight.abs() <= 3.0f64.sqrt());
        assert_eq!(a.bias, 0.0);
        assert_eq!(Initializer::Zeros.init(), LinearModel::default());
    }

    #[test]
    fn single_step_matches_hand_computed_gradient() {
        // pred = 0 everywhere, so dw = 2/n * sum(-y*x) = -2 and db = 2/n * sum(-y) = -3
        let x = [0.0, 1.0];
        let y = [1.0, 2.0];
        let config = FitConfig { learning_rate: 0.1, epochs: 1, initializer: Initializer::Zeros };
        let report = fit(&x, &y, &config).unwrap();
        assert!((report.model.weight - 0.2).abs() < 1e-12);
        assert!((report.model.bias - 0.3).abs() < 1e-12);
        assert!((report.initial_loss() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn runs_fixed_number_of_passes() {
        let x = [0.0, 0.5, 1.0];
        let y = [0.0, 0.5, 1.0];
        let config = FitConfig { epochs: 37, ..FitConfig::default() };
        let report = fit(&x, &y, &config).unwrap();
        assert_eq!(report.loss_history.len(), 38);

        let none = FitConfig { epochs: 0, ..FitConfig::default() };
        let report = fit(&x, &y, &none).unwrap();
        assert_eq!(report.model, none.initializer.init());
        assert_eq!(report.loss_history.len(), 1);
    }

    #[test]
    fn rejects_bad_inputs() {
        let config = FitConfig::default();
        assert!(fit(&[], &[], &config).unwrap_err().is_invalid_input());
        assert!(fit(&[1.0, 2.0], &[1.0], &config).unwrap_err().is_invalid_input());
        assert!(fit(&[1.0, f64::NAN], &[1.0, 2.0], &config).is_err());

        let bad_lr = FitConfig { learning_rate: 0.0, ..config };
        assert!(fit(&[1.0], &[1.0], &bad_lr).unwrap_err().is_invalid_input());
    }

    #[test]
    fn non_finite_value_names_its_series() {
        let config = FitConfig::default();
        let err = fit(&[0.0, 1.0], &[0.5, f64::NAN], &config).unwrap_err();
        assert!(err.to_string().contains("in y at index 1"), "{}", err);
        let err = fit(&[f64::INFINITY, 1.0], &[0.5, 0.5], &config).unwrap_err();
        assert!(err.to_string().contains("in x at index 0"), "{}", err);
    }

    #[test]
    fn epochs_above_limit_are_rejected_before_training() {
        let huge = FitConfig { epochs: usize::MAX / 4, ..FitConfig::default() };
        assert!(huge.validate().unwrap_err().is_invalid_input());
        let err = fit(&[0.0, 1.0], &[0.0, 1.0], &huge).unwrap_err();
        assert!(err.to_string().contains("epochs must be at most"));

        let max = FitConfig { epochs: MAX_EPOCHS, ..FitConfig::default() };
        assert!(max.validate().is_ok());
        let over = FitConfig { epochs: MAX_EPOCHS + 1, ..FitConfig::default() };
        assert!(over.validate().is_err());
    }

    #[test]
    fn diverging_learning_rate_is_an_error() {
        let x = [0.0, 0.5, 1.0];
        let y = [0.0, 0.5, 1.0];
        let config = FitConfig { learning_rate: 1000.0, epochs: 200, initializer: Initializer::Zeros };
        let err = fit(&x, &y, &config).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("training diverged"));
    }

    #[test]
    fn mean_squared_error_of_perfect_model_is_zero() {
        let model = LinearModel::new(2.0, 1.0);
        let mse = mean_squared_error(&model, &[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert_eq!(mse, 0.0);
    }
}
