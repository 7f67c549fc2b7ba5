// src/bin/run_forecast.rs
use savings_forecast_dashboard::config::AppConfig;
use savings_forecast_dashboard::run_forecast_pipeline;
use log::{error, info};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    info!("Running forecast pipeline on {}", config.source.describe());

    let records = config.source.load().await?;
    let result = match run_forecast_pipeline(&records, &config.pipeline) {
        Ok(result) => result,
        Err(e) => {
            error!("Forecast pipeline failed: {}", e);
            return Err(e.into());
        }
    };

    info!("Model: weight={}, bias={}", result.model.weight, result.model.bias);
    if let Some(loss) = result.final_loss() {
        info!("Final training loss: {}", loss);
    }

    for (record, predicted) in records.iter().zip(&result.predicted) {
        println!(
            "{}  actual {:>10.2}  predicted {:>10.2}",
            record.date, record.expenditure, predicted
        );
    }
    println!("Forecasted Next Month Expenditure: {:.2}", result.future_forecast);
    Ok(())
}
