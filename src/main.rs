use dotenv::dotenv;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use savings_forecast_dashboard::config::AppConfig;
use savings_forecast_dashboard::routes;
use savings_forecast_dashboard::services::dashboard::DashboardState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    info!("Using PORT: {}", config.port);

    // Train once up front; requests only read the result.
    let state = match DashboardState::load(&config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to build dashboard from {}: {}", config.source.describe(), e);
            return Err(e.into());
        }
    };

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(state, config.pipeline).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
