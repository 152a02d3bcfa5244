use register_engine::utils::logger;
use register_engine::{Config, EngineState, start_background_tasks};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    if config.environment == "production" {
        logger::init_logger_with_file(None, Some(&config.work_dir));
    } else {
        logger::init_logger();
    }
    tracing::info!(
        environment = %config.environment,
        db_path = %config.db_path,
        timezone = %config.timezone,
        eod_cutoff = %config.eod_cutoff,
        "Starting register engine"
    );

    let state = EngineState::initialize(&config).await?;
    let tasks = start_background_tasks(&state);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    state.db.close().await;
    Ok(())
}
