use anyhow::Result;
use std::sync::Arc;

use taskflow::services::{HttpRecordClient, RecordService};
use taskflow::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        task_table = %settings.records.task_table,
        "Starting TaskFlow session service"
    );

    let records = HttpRecordClient::new(&settings.records)?;

    // Probe the record service without blocking startup
    tokio::spawn({
        let records = records.clone();
        async move {
            match records.health_check().await {
                Ok(()) => tracing::info!("Record service is reachable"),
                Err(e) => tracing::warn!(error = %e, "Record service health check failed - will retry on first request"),
            }
        }
    });

    let state = app::AppState::new(Arc::new(records));
    let app = app::create_app(state, &settings);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
