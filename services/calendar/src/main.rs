use calendar_service::config::Config;
use calendar_service::grpc::CalendarGrpc;
use calendar_service::proto::calendar_service_server::CalendarServiceServer;
use calendar_service::state::AppState;
use clap::Parser;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    tracing::info!(?config, "Starting calendar service");

    let state = AppState::connect(&config).await?;
    let grpc = CalendarGrpc::new(state.service());

    tracing::info!("Listening on {}", config.listen);
    Server::builder()
        .timeout(config.request_timeout())
        .add_service(CalendarServiceServer::new(grpc))
        .serve_with_shutdown(config.listen, shutdown_signal())
        .await?;

    drop(state);
    tracing::info!(backend = ?config.backend, "Backends released");
    tracing::info!("Calendar service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
