use shift_planner::{AppState, Config, load_seed, router};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let records = load_seed(config.seed_path.as_deref()).await;
    let state = AppState::new(&config, records);

    if !state.advisor.is_configured() {
        warn!("GEMINI_API_KEY not set; advice requests will use placeholder guidance");
    }

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!(location = %config.location, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
