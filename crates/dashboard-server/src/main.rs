mod config;
mod wiring;

use std::error::Error;

use api::{AppState, Gate, SessionSigner};
use core_sim::{EntropySource, SeededSource};
use runtime::{BoxedSource, DashboardEngine};
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::Config::from_env()?;
    let state = build_state(&config)?;
    let listener = TcpListener::bind(config.listen_addr).await?;

    tracing::info!(
        addr = %config.listen_addr,
        seeded = config.rng_seed.is_some(),
        "dashboard listening"
    );

    axum::serve(listener, wiring::build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_state(config: &config::Config) -> Result<AppState, Box<dyn Error>> {
    let rng: BoxedSource = match config.rng_seed {
        Some(seed) => Box::new(SeededSource::new(seed)),
        None => Box::new(EntropySource::new()),
    };
    let now = OffsetDateTime::now_utc();
    let engine = DashboardEngine::new(config.sim_config(), rng, now)?;
    let gate = Gate::new(config.pin.clone());
    let sessions = SessionSigner::new(&config.session_key)?;

    Ok(AppState::new(engine, gate, sessions))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
