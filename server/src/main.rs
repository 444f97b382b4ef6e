//! Portal sync server: reads settings from the environment (and `.env`), then serves the sync endpoint.
//!
//! Run from repo root: `cargo run -p portal-sync-server`

use portal_sync::{app, connect, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("portal_sync=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings)?;
    let bind_addr = settings.bind_addr;
    let write_mode = settings.write_mode;
    let state = AppState::new(pool, settings);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(?write_mode, "portal sync listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
