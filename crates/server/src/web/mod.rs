//! Web front end: the single-page UI plus a small JSON API.

pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

pub use error::{AppError, AppResult};
pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

/// Serve the UI until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Movie recommender UI listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
