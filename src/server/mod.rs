//! HTTP facade
//!
//! Thin route table over a `StatsProvider`. Handlers only extract
//! arguments, call the collector/translator, and format the response.

pub mod routes;

use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::collectors::vnstat::StatsProvider;

pub use routes::{LANDING_PAGE, build_router};

/// Shared handler state; the provider is the only dependency
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn StatsProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self { provider }
    }
}

/// Binds `addr` and serves requests until the process is terminated
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    serve_on(listener, state).await
}

/// Serves on an already bound listener
pub async fn serve_on(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}
