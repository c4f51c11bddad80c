use anyhow::Result;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::{AppState, create_router};
use crate::config::settings::AppConfig;
use crate::services::processing::BuildService;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        info!("Running initial leaderboard build...");
        let config = self.config.clone();
        match tokio::task::spawn_blocking(move || BuildService::new(config).run()).await? {
            Ok(_) => info!("Initial build complete"),
            Err(e) => error!("Initial build failed: {:#}", e),
        }

        let state = Arc::new(AppState::new(self.config.clone()));
        let app = create_router(state).layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Serving at http://localhost:{}", self.port);
        info!("Leaderboard data is regenerated on every request");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
