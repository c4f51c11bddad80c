use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::config::settings::AppConfig;
use crate::errors::read_context;
use crate::services::manifest::ManifestService;
use crate::services::processing::BuildService;

pub struct AppState {
    pub config: AppConfig,
    /// Held for the whole rebuild-and-read so published files never interleave.
    publish_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            publish_lock: Mutex::new(()),
        }
    }
}

pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Response {
    let _guard = state.publish_lock.lock().await;
    log::info!("Regenerating leaderboard data...");

    let config = state.config.clone();
    let outcome = run_blocking(move || {
        BuildService::new(config.clone()).run()?;
        read_published(config.paths.output_file)
    })
    .await;

    respond(outcome)
}

pub async fn get_runs(State(state): State<Arc<AppState>>) -> Response {
    let _guard = state.publish_lock.lock().await;

    let config = state.config.clone();
    let outcome = run_blocking(move || {
        ManifestService::new(config.clone()).run()?;
        read_published(config.paths.manifest_file)
    })
    .await;

    respond(outcome)
}

pub async fn health() -> &'static str {
    "ok"
}

async fn run_blocking<F>(job: F) -> Result<String>
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .context("Rebuild task panicked")?
}

fn read_published(path: PathBuf) -> Result<String> {
    fs::read_to_string(&path).with_context(|| read_context(&path))
}

fn respond(outcome: Result<String>) -> Response {
    match outcome {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            log::error!("Rebuild failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            )
                .into_response()
        }
    }
}
