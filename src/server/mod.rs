//! HTTP surface for the hotspot generator.

mod routes;

pub use routes::router;

use crate::generator::HotspotGenerator;
use crate::image::UploadService;
use crate::Result;
use axum::{extract::DefaultBodyLimit, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<HotspotGenerator>,
    pub uploads: Arc<dyn UploadService>,
    pub vsd_path: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

pub fn app(state: AppState) -> Router {
    router()
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Hotspot API listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
