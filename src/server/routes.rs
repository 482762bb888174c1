use super::AppState;
use crate::models::Hotspot;
use crate::Error;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Decode(_) | Error::Image(_) => StatusCode::BAD_REQUEST,
            Error::RemoteCall(_) | Error::Parse { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("Request failed ({}): {}", status, self.0);
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn send_data(
    State(state): State<AppState>,
    Json(image_data): Json<String>,
) -> Result<Json<Vec<Hotspot>>, AppError> {
    let upload = state.uploads.save_upload(&image_data).await?;
    let result = state.generator.generate_hotspots(&upload).await;
    if let Err(e) = upload.close() {
        tracing::warn!("Failed to remove upload: {}", e);
    }

    let hotspots = result?;
    for hotspot in &hotspots {
        tracing::info!("Hotspot {}", hotspot);
    }

    Ok(Json(hotspots))
}

async fn send_vsd(
    State(state): State<AppState>,
    Json(vsd): Json<Value>,
) -> Result<&'static str, AppError> {
    let json = serde_json::to_vec(&vsd).map_err(Error::from)?;
    tokio::fs::write(&state.vsd_path, json)
        .await
        .map_err(Error::from)?;

    tracing::info!("Saved VSD data to {}", state.vsd_path.display());
    Ok("VSD data received and saved.")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/send-data", post(send_data))
        .route("/api/send-VSD", post(send_vsd))
}
