use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leafscan_core::{Error, PredictionResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

/// Error wrapper for the API surface. Most failures never reach here (the
/// pipeline swallows them); what does becomes a JSON error response.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "detail": self.message,
        }));
        (self.status, body).into_response()
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Plant disease detection API is running" }))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "models": state.engine.model_names() }))
}

/// `POST /predict`: multipart form with a required `file` part and an
/// optional `model_name` part (default "Ensemble").
pub async fn predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PredictionResult>, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut filename = String::new();
    let mut model_name = "Ensemble".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                bytes = Some(data.to_vec());
            }
            "model_name" => {
                model_name = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;
    debug!(
        filename = %filename,
        model_name = %model_name,
        size = bytes.len(),
        "prediction request"
    );

    let result = state.engine.predict(&bytes, &model_name, &filename)?;
    Ok(Json(result))
}
