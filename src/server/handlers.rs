//! Route handlers.

use super::AppState;
use crate::models::{ChatRequest, ErrorBody, HealthResponse};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// `POST /api/chat`.
///
/// The body is parsed by hand rather than with the `Json` extractor so that
/// every malformed body gets the same `{"error": "Invalid JSON"}` reply,
/// whatever its content type.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, body_size = body.len(), "Rejected malformed chat request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
        },
    };

    let response = state.chat.respond(&request);
    (StatusCode::OK, Json(response)).into_response()
}

/// `GET /health`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
