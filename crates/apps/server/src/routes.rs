use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::{ChatRequest, ChatResponse, CHAT_ROUTE};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::error::RelayError;
use crate::upstream::Generator;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
}

/// `allowed_origin` is echoed only to requests that carry exactly that
/// origin. It must not be `*`.
pub fn router(state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin]))
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route(CHAT_ROUTE, post(chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// One isolated turn: validate, forward, relay the text back.
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("rejected chat body: {rejection}");
        RelayError::InvalidBody(rejection.body_text())
    })?;
    let message = request.text().ok_or(RelayError::MissingMessage)?;

    debug!(chars = message.chars().count(), "forwarding chat message");
    let response = state.generator.generate(message).await.map_err(|err| {
        error!("Gemini API error: {err}");
        RelayError::from(err)
    })?;

    Ok(Json(ChatResponse { response }))
}
