//! HTTP server for the chatbot front-end.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/respond` | Answer `{"query": ...}` with `{"response": ...}` |
//! | `GET`  | `/health` | Status, version, and knowledge snapshot info |
//! | `POST` | `/reload` | Reload the knowledge base from the store |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing field `query`" } }
//! ```
//!
//! Error codes: `bad_request` (400), `payload_too_large` (413),
//! `data_source_unavailable` (503).
//! A query that matches nothing is not an error: it gets the fallback
//! response with status 200.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser front-end
//! can call the server from any host.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::knowledge::{spawn_periodic_reload, KnowledgeService, ReloadReport};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<KnowledgeService>,
}

/// Load the knowledge base and serve HTTP until Ctrl-C.
///
/// The startup load follows `[knowledge].on_load_error` and completes before
/// the listener binds, so no request ever races the first load.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(KnowledgeService::from_config(config));
    service
        .initialize(config.knowledge.on_load_error)
        .await
        .context("Failed to load knowledge base")?;

    let reload_task = config
        .knowledge
        .reload_interval_secs
        .map(|secs| spawn_periodic_reload(service.clone(), Duration::from_secs(secs)));

    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "chatbot server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = reload_task {
        task.abort();
    }
    tracing::info!("chatbot server stopped");
    Ok(())
}

/// Build the router around an already initialized service.
pub fn router(service: Arc<KnowledgeService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/respond", post(handle_respond))
        .route("/health", get(handle_health))
        .route("/reload", post(handle_reload))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn source_unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "data_source_unavailable",
        message: message.into(),
    }
}

fn rejected_body(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::BytesRejection(ref inner) => AppError {
            status: inner.status(),
            code: if inner.status() == StatusCode::PAYLOAD_TOO_LARGE {
                "payload_too_large"
            } else {
                "bad_request"
            },
            message: rejection.body_text(),
        },
        other => bad_request(other.body_text()),
    }
}

// ============ POST /respond ============

#[derive(Deserialize)]
struct RespondRequest {
    query: String,
}

#[derive(Serialize)]
struct RespondResponse {
    response: String,
}

/// Handler for `POST /respond`.
///
/// Any body that does not deserialize into `{"query": <string>}` is a 400.
/// A body that could not be read at all (over the size limit, say) keeps
/// axum's status. An empty query string is valid and goes to the matcher
/// unchanged.
async fn handle_respond(
    State(state): State<AppState>,
    payload: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<Json<RespondResponse>, AppError> {
    let Json(req) = payload.map_err(rejected_body)?;
    let response = state.service.respond(&req.query);
    Ok(Json(RespondResponse { response }))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    source: String,
    entries: usize,
    generation: u64,
    loaded_at: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.service.snapshot();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        source: state.service.source_name(),
        entries: snapshot.base().len(),
        generation: snapshot.generation(),
        loaded_at: snapshot.loaded_at().to_rfc3339(),
    })
}

// ============ POST /reload ============

/// Handler for `POST /reload`.
///
/// On failure the previous snapshot keeps serving and the error is reported
/// as 503.
async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadReport>, AppError> {
    match state.service.reload().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::warn!(error = %e, "knowledge reload failed, keeping previous snapshot");
            Err(source_unavailable(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chatbot_engine_core::source::InMemorySource;
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let source = Arc::new(InMemorySource::from_pairs(&[("hello", "Hi there!")]));
        let service = Arc::new(KnowledgeService::new(source));
        service.reload().await.unwrap();
        router(service)
    }

    async fn post_respond(app: Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/respond")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_respond_matches() {
        let body = br#"{"query":"Hello!"}"#.to_vec();
        let (status, json) = post_respond(test_router().await, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], "Hi there!");
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let (status, json) = post_respond(test_router().await, br#"{"query":7}"#.to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_oversized_body_keeps_payload_too_large() {
        let query = "a".repeat(3 * 1024 * 1024);
        let body = serde_json::to_vec(&serde_json::json!({ "query": query })).unwrap();
        let (status, json) = post_respond(test_router().await, body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"]["code"], "payload_too_large");
    }
}
