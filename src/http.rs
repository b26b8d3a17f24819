use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::backend::JobSearchBackend;
use crate::config::Config;
use crate::error::{JobSearchError, Result};
use crate::format::format_search_outcome;
use crate::mcp::{process_request, RpcRequest};
use crate::tools::tool_descriptors;
use crate::validate::validate_query;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn JobSearchBackend>,
    pub sessions: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Event>>>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponseBody {
    pub text: String,
    pub is_error: bool,
}

async fn search_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let args = match payload {
        Ok(Json(args)) => args,
        Err(e) => {
            return ErrorResponse {
                error: format!("invalid request body: {e}"),
            }
            .into_response()
        }
    };

    let query = match validate_query(&args) {
        Ok(query) => query,
        Err(e) => {
            return ErrorResponse {
                error: e.to_string(),
            }
            .into_response()
        }
    };

    let outcome = state.backend.search(&query).await;
    let output = format_search_outcome(outcome, &query.keyword, &query.location);
    (
        StatusCode::OK,
        Json(SearchResponseBody {
            text: output.text,
            is_error: output.is_error,
        }),
    )
        .into_response()
}

async fn tools_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "tools": tool_descriptors() }))
}

async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let session_id = format!("{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));

    // MCP clients expect an endpoint event telling them where to POST.
    let endpoint_url = format!("/message?session_id={}", session_id);
    let _ = tx.send(Event::default().event("endpoint").data(endpoint_url));

    state.sessions.write().unwrap().insert(session_id, tx);

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, axum::Error>);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Deserialize)]
struct MessageQuery {
    session_id: String,
}

async fn message_handler(
    State(state): State<AppState>,
    Query(q): Query<MessageQuery>,
    Json(req): Json<RpcRequest>,
) -> impl IntoResponse {
    let sender = {
        let sessions = state.sessions.read().unwrap();
        sessions.get(&q.session_id).cloned()
    };

    if let Some(sender) = sender {
        let backend = state.backend.clone();
        tokio::spawn(async move {
            let resp = process_request(backend, req).await;
            if let Ok(json_str) = serde_json::to_string(&resp) {
                let _ = sender.send(Event::default().event("message").data(json_str));
            }
        });
        StatusCode::ACCEPTED
    } else {
        StatusCode::NOT_FOUND
    }
}

pub fn build_router(backend: Arc<dyn JobSearchBackend>) -> Router {
    let state = AppState {
        backend,
        sessions: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/search", post(search_handler))
        .route("/tools", get(tools_handler))
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .with_state(state)
}

pub async fn serve_http(config: &Config, backend: Arc<dyn JobSearchBackend>) -> Result<()> {
    let router = build_router(backend);

    let addr = format!(
        "{}:{}",
        config
            .server
            .http_addr
            .clone()
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        config.server.http_port.unwrap_or(3000)
    );
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| JobSearchError::Config(format!("bind {addr} failed: {e}")))?;
    eprintln!("HTTP server listening on http://{}", addr);
    axum::serve(listener, router).await.map_err(|e| e.into())
}
