use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use dashmap::DashMap;
use futures::Stream;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    mcp::{
        constants::JsonRpcEnvelopes,
        types::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR},
    },
    server::AppState,
};

/// Path clients POST their JSON-RPC messages to
pub const MESSAGES_PATH: &str = "/mcp";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
}

/// Live SSE sessions keyed by session id
#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<DashMap<String, mpsc::UnboundedSender<JsonRpcResponse>>>,
}

/// Removes its session from the table when dropped
pub struct SessionGuard {
    id: String,
    sessions: Arc<DashMap<String, mpsc::UnboundedSender<JsonRpcResponse>>>,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.sessions.remove(&self.id).is_some() {
            info!("SSE session {} closed", self.id);
        }
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its guard plus the outbound receiver
    pub fn open(&self) -> (SessionGuard, mpsc::UnboundedReceiver<JsonRpcResponse>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.insert(id.clone(), tx);
        info!("SSE session {} opened", id);

        let guard = SessionGuard {
            id,
            sessions: Arc::clone(&self.sessions),
        };
        (guard, rx)
    }

    /// Whether the session exists and its stream is still attached. Stale
    /// entries are dropped on the way.
    pub fn is_open(&self, id: &str) -> bool {
        let closed = match self.sessions.get(id) {
            Some(sender) => sender.is_closed(),
            None => return false,
        };
        if closed {
            self.remove(id);
        }
        !closed
    }

    /// Deliver a response to exactly one session
    pub fn route(&self, id: &str, response: JsonRpcResponse) -> Result<(), SessionError> {
        let result = match self.sessions.get(id) {
            Some(sender) => sender.send(response).map_err(|_| ()),
            None => return Err(SessionError::NotFound(id.to_string())),
        };

        result.map_err(|_| {
            self.remove(id);
            SessionError::NotFound(id.to_string())
        })
    }

    pub fn remove(&self, id: &str) {
        if self.sessions.remove(id).is_some() {
            debug!("Removed session {}", id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// SSE endpoint: opens a session and streams its JSON-RPC responses
pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (guard, mut receiver) = state.sessions.open();
    let endpoint = format!("{}?sessionId={}", MESSAGES_PATH, guard.id());

    let stream = async_stream::stream! {
        // Owned by the stream so the session ends when axum drops it
        let guard = guard;

        yield Ok(Event::default().event("endpoint").data(endpoint));

        while let Some(response) = receiver.recv().await {
            match serde_json::to_string(&response) {
                Ok(data) => yield Ok(Event::default().event("message").data(data)),
                Err(e) => warn!("Dropping unserializable response on {}: {}", guard.id(), e),
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(state.config.keep_alive())
            .text("keep-alive"),
    )
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// HTTP POST endpoint that feeds one JSON-RPC message into a session
pub async fn sse_message_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Result<Response, AppError> {
    let session_id = query
        .session_id
        .ok_or_else(|| AppError::BadRequest("Missing sessionId parameter".to_string()))?;

    if !state.sessions.is_open(&session_id) {
        return Err(AppError::NotFound(format!("Session {}", session_id)));
    }

    debug!("Received SSE message for {}: {}", session_id, body);

    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(e) => {
            let id = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("id").cloned());
            let error_response =
                JsonRpcEnvelopes::error_response(PARSE_ERROR, &format!("Parse error: {}", e), id);
            return Ok((StatusCode::BAD_REQUEST, Json(error_response)).into_response());
        }
    };

    tokio::spawn(async move {
        if let Some(response) = state.mcp_server.handle_request(request).await {
            if let Err(e) = state.sessions.route(&session_id, response) {
                warn!("Response dropped: {}", e);
            }
        }
    });

    Ok((StatusCode::ACCEPTED, "Accepted").into_response())
}
