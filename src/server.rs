use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    error::Result,
    mcp::{server::McpServer, SERVER_NAME},
    sse::{sse_handler, sse_message_handler, SessionManager},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mcp_server: Arc<McpServer>,
    pub sessions: SessionManager,
    /// Whether the tool table was built against a live ClickUp client
    pub clickup_connected: bool,
}

impl AppState {
    pub fn new(config: Config, mcp_server: Arc<McpServer>, clickup_connected: bool) -> Self {
        Self {
            config,
            mcp_server,
            sessions: SessionManager::new(),
            clickup_connected,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CACHE_CONTROL,
            HeaderName::from_static("mcp-protocol-version"),
        ])
        .allow_origin(HeaderValue::from_static("*"));

    Router::new()
        .route("/health", get(health_check))
        .route("/tools", get(list_tools))
        .route("/mcp", get(sse_handler).post(sse_message_handler))
        .layer(RequestBodyLimitLayer::new(1024 * 1024)) // 1 MiB
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(state: AppState) -> Result<()> {
    let address = state.config.server_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("ClickUp MCP server listening on {}", address);
    info!("SSE endpoint: http://{}/mcp", address);
    info!("Health check: http://{}/health", address);
    info!("Registered {} tools", state.mcp_server.tools.len());

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down ClickUp MCP server...");
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "tools": state.mcp_server.tools.len(),
        "mode": "http",
        "clickup_connected": state.clickup_connected,
        "environment": {
            "demo_mode": state.config.demo_mode,
            "has_token": state.config.has_token(),
            "log_level": state.config.log_level.as_str(),
        },
        "sessions": state.sessions.len(),
    }))
}

async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    let names = state.mcp_server.tools.tool_names();
    Json(json!({
        "count": names.len(),
        "tools": names,
    }))
}
