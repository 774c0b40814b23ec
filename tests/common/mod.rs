//! Shared fixtures: a mocked ClickUp API and an MCP server wired to it.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::MockServer;

use clickup_mcp::{
    clickup::ClickUpClient,
    config::Config,
    mcp::{
        build_registry,
        types::{JsonRpcRequest, JsonRpcResponse},
        McpServer,
    },
    server::AppState,
};

pub const TEST_TOKEN: &str = "pk_test_token";

pub struct TestContext {
    pub mock: MockServer,
    pub server: McpServer,
}

impl TestContext {
    /// MCP server whose ClickUp client points at a fresh mock
    pub async fn new() -> Self {
        let mock = MockServer::start().await;
        let client = ClickUpClient::with_config(
            TEST_TOKEN,
            &format!("{}/api/v2", mock.uri()),
            Duration::from_secs(5),
        )
        .expect("client builds");
        let server = McpServer::new(build_registry(Some(Arc::new(client))));
        Self { mock, server }
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> JsonRpcResponse {
        self.server
            .handle_request(JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: Some(json!(1)),
                method: "tools/call".to_string(),
                params: Some(json!({ "name": name, "arguments": arguments })),
            })
            .await
            .expect("tools/call is answered")
    }
}

/// Decode the result envelope carried in a tools/call text block
pub fn envelope(response: &JsonRpcResponse) -> Value {
    let result = response.result.as_ref().expect("successful response");
    let text = result["content"][0]["text"]
        .as_str()
        .expect("text content");
    serde_json::from_str(text).expect("envelope is JSON")
}

/// HTTP state for a ping-only server
pub fn demo_state() -> AppState {
    let config = Config {
        demo_mode: true,
        keep_alive_secs: 1,
        ..Config::default()
    };
    AppState::new(config, Arc::new(McpServer::new(build_registry(None))), false)
}
