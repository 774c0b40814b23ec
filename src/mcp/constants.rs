/// Centralized constants and helpers for MCP protocol
use serde_json::{json, Value};

/// MCP protocol revision that defines the HTTP+SSE transport
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub const SERVER_NAME: &str = "clickup-mcp";

/// JSON-RPC envelope builders for replies produced outside `McpServer`
pub struct JsonRpcEnvelopes;

impl JsonRpcEnvelopes {
    /// Create JSON-RPC error response
    pub fn error_response(code: i32, message: &str, id: Option<Value>) -> Value {
        json!({
            "jsonrpc": "2.0",
            "error": {
                "code": code,
                "message": message
            },
            "id": id
        })
    }
}
