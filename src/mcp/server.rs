use serde_json::Value;
use tracing::{debug, error, info, trace, warn};

use super::{
    constants::{MCP_PROTOCOL_VERSION, SERVER_NAME},
    tools::{DispatchError, ToolRegistry},
    types::*,
};

/// Transport-agnostic JSON-RPC front end over the tool registry
pub struct McpServer {
    pub tools: ToolRegistry,
}

impl McpServer {
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }

    /// Parse one raw message and answer it. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        trace!("MCP message received: {}", raw);

        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Failed to parse JSON-RPC message: {}", e);
                Some(JsonRpcResponse::failure(
                    Some(Value::Null),
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Handling MCP request: {}", request.method);

        if request.is_notification() {
            debug!("Notification {} acknowledged without response", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::new(INVALID_REQUEST, "Invalid JSON-RPC version"),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(request.params).await,
            _ => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            )),
        };

        Some(match response {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => JsonRpcResponse::failure(request.id, error),
        })
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        info!("Handling initialize request");

        // Clients that omit or mangle params are still answered
        let client_version = params
            .and_then(|p| serde_json::from_value::<InitializeRequest>(p).ok())
            .map(|r| r.protocol_version);

        match client_version.as_deref() {
            Some(version) if version != MCP_PROTOCOL_VERSION => info!(
                "Protocol version mismatch: client requested {}, answering with {}",
                version, MCP_PROTOCOL_VERSION
            ),
            Some(_) => {}
            None => debug!("Initialize request carried no protocol version"),
        }

        let response = InitializeResponse {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        serde_json::to_value(response).map_err(|e| {
            JsonRpcError::new(INTERNAL_ERROR, format!("Failed to serialize response: {}", e))
        })
    }

    fn handle_list_tools(&self) -> Result<Value, JsonRpcError> {
        let response = ListToolsResponse {
            tools: self.tools.list_tools(),
        };

        serde_json::to_value(response).map_err(|e| {
            JsonRpcError::new(INTERNAL_ERROR, format!("Failed to serialize tools: {}", e))
        })
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let request: CallToolRequest = match params {
            Some(params) => serde_json::from_value(params).map_err(|e| {
                JsonRpcError::new(INVALID_PARAMS, format!("Invalid call_tool params: {}", e))
            })?,
            None => {
                return Err(JsonRpcError::new(
                    INVALID_PARAMS,
                    "Missing call_tool parameters",
                ))
            }
        };

        info!("Calling tool: {}", request.name);

        let envelope = self
            .tools
            .dispatch(&request.name, request.arguments)
            .await
            .map_err(|e| match e {
                DispatchError::MethodNotFound(_) => {
                    warn!("{}", e);
                    JsonRpcError::new(METHOD_NOT_FOUND, e.to_string())
                }
                DispatchError::Internal(_) => {
                    error!("Tool execution error: {}", e);
                    JsonRpcError::new(INTERNAL_ERROR, e.to_string())
                }
            })?;

        let text = serde_json::to_string_pretty(&envelope).map_err(|e| {
            JsonRpcError::new(
                INTERNAL_ERROR,
                format!("Failed to serialize tool response: {}", e),
            )
        })?;

        let response = CallToolResponse {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: None,
        };

        serde_json::to_value(response).map_err(|e| {
            JsonRpcError::new(
                INTERNAL_ERROR,
                format!("Failed to serialize tool response: {}", e),
            )
        })
    }
}
