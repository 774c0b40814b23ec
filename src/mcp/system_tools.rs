use async_trait::async_trait;
use serde_json::{json, Value};

use super::tools::{object_schema, ResultEnvelope, ToolHandler, ToolRegistry};
use super::types::Tool;
use crate::error::Result;

pub fn register_system_tools(registry: &mut ToolRegistry) {
    registry.register(PingTool);
}

/// Liveness check that never touches the remote API
pub struct PingTool;

#[async_trait]
impl ToolHandler for PingTool {
    async fn call(&self, _arguments: Option<Value>) -> Result<ResultEnvelope> {
        Ok(ResultEnvelope::success(
            json!({
                "status": "ok",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
            "pong",
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_ping".to_string(),
            description: "Check that the server is reachable (demo mode)".to_string(),
            input_schema: object_schema(json!({}), &[]),
        }
    }
}
