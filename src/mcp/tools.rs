use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error};

use super::types::Tool;
use crate::error::{AppError, Result};

/// A named, schema-described operation callable through `tools/call`
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope>;
    fn definition(&self) -> Tool;
}

/// Uniform body returned by every tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub data: Value,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn success(data: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Tool {0} not found")]
    MethodNotFound(String),

    #[error("Tool execution failed: {0}")]
    Internal(String),
}

struct RegisteredTool {
    definition: Tool,
    handler: Box<dyn ToolHandler>,
}

/// Name-indexed tool table, populated once at startup and read-only afterwards
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its definition name. A later registration with the
    /// same name replaces the earlier one in place.
    pub fn register<T: ToolHandler + 'static>(&mut self, tool: T) {
        let definition = tool.definition();
        let name = definition.name.clone();
        let entry = RegisteredTool {
            definition,
            handler: Box::new(tool),
        };

        match self.index.get(&name) {
            Some(&slot) => {
                debug!("Replacing previously registered tool: {}", name);
                self.tools[slot] = entry;
            }
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(entry);
            }
        }
    }

    pub fn get_tool(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.index
            .get(name)
            .map(|&slot| self.tools[slot].handler.as_ref())
    }

    /// Descriptors in registration order
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.definition.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> std::result::Result<ResultEnvelope, DispatchError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| DispatchError::MethodNotFound(name.to_string()))?;

        tool.call(arguments).await.map_err(|e| {
            error!("Tool {} failed: {}", name, e);
            DispatchError::Internal(e.to_string())
        })
    }
}

// Utility function to extract and validate parameters
pub fn extract_param<T>(arguments: &Option<Value>, key: &str) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    match arguments {
        Some(Value::Object(map)) => match map.get(key) {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())
                .map_err(|e| AppError::BadRequest(format!("Invalid parameter '{}': {}", key, e))),
            _ => Err(AppError::BadRequest(format!(
                "Missing required parameter '{}'",
                key
            ))),
        },
        _ => Err(AppError::BadRequest(
            "Arguments must be an object".to_string(),
        )),
    }
}

/// Decode the whole argument object into a typed shape; absent arguments act as `{}`
pub fn extract_args<T>(arguments: Option<Value>) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value @ Value::Object(_)) => value,
        Some(_) => {
            return Err(AppError::BadRequest(
                "Arguments must be an object".to_string(),
            ))
        }
    };
    serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid arguments: {}", e)))
}

/// JSON schema for a flat argument object
pub fn object_schema(properties: Value, required: &[&str]) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
