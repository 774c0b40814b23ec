use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry};
use super::types::Tool;
use crate::{
    clickup::ClickUpClient,
    error::{AppError, Result},
};

pub fn register_custom_field_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetCustomFieldsTool::new(Arc::clone(clickup)));
    registry.register(SetCustomFieldValueTool::new(Arc::clone(clickup)));
}

pub struct GetCustomFieldsTool {
    clickup: Arc<ClickUpClient>,
}

impl GetCustomFieldsTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetCustomFieldsTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let list_id: String = extract_param(&arguments, "listId")?;
        let fields = self.clickup.get_custom_fields(&list_id).await?;
        let count = fields.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(fields)?,
            format!("Retrieved {} custom fields for list {}", count, list_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_custom_fields".to_string(),
            description: "Get all custom fields for a list".to_string(),
            input_schema: object_schema(
                json!({
                    "listId": {
                        "type": "string",
                        "description": "The list ID to get custom fields for"
                    }
                }),
                &["listId"],
            ),
        }
    }
}

pub struct SetCustomFieldValueTool {
    clickup: Arc<ClickUpClient>,
}

impl SetCustomFieldValueTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for SetCustomFieldValueTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let task_id: String = extract_param(&arguments, "taskId")?;
        let field_id: String = extract_param(&arguments, "fieldId")?;
        // Any JSON value is legal here, including null (clears the field)
        let value = arguments
            .as_ref()
            .and_then(|args| args.get("value"))
            .cloned()
            .ok_or_else(|| {
                AppError::BadRequest("Missing required parameter 'value'".to_string())
            })?;

        self.clickup
            .set_custom_field_value(&task_id, &field_id, value)
            .await?;
        Ok(ResultEnvelope::success(
            Value::Null,
            format!("Set custom field {} on task {}", field_id, task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_set_custom_field_value".to_string(),
            description: "Set a custom field value on a task".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to set custom field on"
                    },
                    "fieldId": {
                        "type": "string",
                        "description": "The custom field ID"
                    },
                    "value": {
                        "description": "The value to set (type depends on field type)"
                    }
                }),
                &["taskId", "fieldId", "value"],
            ),
        }
    }
}
