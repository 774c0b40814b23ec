use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{
    extract_args, extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry,
};
use super::types::Tool;
use crate::{
    clickup::{models::CreateListRequest, ClickUpClient},
    error::Result,
};

pub fn register_list_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetListsTool::new(Arc::clone(clickup)));
    registry.register(GetFolderlessListsTool::new(Arc::clone(clickup)));
    registry.register(CreateListTool::new(Arc::clone(clickup)));
}

pub struct GetListsTool {
    clickup: Arc<ClickUpClient>,
}

impl GetListsTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetListsTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let folder_id: String = extract_param(&arguments, "folderId")?;
        let lists = self.clickup.get_lists(&folder_id).await?;
        let count = lists.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(lists)?,
            format!("Retrieved {} lists for folder {}", count, folder_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_lists".to_string(),
            description: "Get all lists in a folder".to_string(),
            input_schema: object_schema(
                json!({
                    "folderId": {
                        "type": "string",
                        "description": "The folder ID to get lists for"
                    }
                }),
                &["folderId"],
            ),
        }
    }
}

/// Lists that live directly under a space
pub struct GetFolderlessListsTool {
    clickup: Arc<ClickUpClient>,
}

impl GetFolderlessListsTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetFolderlessListsTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let space_id: String = extract_param(&arguments, "spaceId")?;
        let lists = self.clickup.get_folderless_lists(&space_id).await?;
        let count = lists.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(lists)?,
            format!("Retrieved {} folderless lists for space {}", count, space_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_folderless_lists".to_string(),
            description: "Get all folderless lists in a space".to_string(),
            input_schema: object_schema(
                json!({
                    "spaceId": {
                        "type": "string",
                        "description": "The space ID to get folderless lists for"
                    }
                }),
                &["spaceId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct CreateListArgs {
    #[serde(rename = "folderId")]
    folder_id: String,
    #[serde(flatten)]
    request: CreateListRequest,
}

pub struct CreateListTool {
    clickup: Arc<ClickUpClient>,
}

impl CreateListTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for CreateListTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: CreateListArgs = extract_args(arguments)?;
        let list = self
            .clickup
            .create_list(&args.folder_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(list)?,
            format!(
                "Created list \"{}\" in folder {}",
                args.request.name, args.folder_id
            ),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_create_list".to_string(),
            description: "Create a new list in a folder".to_string(),
            input_schema: object_schema(
                json!({
                    "folderId": {
                        "type": "string",
                        "description": "The folder ID to create the list in"
                    },
                    "name": {
                        "type": "string",
                        "description": "Name of the list"
                    },
                    "content": {
                        "type": "string",
                        "description": "List description/content"
                    },
                    "due_date": {
                        "type": "number",
                        "description": "Due date timestamp in milliseconds"
                    },
                    "priority": {
                        "type": "number",
                        "description": "Priority level (1-4)"
                    },
                    "assignee": {
                        "type": "number",
                        "description": "Assignee user ID"
                    },
                    "status": {
                        "type": "string",
                        "description": "Initial status for the list"
                    }
                }),
                &["folderId", "name"],
            ),
        }
    }
}
