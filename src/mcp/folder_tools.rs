use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry};
use super::types::Tool;
use crate::{
    clickup::{models::CreateFolderRequest, ClickUpClient},
    error::Result,
};

pub fn register_folder_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetFoldersTool::new(Arc::clone(clickup)));
    registry.register(CreateFolderTool::new(Arc::clone(clickup)));
}

pub struct GetFoldersTool {
    clickup: Arc<ClickUpClient>,
}

impl GetFoldersTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetFoldersTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let space_id: String = extract_param(&arguments, "spaceId")?;
        let folders = self.clickup.get_folders(&space_id).await?;
        let count = folders.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(folders)?,
            format!("Retrieved {} folders for space {}", count, space_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_folders".to_string(),
            description: "Get all folders in a space".to_string(),
            input_schema: object_schema(
                json!({
                    "spaceId": {
                        "type": "string",
                        "description": "The space ID to get folders for"
                    }
                }),
                &["spaceId"],
            ),
        }
    }
}

pub struct CreateFolderTool {
    clickup: Arc<ClickUpClient>,
}

impl CreateFolderTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for CreateFolderTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let space_id: String = extract_param(&arguments, "spaceId")?;
        let name: String = extract_param(&arguments, "name")?;
        let folder = self
            .clickup
            .create_folder(&space_id, &CreateFolderRequest { name: name.clone() })
            .await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(folder)?,
            format!("Created folder \"{}\" in space {}", name, space_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_create_folder".to_string(),
            description: "Create a new folder in a space".to_string(),
            input_schema: object_schema(
                json!({
                    "spaceId": {
                        "type": "string",
                        "description": "The space ID to create the folder in"
                    },
                    "name": {
                        "type": "string",
                        "description": "Name of the folder"
                    }
                }),
                &["spaceId", "name"],
            ),
        }
    }
}
