use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{
    extract_args, extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry,
};
use super::types::Tool;
use crate::{
    clickup::{models::CreateSpaceRequest, ClickUpClient},
    error::Result,
};

pub fn register_space_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetSpacesTool::new(Arc::clone(clickup)));
    registry.register(CreateSpaceTool::new(Arc::clone(clickup)));
}

pub struct GetSpacesTool {
    clickup: Arc<ClickUpClient>,
}

impl GetSpacesTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetSpacesTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let team_id: String = extract_param(&arguments, "teamId")?;
        let spaces = self.clickup.get_spaces(&team_id).await?;
        let count = spaces.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(spaces)?,
            format!("Retrieved {} spaces for team {}", count, team_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_spaces".to_string(),
            description: "Get all spaces for a team".to_string(),
            input_schema: object_schema(
                json!({
                    "teamId": {
                        "type": "string",
                        "description": "The team ID to get spaces for"
                    }
                }),
                &["teamId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct CreateSpaceArgs {
    #[serde(rename = "teamId")]
    team_id: String,
    #[serde(flatten)]
    request: CreateSpaceRequest,
}

pub struct CreateSpaceTool {
    clickup: Arc<ClickUpClient>,
}

impl CreateSpaceTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for CreateSpaceTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: CreateSpaceArgs = extract_args(arguments)?;
        let space = self
            .clickup
            .create_space(&args.team_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(space)?,
            format!(
                "Created space \"{}\" in team {}",
                args.request.name, args.team_id
            ),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_create_space".to_string(),
            description: "Create a new space in a team".to_string(),
            input_schema: object_schema(
                json!({
                    "teamId": {
                        "type": "string",
                        "description": "The team ID to create the space in"
                    },
                    "name": {
                        "type": "string",
                        "description": "Name of the space"
                    },
                    "multiple_assignees": {
                        "type": "boolean",
                        "description": "Allow multiple assignees on tasks (default: true)"
                    },
                    "features": {
                        "type": "object",
                        "description": "Space features configuration"
                    }
                }),
                &["teamId", "name"],
            ),
        }
    }
}
