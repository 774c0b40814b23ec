use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{
    extract_args, extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry,
};
use super::types::Tool;
use crate::{
    clickup::{models::CreateCommentRequest, ClickUpClient},
    error::Result,
};

pub fn register_comment_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetTaskCommentsTool::new(Arc::clone(clickup)));
    registry.register(CreateTaskCommentTool::new(Arc::clone(clickup)));
}

pub struct GetTaskCommentsTool {
    clickup: Arc<ClickUpClient>,
}

impl GetTaskCommentsTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetTaskCommentsTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let task_id: String = extract_param(&arguments, "taskId")?;
        let comments = self.clickup.get_task_comments(&task_id).await?;
        let count = comments.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(comments)?,
            format!("Retrieved {} comments for task {}", count, task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_task_comments".to_string(),
            description: "Get all comments for a task".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to get comments for"
                    }
                }),
                &["taskId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct CreateCommentArgs {
    #[serde(rename = "taskId")]
    task_id: String,
    #[serde(flatten)]
    request: CreateCommentRequest,
}

pub struct CreateTaskCommentTool {
    clickup: Arc<ClickUpClient>,
}

impl CreateTaskCommentTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for CreateTaskCommentTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: CreateCommentArgs = extract_args(arguments)?;
        let comment = self
            .clickup
            .create_task_comment(&args.task_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            comment,
            format!("Created comment on task {}", args.task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_create_task_comment".to_string(),
            description: "Create a new comment on a task".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to comment on"
                    },
                    "comment_text": {
                        "type": "string",
                        "description": "The comment text"
                    },
                    "assignee": {
                        "type": "number",
                        "description": "User ID to assign the comment to"
                    },
                    "notify_all": {
                        "type": "boolean",
                        "description": "Notify all task watchers"
                    }
                }),
                &["taskId", "comment_text"],
            ),
        }
    }
}
