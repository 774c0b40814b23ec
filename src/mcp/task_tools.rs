use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::tools::{
    extract_args, extract_param, object_schema, ResultEnvelope, ToolHandler, ToolRegistry,
};
use super::types::Tool;
use crate::{
    clickup::{
        models::{CreateTaskRequest, GetTaskOptions, TaskQuery, UpdateTaskRequest},
        ClickUpClient,
    },
    error::Result,
};

pub fn register_task_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetTasksTool::new(Arc::clone(clickup)));
    registry.register(GetTaskTool::new(Arc::clone(clickup)));
    registry.register(CreateTaskTool::new(Arc::clone(clickup)));
    registry.register(UpdateTaskTool::new(Arc::clone(clickup)));
    registry.register(DeleteTaskTool::new(Arc::clone(clickup)));
}

#[derive(Deserialize)]
struct GetTasksArgs {
    #[serde(rename = "listId")]
    list_id: String,
    #[serde(flatten)]
    query: TaskQuery,
}

pub struct GetTasksTool {
    clickup: Arc<ClickUpClient>,
}

impl GetTasksTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetTasksTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: GetTasksArgs = extract_args(arguments)?;
        let tasks = self.clickup.get_tasks(&args.list_id, &args.query).await?;
        let count = tasks.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(tasks)?,
            format!("Retrieved {} tasks for list {}", count, args.list_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_tasks".to_string(),
            description: "Get all tasks in a list with optional filtering".to_string(),
            input_schema: object_schema(
                json!({
                    "listId": {
                        "type": "string",
                        "description": "The list ID to get tasks for"
                    },
                    "archived": {
                        "type": "boolean",
                        "description": "Include archived tasks"
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number for pagination"
                    },
                    "order_by": {
                        "type": "string",
                        "description": "Field to order by (created, updated, due_date)"
                    },
                    "reverse": {
                        "type": "boolean",
                        "description": "Reverse the order"
                    },
                    "subtasks": {
                        "type": "boolean",
                        "description": "Include subtasks"
                    },
                    "statuses": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Filter by statuses"
                    },
                    "include_closed": {
                        "type": "boolean",
                        "description": "Include closed tasks"
                    },
                    "assignees": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Filter by assignee user IDs"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Filter by tags"
                    },
                    "due_date_gt": {
                        "type": "number",
                        "description": "Due date greater than (timestamp)"
                    },
                    "due_date_lt": {
                        "type": "number",
                        "description": "Due date less than (timestamp)"
                    },
                    "date_created_gt": {
                        "type": "number",
                        "description": "Created after (timestamp)"
                    },
                    "date_created_lt": {
                        "type": "number",
                        "description": "Created before (timestamp)"
                    },
                    "date_updated_gt": {
                        "type": "number",
                        "description": "Updated after (timestamp)"
                    },
                    "date_updated_lt": {
                        "type": "number",
                        "description": "Updated before (timestamp)"
                    },
                    "custom_fields": {
                        "type": "array",
                        "description": "Custom field filters ({field_id, operator, value})"
                    }
                }),
                &["listId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct GetTaskArgs {
    #[serde(rename = "taskId")]
    task_id: String,
    #[serde(flatten)]
    options: GetTaskOptions,
}

pub struct GetTaskTool {
    clickup: Arc<ClickUpClient>,
}

impl GetTaskTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetTaskTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: GetTaskArgs = extract_args(arguments)?;
        let task = self.clickup.get_task(&args.task_id, &args.options).await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(task)?,
            format!("Retrieved task {}", args.task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_task".to_string(),
            description: "Get a specific task by ID".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to retrieve"
                    },
                    "custom_task_ids": {
                        "type": "boolean",
                        "description": "Use custom task IDs"
                    },
                    "team_id": {
                        "type": "string",
                        "description": "Team ID (required if using custom task IDs)"
                    },
                    "include_subtasks": {
                        "type": "boolean",
                        "description": "Include subtasks in response"
                    }
                }),
                &["taskId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct CreateTaskArgs {
    #[serde(rename = "listId")]
    list_id: String,
    #[serde(flatten)]
    request: CreateTaskRequest,
}

pub struct CreateTaskTool {
    clickup: Arc<ClickUpClient>,
}

impl CreateTaskTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for CreateTaskTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: CreateTaskArgs = extract_args(arguments)?;
        let task = self
            .clickup
            .create_task(&args.list_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(task)?,
            format!(
                "Created task \"{}\" in list {}",
                args.request.name, args.list_id
            ),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_create_task".to_string(),
            description: "Create a new task in a list".to_string(),
            input_schema: object_schema(
                json!({
                    "listId": {
                        "type": "string",
                        "description": "The list ID to create the task in"
                    },
                    "name": {
                        "type": "string",
                        "description": "Task name"
                    },
                    "description": {
                        "type": "string",
                        "description": "Task description"
                    },
                    "assignees": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Array of assignee user IDs"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of tag names"
                    },
                    "status": {
                        "type": "string",
                        "description": "Task status"
                    },
                    "priority": {
                        "type": "number",
                        "description": "Priority level (1-4, where 1 is urgent)"
                    },
                    "due_date": {
                        "type": "number",
                        "description": "Due date timestamp in milliseconds"
                    },
                    "due_date_time": {
                        "type": "boolean",
                        "description": "Include time in due date"
                    },
                    "time_estimate": {
                        "type": "number",
                        "description": "Time estimate in milliseconds"
                    },
                    "start_date": {
                        "type": "number",
                        "description": "Start date timestamp in milliseconds"
                    },
                    "start_date_time": {
                        "type": "boolean",
                        "description": "Include time in start date"
                    },
                    "notify_all": {
                        "type": "boolean",
                        "description": "Notify all assignees"
                    },
                    "parent": {
                        "type": "string",
                        "description": "Parent task ID (for subtasks)"
                    },
                    "links_to": {
                        "type": "string",
                        "description": "Task ID to link to"
                    },
                    "check_required_custom_fields": {
                        "type": "boolean",
                        "description": "Check required custom fields"
                    },
                    "custom_fields": {
                        "type": "array",
                        "description": "Custom field values"
                    }
                }),
                &["listId", "name"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct UpdateTaskArgs {
    #[serde(rename = "taskId")]
    task_id: String,
    #[serde(flatten)]
    request: UpdateTaskRequest,
}

pub struct UpdateTaskTool {
    clickup: Arc<ClickUpClient>,
}

impl UpdateTaskTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for UpdateTaskTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: UpdateTaskArgs = extract_args(arguments)?;
        let task = self
            .clickup
            .update_task(&args.task_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            serde_json::to_value(task)?,
            format!("Updated task {}", args.task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_update_task".to_string(),
            description: "Update an existing task".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to update"
                    },
                    "name": {
                        "type": "string",
                        "description": "Task name"
                    },
                    "description": {
                        "type": "string",
                        "description": "Task description"
                    },
                    "status": {
                        "type": "string",
                        "description": "Task status"
                    },
                    "priority": {
                        "type": "number",
                        "description": "Priority level (1-4)"
                    },
                    "due_date": {
                        "type": "number",
                        "description": "Due date timestamp in milliseconds"
                    },
                    "due_date_time": {
                        "type": "boolean",
                        "description": "Include time in due date"
                    },
                    "parent": {
                        "type": "string",
                        "description": "Parent task ID"
                    },
                    "time_estimate": {
                        "type": "number",
                        "description": "Time estimate in milliseconds"
                    },
                    "start_date": {
                        "type": "number",
                        "description": "Start date timestamp in milliseconds"
                    },
                    "start_date_time": {
                        "type": "boolean",
                        "description": "Include time in start date"
                    },
                    "assignees": {
                        "type": "object",
                        "properties": {
                            "add": {
                                "type": "array",
                                "items": { "type": "number" },
                                "description": "User IDs to add as assignees"
                            },
                            "rem": {
                                "type": "array",
                                "items": { "type": "number" },
                                "description": "User IDs to remove as assignees"
                            }
                        },
                        "description": "Assignee changes"
                    },
                    "archived": {
                        "type": "boolean",
                        "description": "Archive the task"
                    }
                }),
                &["taskId"],
            ),
        }
    }
}

pub struct DeleteTaskTool {
    clickup: Arc<ClickUpClient>,
}

impl DeleteTaskTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for DeleteTaskTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let task_id: String = extract_param(&arguments, "taskId")?;
        self.clickup.delete_task(&task_id).await?;
        Ok(ResultEnvelope::success(
            Value::Null,
            format!("Deleted task {}", task_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_delete_task".to_string(),
            description: "Delete a task".to_string(),
            input_schema: object_schema(
                json!({
                    "taskId": {
                        "type": "string",
                        "description": "The task ID to delete"
                    }
                }),
                &["taskId"],
            ),
        }
    }
}
