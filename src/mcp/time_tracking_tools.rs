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
        models::{StartTimeEntryRequest, TimeEntryQuery},
        ClickUpClient,
    },
    error::Result,
};

pub fn register_time_tracking_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetTimeEntriesTool::new(Arc::clone(clickup)));
    registry.register(StartTimeTrackingTool::new(Arc::clone(clickup)));
    registry.register(StopTimeTrackingTool::new(Arc::clone(clickup)));
}

#[derive(Deserialize)]
struct GetTimeEntriesArgs {
    #[serde(rename = "teamId")]
    team_id: String,
    #[serde(flatten)]
    query: TimeEntryQuery,
}

pub struct GetTimeEntriesTool {
    clickup: Arc<ClickUpClient>,
}

impl GetTimeEntriesTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetTimeEntriesTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: GetTimeEntriesArgs = extract_args(arguments)?;
        let entries = self
            .clickup
            .get_time_entries(&args.team_id, &args.query)
            .await?;
        let count = entries.len();
        Ok(ResultEnvelope::success(
            serde_json::to_value(entries)?,
            format!("Retrieved {} time entries for team {}", count, args.team_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_time_entries".to_string(),
            description: "Get time entries for a team with optional filtering".to_string(),
            input_schema: object_schema(
                json!({
                    "teamId": {
                        "type": "string",
                        "description": "The team ID to get time entries for"
                    },
                    "start_date": {
                        "type": "number",
                        "description": "Start date timestamp in milliseconds"
                    },
                    "end_date": {
                        "type": "number",
                        "description": "End date timestamp in milliseconds"
                    },
                    "assignee": {
                        "type": "number",
                        "description": "Filter by assignee user ID"
                    },
                    "include_task_tags": {
                        "type": "boolean",
                        "description": "Include task tags in response"
                    },
                    "include_location_names": {
                        "type": "boolean",
                        "description": "Include location names in response"
                    },
                    "space_id": {
                        "type": "string",
                        "description": "Filter by space ID"
                    },
                    "folder_id": {
                        "type": "string",
                        "description": "Filter by folder ID"
                    },
                    "list_id": {
                        "type": "string",
                        "description": "Filter by list ID"
                    },
                    "task_id": {
                        "type": "string",
                        "description": "Filter by task ID"
                    }
                }),
                &["teamId"],
            ),
        }
    }
}

#[derive(Deserialize)]
struct StartTimeTrackingArgs {
    #[serde(rename = "teamId")]
    team_id: String,
    #[serde(flatten)]
    request: StartTimeEntryRequest,
}

pub struct StartTimeTrackingTool {
    clickup: Arc<ClickUpClient>,
}

impl StartTimeTrackingTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for StartTimeTrackingTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let args: StartTimeTrackingArgs = extract_args(arguments)?;
        let entry = self
            .clickup
            .start_time_tracking(&args.team_id, &args.request)
            .await?;
        Ok(ResultEnvelope::success(
            entry,
            format!("Started time tracking for task {}", args.request.tid),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_start_time_tracking".to_string(),
            description: "Start time tracking for a task".to_string(),
            input_schema: object_schema(
                json!({
                    "teamId": {
                        "type": "string",
                        "description": "The team ID"
                    },
                    "tid": {
                        "type": "string",
                        "description": "The task ID to track time for"
                    },
                    "description": {
                        "type": "string",
                        "description": "Description for the time entry"
                    },
                    "tags": {
                        "type": "array",
                        "description": "Tags for the time entry"
                    },
                    "billable": {
                        "type": "boolean",
                        "description": "Whether the time is billable"
                    }
                }),
                &["teamId", "tid"],
            ),
        }
    }
}

pub struct StopTimeTrackingTool {
    clickup: Arc<ClickUpClient>,
}

impl StopTimeTrackingTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for StopTimeTrackingTool {
    async fn call(&self, arguments: Option<Value>) -> Result<ResultEnvelope> {
        let team_id: String = extract_param(&arguments, "teamId")?;
        let entry = self.clickup.stop_time_tracking(&team_id).await?;
        Ok(ResultEnvelope::success(
            entry,
            format!("Stopped time tracking for team {}", team_id),
        ))
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_stop_time_tracking".to_string(),
            description: "Stop time tracking for a team".to_string(),
            input_schema: object_schema(
                json!({
                    "teamId": {
                        "type": "string",
                        "description": "The team ID"
                    }
                }),
                &["teamId"],
            ),
        }
    }
}
