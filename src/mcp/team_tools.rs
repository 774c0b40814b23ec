use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::tools::{object_schema, ResultEnvelope, ToolHandler, ToolRegistry};
use super::types::Tool;
use crate::{clickup::ClickUpClient, error::Result};

pub fn register_team_tools(registry: &mut ToolRegistry, clickup: &Arc<ClickUpClient>) {
    registry.register(GetTeamsTool::new(Arc::clone(clickup)));
}

/// Lists the workspaces ("teams") visible to the token.
///
/// Unlike the other tools, a remote failure here is reported inside the
/// envelope (`success: false`) instead of failing the call, so it can double as
/// a connectivity check.
pub struct GetTeamsTool {
    clickup: Arc<ClickUpClient>,
}

impl GetTeamsTool {
    pub fn new(clickup: Arc<ClickUpClient>) -> Self {
        Self { clickup }
    }
}

#[async_trait]
impl ToolHandler for GetTeamsTool {
    async fn call(&self, _arguments: Option<Value>) -> Result<ResultEnvelope> {
        match self.clickup.get_teams().await {
            Ok(teams) => {
                let count = teams.len();
                Ok(ResultEnvelope::success(
                    serde_json::to_value(teams)?,
                    format!("Retrieved {} teams", count),
                ))
            }
            Err(e) => {
                warn!("Team lookup failed: {}", e);
                Ok(ResultEnvelope::failure(
                    e.to_string(),
                    "Failed to retrieve teams",
                ))
            }
        }
    }

    fn definition(&self) -> Tool {
        Tool {
            name: "clickup_get_teams".to_string(),
            description: "Get all teams for the authenticated user".to_string(),
            input_schema: object_schema(json!({}), &[]),
        }
    }
}
