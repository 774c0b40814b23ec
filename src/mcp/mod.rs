pub mod comment_tools;
pub mod constants;
pub mod custom_field_tools;
pub mod folder_tools;
pub mod list_tools;
pub mod server;
pub mod space_tools;
pub mod stdio;
pub mod system_tools;
pub mod task_tools;
pub mod team_tools;
pub mod time_tracking_tools;
pub mod tools;
pub mod types;

use std::sync::Arc;

use crate::clickup::ClickUpClient;
use tools::ToolRegistry;

// Re-export commonly used constants and helpers
pub use constants::{JsonRpcEnvelopes, MCP_PROTOCOL_VERSION, SERVER_NAME};
pub use server::McpServer;

/// Build the tool table. Without a client only the ping tool is available.
pub fn build_registry(clickup: Option<Arc<ClickUpClient>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    match clickup {
        Some(clickup) => {
            team_tools::register_team_tools(&mut registry, &clickup);
            space_tools::register_space_tools(&mut registry, &clickup);
            folder_tools::register_folder_tools(&mut registry, &clickup);
            list_tools::register_list_tools(&mut registry, &clickup);
            task_tools::register_task_tools(&mut registry, &clickup);
            comment_tools::register_comment_tools(&mut registry, &clickup);
            custom_field_tools::register_custom_field_tools(&mut registry, &clickup);
            time_tracking_tools::register_time_tracking_tools(&mut registry, &clickup);
        }
        None => system_tools::register_system_tools(&mut registry),
    }

    registry
}
