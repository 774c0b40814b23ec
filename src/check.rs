use crate::clickup::{
    models::{Space, Team},
    ClickUpClient, ClickUpError,
};

/// What a successful connection check found
#[derive(Debug)]
pub struct ConnectionReport {
    pub teams: Vec<Team>,
    /// Spaces of the first team; a failure here does not fail the check
    pub spaces: Option<Result<Vec<Space>, ClickUpError>>,
}

/// List teams, then the spaces of the first one
pub async fn check_connection(
    clickup: &ClickUpClient,
) -> Result<ConnectionReport, ClickUpError> {
    let teams = clickup.get_teams().await?;
    let spaces = match teams.first() {
        Some(team) => Some(clickup.get_spaces(&team.id).await),
        None => None,
    };
    Ok(ConnectionReport { teams, spaces })
}

/// Remediation hint for a failed check
pub fn failure_hint(error: &ClickUpError) -> &'static str {
    match error.status() {
        Some(401) => "Check your CLICKUP_PERSONAL_TOKEN - it may be invalid or expired",
        Some(403) => "Token is valid but may lack required permissions",
        _ => "Check your internet connection and ClickUp API status",
    }
}

/// Run the check and print the outcome. Returns whether it passed.
pub async fn run_connection_check(clickup: &ClickUpClient) -> bool {
    println!("🔑 Testing ClickUp API connection...");

    match check_connection(clickup).await {
        Ok(report) => {
            println!("✅ Successfully connected to ClickUp API");
            println!("📊 Found {} teams:", report.teams.len());
            for (index, team) in report.teams.iter().enumerate() {
                println!("   {}. {} (ID: {})", index + 1, team.name, team.id);
            }

            match report.spaces {
                Some(Ok(spaces)) => {
                    println!("✅ Found {} spaces", spaces.len());
                    for (index, space) in spaces.iter().take(3).enumerate() {
                        println!("   {}. {} (ID: {})", index + 1, space.name, space.id);
                    }
                }
                Some(Err(e)) => println!("⚠️  Could not fetch spaces: {}", e),
                None => {}
            }

            println!("🎉 Connection check completed successfully!");
            true
        }
        Err(e) => {
            eprintln!("❌ Connection check failed: {}", e);
            eprintln!("💡 {}", failure_hint(&e));
            false
        }
    }
}
