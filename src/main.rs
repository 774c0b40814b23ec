use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use clickup_mcp::{
    check::run_connection_check,
    config::{Config, LogLevel, ServerMode},
    mcp::{build_registry, stdio::run_stdio_server, McpServer},
    server::{run_server, AppState},
};

#[derive(Parser)]
#[command(name = "clickup-mcp")]
#[command(about = "MCP server exposing the ClickUp API as callable tools")]
#[command(version)]
struct Args {
    /// ClickUp personal API token
    #[arg(long, env = "CLICKUP_PERSONAL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Transport to serve MCP over
    #[arg(long, env = "SERVER_MODE", value_enum, default_value_t = ServerMode::Stdio)]
    mode: ServerMode,

    /// Server host (http mode)
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port (http mode)
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// ClickUp API base URL
    #[arg(long, env = "CLICKUP_API_BASE_URL", default_value = clickup_mcp::clickup::DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Timeout for ClickUp API requests in seconds
    #[arg(long, env = "CLICKUP_REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Interval between SSE keep-alive comments in seconds
    #[arg(long, env = "SSE_KEEP_ALIVE_SECS", default_value = "30")]
    keep_alive_secs: u64,

    /// Also write daily rolling log files into this directory
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Run without a token, exposing only the ping tool
    #[arg(long, env = "DEMO_MODE")]
    demo: bool,

    /// Verify the token against the ClickUp API and exit
    #[arg(long)]
    check_connection: bool,
}

impl Args {
    fn to_config(&self) -> Config {
        Config {
            clickup_token: self.token.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            log_level: self.log_level,
            mode: self.mode,
            host: self.host.clone(),
            port: self.port,
            keep_alive_secs: self.keep_alive_secs,
            demo_mode: self.demo,
        }
    }
}

/// Console logs go to stderr so stdout stays a clean protocol channel
fn init_tracing(args: &Args) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());

    match &args.log_dir {
        Some(logs_dir) => {
            std::fs::create_dir_all(logs_dir).with_context(|| {
                format!("Failed to create log directory {}", logs_dir.display())
            })?;
            let file_appender = tracing_appender::rolling::daily(logs_dir, "clickup-mcp.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_filter(env_filter),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let _guard = match init_tracing(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Fatal error: {}", panic_info);
        std::process::exit(1);
    }));

    let config = args.to_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let clickup = match config.clickup_client() {
        Ok(clickup) => clickup,
        Err(e) => {
            error!("Failed to create ClickUp client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.check_connection {
        let passed = match &clickup {
            Some(clickup) => run_connection_check(clickup).await,
            None => {
                error!("Connection check needs a token and is unavailable in demo mode");
                false
            }
        };
        return if passed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    info!("Starting ClickUp MCP Server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Mode: {}", config.mode);
    if config.demo_mode {
        info!("Demo mode enabled, only clickup_ping is available");
    }

    let clickup_connected = clickup.is_some();
    let mcp_server = Arc::new(McpServer::new(build_registry(clickup)));

    let result = match config.mode {
        ServerMode::Stdio => run_stdio_server(&mcp_server).await,
        ServerMode::Http => run_server(AppState::new(config, mcp_server, clickup_connected)).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to start server: {}", e);
            ExitCode::FAILURE
        }
    }
}
