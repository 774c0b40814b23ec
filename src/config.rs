use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;

use crate::clickup::ClickUpClient;
use crate::error::{AppError, Result};

/// Transport the server is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerMode {
    Stdio,
    Http,
}

impl ServerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerMode::Stdio => "stdio",
            ServerMode::Http => "http",
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log severity threshold, ordered debug < info < warn < error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub clickup_token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: LogLevel,
    pub mode: ServerMode,
    pub host: String,
    pub port: u16,
    pub keep_alive_secs: u64,
    pub demo_mode: bool,
}

impl Config {
    /// Reject configurations that cannot serve any ClickUp tool
    pub fn validate(&self) -> Result<()> {
        if self.demo_mode {
            return Ok(());
        }
        match self.clickup_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err(AppError::Config(
                "CLICKUP_PERSONAL_TOKEN is required".to_string(),
            )),
        }
    }

    pub fn has_token(&self) -> bool {
        self.clickup_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }

    /// ClickUp client for this configuration. Demo mode never talks to ClickUp.
    pub fn clickup_client(&self) -> Result<Option<Arc<ClickUpClient>>> {
        if self.demo_mode {
            return Ok(None);
        }
        let token = self.clickup_token.as_deref().unwrap_or_default().trim();
        if token.is_empty() {
            return Err(AppError::Config(
                "CLICKUP_PERSONAL_TOKEN is required".to_string(),
            ));
        }
        let client =
            ClickUpClient::with_config(token, &self.api_base_url, self.request_timeout())?;
        Ok(Some(Arc::new(client)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clickup_token: None,
            api_base_url: crate::clickup::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            log_level: LogLevel::Info,
            mode: ServerMode::Stdio,
            host: "0.0.0.0".to_string(),
            port: 3000,
            keep_alive_secs: 30,
            demo_mode: false,
        }
    }
}
