use std::fmt;

/// Failure of a single call against the ClickUp API
#[derive(Debug, thiserror::Error)]
pub enum ClickUpError {
    #[error("ClickUp API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("ClickUp API error (unknown): {message}")]
    Transport { message: String },

    #[error("Failed to decode ClickUp response: {message}")]
    Decode { message: String },

    #[error("ClickUp response is missing the '{field}' field")]
    MissingField { field: String },
}

impl ClickUpError {
    /// HTTP status of the remote response, `None` when no response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClickUpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn status_label(&self) -> StatusLabel {
        StatusLabel(self.status())
    }

    pub fn message(&self) -> String {
        match self {
            ClickUpError::Api { message, .. }
            | ClickUpError::Transport { message }
            | ClickUpError::Decode { message } => message.clone(),
            ClickUpError::MissingField { field } => format!("missing field '{}'", field),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClickUpError::Decode {
                message: err.to_string(),
            };
        }
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        match err.status() {
            Some(status) => ClickUpError::Api {
                status: status.as_u16(),
                message,
            },
            None => ClickUpError::Transport { message },
        }
    }
}

/// Renders a status code, or `unknown` when the request never got a response
pub struct StatusLabel(Option<u16>);

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "{}", status),
            None => write!(f, "unknown"),
        }
    }
}

/// Pull the conventional error text out of a ClickUp error body.
///
/// ClickUp reports failures as `{"err": "...", "ECODE": "..."}`. Anything else
/// falls back to the raw body, then to a generic line naming the status.
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["err", "error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    format!("Request failed with status code {}", status)
}
