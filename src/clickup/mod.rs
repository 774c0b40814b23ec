//! HTTP client for the ClickUp v2 REST API.

pub mod error;
pub mod models;
pub mod query;

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

pub use error::ClickUpError;
use error::extract_error_message;
use models::*;
use query::to_query_pairs;

pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub type Result<T> = std::result::Result<T, ClickUpError>;

/// Thin wrapper over `reqwest` that authenticates, logs and unwraps ClickUp responses
#[derive(Debug, Clone)]
pub struct ClickUpClient {
    client: Client,
    base_url: String,
}

impl ClickUpClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_config(token, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_config(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(token).map_err(|e| {
            ClickUpError::Transport {
                message: format!("Invalid ClickUp token: {}", e),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ClickUpError::Transport {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Teams

    pub async fn get_teams(&self) -> Result<Vec<Team>> {
        let body = self.send(self.request(Method::GET, "/team")).await?;
        unwrap_field(body, "teams")
    }

    // Spaces

    pub async fn get_spaces(&self, team_id: &str) -> Result<Vec<Space>> {
        let path = format!("/team/{}/space", team_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "spaces")
    }

    pub async fn create_space(&self, team_id: &str, request: &CreateSpaceRequest) -> Result<Space> {
        let path = format!("/team/{}/space", team_id);
        let body = self
            .send(self.request(Method::POST, &path).json(request))
            .await?;
        decode(body)
    }

    // Folders

    pub async fn get_folders(&self, space_id: &str) -> Result<Vec<Folder>> {
        let path = format!("/space/{}/folder", space_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "folders")
    }

    pub async fn create_folder(
        &self,
        space_id: &str,
        request: &CreateFolderRequest,
    ) -> Result<Folder> {
        let path = format!("/space/{}/folder", space_id);
        let body = self
            .send(self.request(Method::POST, &path).json(request))
            .await?;
        decode(body)
    }

    // Lists

    pub async fn get_lists(&self, folder_id: &str) -> Result<Vec<List>> {
        let path = format!("/folder/{}/list", folder_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "lists")
    }

    pub async fn get_folderless_lists(&self, space_id: &str) -> Result<Vec<List>> {
        let path = format!("/space/{}/list", space_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "lists")
    }

    pub async fn create_list(&self, folder_id: &str, request: &CreateListRequest) -> Result<List> {
        let path = format!("/folder/{}/list", folder_id);
        let body = self
            .send(self.request(Method::POST, &path).json(request))
            .await?;
        decode(body)
    }

    // Tasks

    pub async fn get_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<Task>> {
        let path = format!("/list/{}/task", list_id);
        let body = self
            .send(with_query(self.request(Method::GET, &path), query)?)
            .await?;
        unwrap_field(body, "tasks")
    }

    pub async fn get_task(&self, task_id: &str, options: &GetTaskOptions) -> Result<Task> {
        let path = format!("/task/{}", task_id);
        let body = self
            .send(with_query(self.request(Method::GET, &path), options)?)
            .await?;
        decode(body)
    }

    pub async fn create_task(&self, list_id: &str, request: &CreateTaskRequest) -> Result<Task> {
        let path = format!("/list/{}/task", list_id);
        let body = self
            .send(self.request(Method::POST, &path).json(request))
            .await?;
        decode(body)
    }

    pub async fn update_task(&self, task_id: &str, request: &UpdateTaskRequest) -> Result<Task> {
        let path = format!("/task/{}", task_id);
        let body = self
            .send(self.request(Method::PUT, &path).json(request))
            .await?;
        decode(body)
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let path = format!("/task/{}", task_id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    // Comments

    pub async fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        let path = format!("/task/{}/comment", task_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "comments")
    }

    /// Returns the raw creation receipt (`id`, `hist_id`, `date`)
    pub async fn create_task_comment(
        &self,
        task_id: &str,
        request: &CreateCommentRequest,
    ) -> Result<Value> {
        let path = format!("/task/{}/comment", task_id);
        self.send(self.request(Method::POST, &path).json(request))
            .await
    }

    // Custom fields

    pub async fn get_custom_fields(&self, list_id: &str) -> Result<Vec<CustomField>> {
        let path = format!("/list/{}/field", list_id);
        let body = self.send(self.request(Method::GET, &path)).await?;
        unwrap_field(body, "fields")
    }

    /// `value` is passed through untouched; its shape depends on the field type
    pub async fn set_custom_field_value(
        &self,
        task_id: &str,
        field_id: &str,
        value: Value,
    ) -> Result<()> {
        let path = format!("/task/{}/field/{}", task_id, field_id);
        self.send(
            self.request(Method::POST, &path)
                .json(&json!({ "value": value })),
        )
        .await?;
        Ok(())
    }

    // Time tracking

    pub async fn get_time_entries(
        &self,
        team_id: &str,
        query: &TimeEntryQuery,
    ) -> Result<Vec<TimeEntry>> {
        let path = format!("/team/{}/time_entries", team_id);
        let body = self
            .send(with_query(self.request(Method::GET, &path), query)?)
            .await?;
        unwrap_field(body, "data")
    }

    pub async fn start_time_tracking(
        &self,
        team_id: &str,
        request: &StartTimeEntryRequest,
    ) -> Result<Value> {
        let path = format!("/team/{}/time_entries/start", team_id);
        let body = self
            .send(self.request(Method::POST, &path).json(request))
            .await?;
        Ok(unwrap_optional_field(body, "data"))
    }

    pub async fn stop_time_tracking(&self, team_id: &str) -> Result<Value> {
        let path = format!("/team/{}/time_entries/stop", team_id);
        let body = self.send(self.request(Method::POST, &path)).await?;
        Ok(unwrap_optional_field(body, "data"))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request, logging both directions, and return the JSON body.
    ///
    /// Empty success bodies decode to `Value::Null`.
    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let request = builder.build().map_err(|e| {
            error!("Request error: {}", e);
            ClickUpError::Transport {
                message: e.to_string(),
            }
        })?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!("-> {} {}", method, request.url());

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = ClickUpError::from_reqwest(e);
                error!("{} {} {}: {}", err.status_label(), method, path, err.message());
                return Err(err);
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let err = ClickUpError::from_reqwest(e);
            error!("{} {} {}: {}", err.status_label(), method, path, err.message());
            err
        })?;

        if !status.is_success() {
            let err = ClickUpError::Api {
                status: status.as_u16(),
                message: extract_error_message(status.as_u16(), &text),
            };
            error!("{} {} {}: {}", err.status_label(), method, path, err.message());
            return Err(err);
        }

        debug!("<- {} {} {}", status.as_u16(), method, path);

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClickUpError::Decode {
            message: e.to_string(),
        })
    }
}

fn with_query<T: Serialize>(builder: RequestBuilder, options: &T) -> Result<RequestBuilder> {
    let pairs = to_query_pairs(options)?;
    if pairs.is_empty() {
        Ok(builder)
    } else {
        Ok(builder.query(&pairs))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| ClickUpError::Decode {
        message: e.to_string(),
    })
}

/// Strip ClickUp's single-key container (`{"teams": [...]}`) and decode the inner value
fn unwrap_field<T: DeserializeOwned>(body: Value, field: &str) -> Result<T> {
    match body {
        Value::Object(mut map) => match map.remove(field) {
            Some(inner) => decode(inner),
            None => Err(ClickUpError::MissingField {
                field: field.to_string(),
            }),
        },
        _ => Err(ClickUpError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn unwrap_optional_field(body: Value, field: &str) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(field) => {
            map.remove(field).unwrap_or(Value::Null)
        }
        other => other,
    }
}
