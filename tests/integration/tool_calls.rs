//! Tool dispatch against a mocked ClickUp API

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{
    matchers::{body_json, body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use clickup_mcp::{
    clickup::{ClickUpClient, ClickUpError},
    mcp::{
        build_registry,
        types::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND},
        McpServer,
    },
};

use crate::common::{envelope, TestContext, TEST_TOKEN};

#[tokio::test]
async fn test_get_teams_counts_and_sends_raw_token() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teams": [
                {"id": "1", "name": "Alpha"},
                {"id": "2", "name": "Beta"},
                {"id": "3", "name": "Gamma"}
            ]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let response = ctx.call_tool("clickup_get_teams", json!({})).await;
    let body = envelope(&response);

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Retrieved 3 teams");
    assert_eq!(body["data"][1]["name"], "Beta");
}

#[tokio::test]
async fn test_get_teams_failure_stays_in_envelope() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"err": "Token invalid", "ECODE": "OAUTH_025"})),
        )
        .mount(&ctx.mock)
        .await;

    let response = ctx.call_tool("clickup_get_teams", json!({})).await;
    assert!(response.error.is_none());

    let body = envelope(&response);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to retrieve teams");
    assert_eq!(body["error"], "ClickUp API error (401): Token invalid");
}

#[tokio::test]
async fn test_remote_error_propagates_as_internal_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team/42/space"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"err": "Token invalid", "ECODE": "OAUTH_025"})),
        )
        .mount(&ctx.mock)
        .await;

    let response = ctx
        .call_tool("clickup_get_spaces", json!({"teamId": "42"}))
        .await;
    let error = response.error.expect("call fails");

    assert_eq!(error.code, INTERNAL_ERROR);
    assert!(error.message.starts_with("Tool execution failed: "));
    assert!(error.message.contains("401"));
    assert!(error.message.contains("Token invalid"));
}

#[tokio::test]
async fn test_timeout_reports_unknown_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"teams": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team/42/space"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"spaces": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock)
        .await;
    let client = ClickUpClient::with_config(
        TEST_TOKEN,
        &format!("{}/api/v2", mock.uri()),
        Duration::from_millis(200),
    )
    .expect("client builds");

    let err = client.get_teams().await.expect_err("request times out");
    assert_matches!(err, ClickUpError::Transport { .. });
    assert_eq!(err.status(), None);
    assert_eq!(err.status_label().to_string(), "unknown");
    assert!(err.message().contains("timed out"));

    let server = McpServer::new(build_registry(Some(Arc::new(client))));
    let response = server
        .handle_message(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"clickup_get_spaces","arguments":{"teamId":"42"}}}"#,
        )
        .await
        .expect("answered");
    let error = response.error.expect("call fails");
    assert_eq!(error.code, INTERNAL_ERROR);
    assert!(error.message.contains("(unknown)"));
}

#[tokio::test]
async fn test_array_filters_are_repeated_query_params() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/list/L1/task"))
        .and(query_param("statuses", "open"))
        .and(query_param("statuses", "closed"))
        .and(query_param("archived", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tasks": [{"id": "t1", "name": "First"}, {"id": "t2", "name": "Second"}]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let response = ctx
        .call_tool(
            "clickup_get_tasks",
            json!({"listId": "L1", "statuses": ["open", "closed"], "archived": false}),
        )
        .await;
    let body = envelope(&response);
    assert_eq!(body["message"], "Retrieved 2 tasks for list L1");

    let requests = ctx.mock.received_requests().await.expect("recording enabled");
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("statuses=open"));
    assert!(query.contains("statuses=closed"));
    assert!(!query.contains("%2C"));
}

#[tokio::test]
async fn test_create_space_defaults_multiple_assignees() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/team/T9/space"))
        .and(body_partial_json(json!({"name": "Roadmap", "multiple_assignees": true})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "S1", "name": "Roadmap"})),
        )
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let response = ctx
        .call_tool("clickup_create_space", json!({"teamId": "T9", "name": "Roadmap"}))
        .await;
    let body = envelope(&response);

    assert_eq!(body["message"], "Created space \"Roadmap\" in team T9");
    assert_eq!(body["data"]["id"], "S1");
}

#[tokio::test]
async fn test_delete_task_returns_null_data() {
    let ctx = TestContext::new().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/task/abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let response = ctx
        .call_tool("clickup_delete_task", json!({"taskId": "abc"}))
        .await;
    let body = envelope(&response);

    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "Deleted task abc");
}

#[tokio::test]
async fn test_set_custom_field_posts_value() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/task/t1/field/f1"))
        .and(body_json(json!({"value": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let response = ctx
        .call_tool(
            "clickup_set_custom_field_value",
            json!({"taskId": "t1", "fieldId": "f1", "value": 5}),
        )
        .await;
    let body = envelope(&response);

    assert_eq!(body["message"], "Set custom field f1 on task t1");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_time_entries_unwrap_data() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/team/T1/time_entries"))
        .and(query_param("assignee", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "e1", "duration": "3600000"}]
        })))
        .mount(&ctx.mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/team/T1/time_entries/start"))
        .and(body_partial_json(json!({"tid": "t5"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "e2"}})),
        )
        .mount(&ctx.mock)
        .await;

    let listed = envelope(
        &ctx.call_tool(
            "clickup_get_time_entries",
            json!({"teamId": "T1", "assignee": 7}),
        )
        .await,
    );
    assert_eq!(listed["message"], "Retrieved 1 time entries for team T1");
    assert_eq!(listed["data"][0]["id"], "e1");

    let started = envelope(
        &ctx.call_tool(
            "clickup_start_time_tracking",
            json!({"teamId": "T1", "tid": "t5"}),
        )
        .await,
    );
    assert_eq!(started["message"], "Started time tracking for task t5");
    assert_eq!(started["data"]["id"], "e2");
}

#[tokio::test]
async fn test_missing_required_argument_fails_without_remote_call() {
    let ctx = TestContext::new().await;

    let response = ctx.call_tool("clickup_get_task", json!({})).await;
    let error = response.error.expect("call fails");

    assert_eq!(error.code, INTERNAL_ERROR);
    assert!(error.message.contains("taskId"));
    let requests = ctx.mock.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_unknown_tool_and_missing_params() {
    let ctx = TestContext::new().await;

    let unknown = ctx.call_tool("nonexistent_tool", json!({})).await;
    let error = unknown.error.expect("call fails");
    assert_eq!(error.code, METHOD_NOT_FOUND);
    assert_eq!(error.message, "Tool nonexistent_tool not found");

    let missing = ctx
        .server
        .handle_message(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call"}"#)
        .await
        .expect("answered");
    assert_eq!(missing.error.expect("call fails").code, INVALID_PARAMS);
}
