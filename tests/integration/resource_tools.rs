//! Folder, list, task, comment, custom field and time tracking tools against a mocked API

use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{envelope, TestContext};

#[tokio::test]
async fn test_get_folders() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/space/S1/folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folders": [{"id": "F1", "name": "Backlog"}, {"id": "F2", "name": "Sprint"}]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(&ctx.call_tool("clickup_get_folders", json!({"spaceId": "S1"})).await);

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Retrieved 2 folders for space S1");
    assert_eq!(body["data"][1]["id"], "F2");
}

#[tokio::test]
async fn test_create_folder() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/space/S1/folder"))
        .and(body_json(json!({"name": "Q3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "F9", "name": "Q3"})))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_create_folder", json!({"spaceId": "S1", "name": "Q3"}))
            .await,
    );

    assert_eq!(body["message"], "Created folder \"Q3\" in space S1");
    assert_eq!(body["data"]["id"], "F9");
}

#[tokio::test]
async fn test_get_lists() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/folder/F1/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lists": [{"id": "L1", "name": "Bugs"}]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(&ctx.call_tool("clickup_get_lists", json!({"folderId": "F1"})).await);

    assert_eq!(body["message"], "Retrieved 1 lists for folder F1");
    assert_eq!(body["data"][0]["name"], "Bugs");
}

#[tokio::test]
async fn test_get_folderless_lists() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/space/S1/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lists": [{"id": "L7", "name": "Inbox"}, {"id": "L8", "name": "Someday"}]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_get_folderless_lists", json!({"spaceId": "S1"}))
            .await,
    );

    assert_eq!(body["message"], "Retrieved 2 folderless lists for space S1");
    assert_eq!(body["data"][0]["id"], "L7");
}

#[tokio::test]
async fn test_create_list_sends_only_given_fields() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/folder/F1/list"))
        .and(body_json(json!({"name": "Release", "content": "v2 work"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "L3", "name": "Release"})),
        )
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool(
            "clickup_create_list",
            json!({"folderId": "F1", "name": "Release", "content": "v2 work"}),
        )
        .await,
    );

    assert_eq!(body["message"], "Created list \"Release\" in folder F1");
    assert_eq!(body["data"]["id"], "L3");
}

#[tokio::test]
async fn test_get_task_passes_options_as_query() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/task/abc"))
        .and(query_param("include_subtasks", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "name": "Write docs",
            "tags": null
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool(
            "clickup_get_task",
            json!({"taskId": "abc", "include_subtasks": true}),
        )
        .await,
    );

    assert_eq!(body["message"], "Retrieved task abc");
    assert_eq!(body["data"]["name"], "Write docs");
    assert_eq!(body["data"]["tags"], json!([]));
}

#[tokio::test]
async fn test_create_task() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/list/L1/task"))
        .and(body_json(json!({"name": "Fix login", "priority": 2, "tags": ["auth"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "t42", "name": "Fix login"})),
        )
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool(
            "clickup_create_task",
            json!({"listId": "L1", "name": "Fix login", "priority": 2, "tags": ["auth"]}),
        )
        .await,
    );

    assert_eq!(body["message"], "Created task \"Fix login\" in list L1");
    assert_eq!(body["data"]["id"], "t42");
}

#[tokio::test]
async fn test_update_task_puts_changed_fields() {
    let ctx = TestContext::new().await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/task/t42"))
        .and(body_json(json!({"status": "done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t42",
            "name": "Fix login",
            "status": {"status": "done"}
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_update_task", json!({"taskId": "t42", "status": "done"}))
            .await,
    );

    assert_eq!(body["message"], "Updated task t42");
    assert_eq!(body["data"]["status"]["status"], "done");
}

#[tokio::test]
async fn test_get_task_comments() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/task/t42/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [
                {"id": "c1", "comment_text": "first"},
                {"id": "c2", "comment_text": "second"},
                {"id": "c3", "comment_text": "third"}
            ]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_get_task_comments", json!({"taskId": "t42"}))
            .await,
    );

    assert_eq!(body["message"], "Retrieved 3 comments for task t42");
    assert_eq!(body["data"][2]["comment_text"], "third");
}

#[tokio::test]
async fn test_create_task_comment() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/task/t42/comment"))
        .and(body_json(json!({"comment_text": "Looks good", "notify_all": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 458,
            "hist_id": "26508",
            "date": 1568036964079u64
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool(
            "clickup_create_task_comment",
            json!({"taskId": "t42", "comment_text": "Looks good", "notify_all": true}),
        )
        .await,
    );

    assert_eq!(body["message"], "Created comment on task t42");
    assert_eq!(body["data"]["id"], 458);
}

#[tokio::test]
async fn test_get_custom_fields() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/list/L1/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fields": [
                {"id": "cf1", "name": "Estimate", "type": "number"},
                {"id": "cf2", "name": "Owner", "type": "users"}
            ]
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_get_custom_fields", json!({"listId": "L1"}))
            .await,
    );

    assert_eq!(body["message"], "Retrieved 2 custom fields for list L1");
    assert_eq!(body["data"][0]["type"], "number");
}

#[tokio::test]
async fn test_stop_time_tracking_unwraps_data() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/team/T1/time_entries/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "e2", "duration": "60000"}
        })))
        .expect(1)
        .mount(&ctx.mock)
        .await;

    let body = envelope(
        &ctx.call_tool("clickup_stop_time_tracking", json!({"teamId": "T1"}))
            .await,
    );

    assert_eq!(body["message"], "Stopped time tracking for team T1");
    assert_eq!(body["data"]["id"], "e2");
}
