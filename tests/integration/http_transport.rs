//! HTTP/SSE transport: routing, session lifecycle and response delivery

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tower::ServiceExt;

use clickup_mcp::server::build_router;

use crate::common::demo_state;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_message(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn app() -> Router {
    build_router(demo_state())
}

#[tokio::test]
async fn test_health_reports_demo_environment() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "clickup-mcp");
    assert_eq!(body["tools"], 1);
    assert_eq!(body["mode"], "http");
    assert_eq!(body["clickup_connected"], false);
    assert_eq!(body["environment"]["demo_mode"], true);
    assert_eq!(body["environment"]["has_token"], false);
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn test_tools_lists_names() {
    let response = app()
        .oneshot(Request::get("/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body, json!({"tools": ["clickup_ping"], "count": 1}));
}

#[tokio::test]
async fn test_post_without_session_id_is_bad_request() {
    let response = app()
        .oneshot(post_message("/mcp", r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_to_unknown_session_is_not_found() {
    let response = app()
        .oneshot(post_message(
            "/mcp?sessionId=does-not-exist",
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let state = demo_state();
    let (guard, _rx) = state.sessions.open();
    let uri = format!("/mcp?sessionId={}", guard.id());

    let response = build_router(state)
        .oneshot(post_message(&uri, "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_accepted_message_is_answered_on_its_own_session() {
    let state = demo_state();
    let (first, mut first_rx) = state.sessions.open();
    let (_second, mut second_rx) = state.sessions.open();
    let uri = format!("/mcp?sessionId={}", first.id());

    let response = build_router(state)
        .oneshot(post_message(
            &uri,
            r#"{"jsonrpc":"2.0","id":"p-1","method":"ping"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let delivered = timeout(Duration::from_secs(5), first_rx.recv())
        .await
        .expect("response delivered")
        .expect("session open");
    assert_eq!(delivered.id, Some(json!("p-1")));
    assert_eq!(delivered.result, Some(json!({})));
    assert!(second_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_preflight_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/mcp")
                .header(header::ORIGIN, "http://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

/// Full round trip over a real socket: open the stream, read the endpoint,
/// POST to it and read the answer back from the stream.
#[tokio::test]
async fn test_sse_round_trip() {
    let state = demo_state();
    let sessions = state.sessions.clone();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    let client = reqwest::Client::new();
    let mut stream = client
        .get(format!("http://{}/mcp", address))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), reqwest::StatusCode::OK);

    let mut received = String::new();
    let endpoint = timeout(Duration::from_secs(5), async {
        loop {
            let chunk = stream.chunk().await.unwrap().expect("stream open");
            received.push_str(&String::from_utf8_lossy(&chunk));
            if let Some(line) = received
                .lines()
                .skip_while(|l| *l != "event: endpoint")
                .find_map(|l| l.strip_prefix("data: "))
            {
                return line.to_string();
            }
        }
    })
    .await
    .expect("endpoint event");
    assert!(endpoint.starts_with("/mcp?sessionId="));
    assert_eq!(sessions.len(), 1);

    let accepted = client
        .post(format!("http://{}{}", address, endpoint))
        .header("Content-Type", "application/json")
        .body(r#"{"jsonrpc":"2.0","id":42,"method":"tools/list"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), reqwest::StatusCode::ACCEPTED);

    received.clear();
    let message = timeout(Duration::from_secs(5), async {
        loop {
            let chunk = stream.chunk().await.unwrap().expect("stream open");
            received.push_str(&String::from_utf8_lossy(&chunk));
            if let Some(line) = received
                .lines()
                .skip_while(|l| *l != "event: message")
                .find_map(|l| l.strip_prefix("data: "))
            {
                return serde_json::from_str::<Value>(line).unwrap();
            }
        }
    })
    .await
    .expect("message event");
    assert_eq!(message["id"], 42);
    assert_eq!(message["result"]["tools"][0]["name"], "clickup_ping");

    drop(stream);
    timeout(Duration::from_secs(5), async {
        while !sessions.is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("session removed after disconnect");
}
