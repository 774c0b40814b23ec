//! Stdio transport driven through an in-memory duplex pipe

use serde_json::Value;
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader};

use clickup_mcp::mcp::{build_registry, stdio::serve, McpServer};

#[tokio::test]
async fn test_initialize_then_call_over_stdio() {
    let (client_side, server_side) = duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server_side);
    let (client_read, mut client_write) = tokio::io::split(client_side);

    let server_task = tokio::spawn(async move {
        let server = McpServer::new(build_registry(None));
        serve(&server, BufReader::new(server_read), server_write).await
    });

    client_write
        .write_all(
            concat!(
                "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{\"protocolVersion\":\"2024-11-05\",\"capabilities\":{},\"clientInfo\":{\"name\":\"test\",\"version\":\"1.0\"}}}\n",
                "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
                "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/call\",\"params\":{\"name\":\"clickup_ping\",\"arguments\":{}}}\n",
                "this is not json\n",
            )
            .as_bytes(),
        )
        .await
        .unwrap();
    client_write.shutdown().await.unwrap();

    let mut lines = BufReader::new(client_read).lines();
    let mut responses = Vec::new();
    while let Some(line) = lines.next_line().await.unwrap() {
        responses.push(serde_json::from_str::<Value>(&line).unwrap());
    }
    server_task.await.unwrap().unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "clickup-mcp");

    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["message"], "pong");

    assert_eq!(responses[2]["error"]["code"], -32700);
    assert!(responses[2]["id"].is_null());
}
