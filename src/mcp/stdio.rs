use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::server::McpServer;
use super::types::{JsonRpcError, JsonRpcResponse, PARSE_ERROR};
use crate::error::Result;

/// Serve newline-delimited JSON-RPC until the reader reaches EOF.
///
/// Lines that are not UTF-8 are answered with a parse error; only I/O
/// failures end the loop.
pub async fn serve<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                server.handle_message(trimmed).await
            }
            Err(e) => {
                warn!("Discarding non UTF-8 input line: {}", e);
                Some(JsonRpcResponse::failure(
                    Some(Value::Null),
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ))
            }
        };

        let Some(response) = response else {
            continue;
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    debug!("stdin closed");
    Ok(())
}

/// Run the stdio transport on the process streams
pub async fn run_stdio_server(server: &McpServer) -> Result<()> {
    info!(
        "ClickUp MCP server running on stdio with {} tools",
        server.tools.len()
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(server, stdin, tokio::io::stdout()).await
}
