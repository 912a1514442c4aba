//! Line-delimited stdio tool host
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! `initialize`, `ping` and `tools/list` are answered inline; each
//! `tools/call` runs as its own task so slow catalog calls never hold up the
//! stream. When input ends or a shutdown signal arrives, unfinished calls are
//! aborted and their responses are never written.

use super::protocol::{
    InitializeResult, McpError, McpMethod, McpRequest, McpResponse, ToolCallParams, ToolCallResult,
    ToolContent, JSONRPC_VERSION,
};
use crate::api::transport::{HttpTransport, Transport};
use crate::tools::{tool_definitions, ToolHandler};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// MCP server exposing the catalog tools
pub struct McpServer<T: Transport = HttpTransport> {
    handler: Arc<ToolHandler<T>>,
}

impl<T: Transport + 'static> McpServer<T> {
    pub fn new(handler: ToolHandler<T>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Serve on process stdin/stdout until EOF or Ctrl-C
    pub async fn serve_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl-C, shutting down");
        };

        tracing::info!("MCP server listening on stdio");
        self.run(stdin, stdout, shutdown).await
    }

    /// Serve on arbitrary streams until EOF or `shutdown` resolves
    pub async fn run<R, W, S>(&self, reader: R, mut writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        let (tx, mut rx) = mpsc::unbounded_channel::<McpResponse>();
        let mut calls = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(response) = rx.recv() => write_message(&mut writer, &response).await?,
                Some(joined) = calls.join_next(), if !calls.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!("Tool call task panicked: {}", e);
                        }
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from input")? else {
                        tracing::info!("Input closed, shutting down");
                        break;
                    };
                    if let Some(response) = self.handle_line(&line, &tx, &mut calls) {
                        write_message(&mut writer, &response).await?;
                    }
                }
            }
        }

        if !calls.is_empty() {
            tracing::warn!("Aborting {} in-flight tool calls", calls.len());
        }
        calls.shutdown().await;

        // Calls that finished before shutdown still get their response
        drop(tx);
        while let Ok(response) = rx.try_recv() {
            write_message(&mut writer, &response).await?;
        }
        writer.flush().await.context("Failed to flush output")?;

        Ok(())
    }

    /// Handle one input line; returns the response to write, if any
    fn handle_line(
        &self,
        line: &str,
        tx: &mpsc::UnboundedSender<McpResponse>,
        calls: &mut JoinSet<()>,
    ) -> Option<McpResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Received invalid JSON: {}", e);
                return Some(McpResponse::err(
                    Value::Null,
                    McpError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: McpRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(McpResponse::err(
                    id,
                    McpError::invalid_request(format!("Invalid request: {}", e)),
                ))
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(McpResponse::err(
                id,
                McpError::invalid_request(format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            ));
        }

        tracing::debug!(method = %request.method, "received request");
        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "ignoring notification");
            return None;
        };

        let result = match McpMethod::from(request.method.as_str()) {
            McpMethod::Initialize => to_value(&InitializeResult::default()),
            McpMethod::Ping => Ok(json!({})),
            McpMethod::ToolsList => Ok(json!({ "tools": tool_definitions() })),
            McpMethod::ToolsCall => {
                let params: ToolCallParams =
                    match serde_json::from_value(request.params.unwrap_or(Value::Null)) {
                        Ok(params) => params,
                        Err(e) => {
                            return Some(McpResponse::err(
                                id,
                                McpError::invalid_params(format!("Invalid tools/call params: {}", e)),
                            ))
                        }
                    };
                self.spawn_call(id, params, tx.clone(), calls);
                return None;
            }
            McpMethod::Initialized | McpMethod::Other(_) => {
                Err(McpError::method_not_found(request.method.as_str()))
            }
        };

        Some(match result {
            Ok(result) => McpResponse::ok(id, result),
            Err(error) => McpResponse::err(id, error),
        })
    }

    fn spawn_call(
        &self,
        id: Value,
        params: ToolCallParams,
        tx: mpsc::UnboundedSender<McpResponse>,
        calls: &mut JoinSet<()>,
    ) {
        let handler = Arc::clone(&self.handler);

        calls.spawn(async move {
            let output = handler.call(&params.name, params.arguments).await;
            let result = ToolCallResult {
                content: vec![ToolContent::Text { text: output.text }],
                is_error: output.is_error,
            };
            let response = match to_value(&result) {
                Ok(result) => McpResponse::ok(id, result),
                Err(error) => McpResponse::err(id, error),
            };
            // The receiver only goes away at shutdown
            let _ = tx.send(response);
        });
    }
}

fn to_value<V: serde::Serialize>(value: &V) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::internal_error(e.to_string()))
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, response: &McpResponse) -> Result<()> {
    let json = serde_json::to_string(response).context("Failed to serialize response")?;
    writer
        .write_all(json.as_bytes())
        .await
        .context("Failed to write response")?;
    writer
        .write_all(b"\n")
        .await
        .context("Failed to write newline")?;
    writer.flush().await.context("Failed to flush output")?;
    Ok(())
}
