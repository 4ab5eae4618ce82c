/// JSON-RPC server loop
///
/// This module implements the dispatch loop that:
/// 1. Reads newline-delimited JSON-RPC requests from the input stream
/// 2. Answers `initialize` and `list_tools` directly
/// 3. Runs each `call_tool` request as its own task
/// 4. Writes every response as one line through a single writer task
///
/// Responses to tool calls are written as soon as the tool finishes, so
/// they can come out in a different order than the requests went in.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{registry, ToolCall, ToolContext};
use crate::ServerError;

type Responder = mpsc::UnboundedSender<JsonRpcResponse>;

/// Server that routes JSON-RPC requests to the ADB tools
pub struct McpServer {
    context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a new server sharing the given tool context
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }

    /// Serve requests from stdin, writing responses to stdout
    pub async fn run(&self) -> Result<(), ServerError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests from `reader`, writing responses to `writer`
    ///
    /// Returns once the input is exhausted and every in-flight tool call
    /// has been answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!("Waiting for JSON-RPC requests...");

        let (responder, responses) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_responses(writer, responses));

        let mut reader = BufReader::new(reader);
        let mut record = Vec::new();

        loop {
            record.clear();

            match reader.read_until(b'\n', &mut record).await {
                Ok(0) => {
                    info!("Input closed, finishing in-flight requests");
                    break;
                }
                Ok(_) => self.dispatch(&record, &responder),
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }

        // The writer stops once this and every handler's sender are gone
        drop(responder);
        writer_task.await?;

        info!("Server loop finished");
        Ok(())
    }

    /// Parse one record and route it
    fn dispatch(&self, record: &[u8], responder: &Responder) {
        if record.iter().all(u8::is_ascii_whitespace) {
            return;
        }

        debug!("Received: {}", String::from_utf8_lossy(record).trim_end());

        let request = match parse_request(record) {
            Ok(request) => request,
            Err(e) => {
                error!("Dropping malformed request: {}", e);
                return;
            }
        };

        match request.method() {
            Some(Method::Initialize) => {
                info!("Client initialized");
                let result = serde_json::to_value(InitializeResult::default());
                send_result(responder, request.id, result.map_err(|e| e.to_string()));
            }
            Some(Method::ListTools) => {
                send_result(responder, request.id, Ok(registry::list_tools_result()));
            }
            Some(Method::CallTool) => self.handle_call_tool(request, responder),
            None => {
                warn!("Unsupported method: {:?}", request.method);
                send_result(responder, request.id, Err(METHOD_NOT_SUPPORTED.to_string()));
            }
        }
    }

    /// Validate a `call_tool` request and start its handler
    fn handle_call_tool(&self, request: JsonRpcRequest, responder: &Responder) {
        let id = request.id;

        let params = match request.params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                send_result(responder, id, Err(format!("Invalid parameters: {}", e)));
                return;
            }
            None => {
                send_result(responder, id, Err("Invalid parameters: missing params".to_string()));
                return;
            }
        };

        let call = match ToolCall::parse(&params.tool, params.parameters) {
            Ok(call) => call,
            Err(e) => {
                warn!("Rejected call to {}: {}", params.tool, e);
                send_result(responder, id, Err(e.to_string()));
                return;
            }
        };

        let name = call.name();
        info!("Calling tool {}", name);

        let context = Arc::clone(&self.context);
        let responder = responder.clone();

        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(call.execute(&context)).catch_unwind().await;

            let result = match outcome {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => {
                    error!("Tool {} failed: {}", name, e);
                    Err(e.to_string())
                }
                Err(_) => {
                    error!("Tool {} panicked", name);
                    Err(format!("Internal error while executing {}", name))
                }
            };

            send_result(&responder, id, result);
        });
    }
}

/// Parse a record into a request envelope
///
/// Only JSON objects count as requests.
fn parse_request(record: &[u8]) -> Result<JsonRpcRequest, String> {
    let value: Value = serde_json::from_slice(record).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("request is not a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Queue a response for `id`
///
/// Errors are only sent when the request carried an id; results always are.
fn send_result(responder: &Responder, id: Option<Value>, result: Result<Value, String>) {
    let response = match (result, id) {
        (Ok(result), id) => JsonRpcResponse::success(id.unwrap_or(Value::Null), result),
        (Err(message), Some(id)) => JsonRpcResponse::error(id, message),
        (Err(message), None) => {
            debug!("Not answering request without id: {}", message);
            return;
        }
    };

    if responder.send(response).is_err() {
        error!("Response writer is gone, dropping response");
    }
}

/// Write queued responses, one record per line
async fn write_responses<W>(mut writer: W, mut responses: mpsc::UnboundedReceiver<JsonRpcResponse>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = responses.recv().await {
        let line = match response.to_line() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to encode response: {}", e);
                continue;
            }
        };

        if let Err(e) = write_record(&mut writer, &line).await {
            error!("Failed to write response: {}", e);
            continue;
        }

        debug!("Sent response: {}", line.trim_end());
    }
}

async fn write_record<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
