/// JSON-RPC message structures for the ADB bridge
///
/// Every record on the wire is a single JSON object on its own line.
/// Requests carry `jsonrpc`, `id`, `method` and optional `params`;
/// responses echo the `id` and carry exactly one of `result` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol tag every request must carry
pub const JSONRPC_VERSION: &str = "2.0";

/// Version reported by `initialize`
pub const PROTOCOL_VERSION: &str = "2.0";

/// Error code used for every failure this server reports
pub const SERVER_ERROR: i32 = -32000;

/// Message for methods (or envelopes) the server does not understand
pub const METHOD_NOT_SUPPORTED: &str = "Method not supported";

/// JSON-RPC 2.0 request message
///
/// Every field is optional at parse time: a record that is valid JSON but
/// has a wrong or missing field is still routed so that it can be answered
/// with an error when it carries an `id`.
#[derive(Debug, Default, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version, must be "2.0"
    #[serde(default)]
    pub jsonrpc: Option<Value>,
    /// Correlation identifier, echoed verbatim in the response
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    #[serde(default)]
    pub method: Option<Value>,
    /// Method-specific parameters
    #[serde(default)]
    pub params: Option<Value>,
}

/// Methods the server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ListTools,
    CallTool,
}

impl JsonRpcRequest {
    /// Resolve the method, or `None` when the envelope is not one we serve
    pub fn method(&self) -> Option<Method> {
        if self.jsonrpc.as_ref().and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return None;
        }

        match self.method.as_ref().and_then(Value::as_str)? {
            "initialize" => Some(Method::Initialize),
            "list_tools" => Some(Method::ListTools),
            "call_tool" => Some(Method::CallTool),
            _ => None,
        }
    }
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: &'static str,
    /// Request ID that we're responding to (null when the request had none)
    pub id: Value,
    /// Either `result` or `error`, never both
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Body of a response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(JsonRpcError),
}

/// JSON-RPC error information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    /// Create an error response with the server error code
    pub fn error(id: Value, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(JsonRpcError {
                code: SERVER_ERROR,
                message: message.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Encode as one newline-terminated record
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// `call_tool` parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "get_logcat")
    pub tool: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub parameters: Value,
}

/// `initialize` result
#[derive(Debug, Serialize)]
pub struct InitializeResult {
    pub version: &'static str,
    pub capabilities: Map<String, Value>,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            capabilities: Map::new(),
        }
    }
}
