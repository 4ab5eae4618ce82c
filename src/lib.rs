/// Public library interface for the ADB bridge server
///
/// This module exports the server, the device and filesystem seams and the
/// tool types so they can be embedded or exercised from tests.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

// Internal modules
mod adb;
mod fs;
mod mcp;
mod tools;

// Re-export public modules and types
pub use adb::{read_all, shell_output, AdbCli, AdbError, ByteStream, DeviceClient, DeviceRecord};
pub use fs::{FileSink, FileSystem, LocalFileSystem};
pub use mcp::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method, Outcome, JSONRPC_VERSION,
    METHOD_NOT_SUPPORTED, PROTOCOL_VERSION, SERVER_ERROR,
};
pub use mcp::McpServer;
pub use tools::registry::{self, ParamSpec, ParamType, ToolDescriptor, TOOLS};
pub use tools::{
    logcat_command, parse_properties, screenshot_filename, DeviceInfo, DeviceParams,
    InstallApkParams, LogcatParams, ShellCommandParams, ToolCall, ToolContext, ToolError,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response writer stopped unexpectedly: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

/// Runtime settings for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory screenshots are saved to
    pub screenshot_dir: PathBuf,
    /// adb executable to run
    pub adb_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from("screenshots"),
            adb_path: PathBuf::from("adb"),
        }
    }
}

/// Main ADB bridge server
///
/// Owns the single device client and filesystem handle every request
/// shares.
pub struct AdbBridgeServer {
    context: Arc<ToolContext>,
}

impl AdbBridgeServer {
    /// Create a server that drives the adb executable named in the config
    pub fn new(config: ServerConfig) -> Self {
        tracing::info!(
            "Initializing ADB bridge with adb at {:?}, screenshots in {:?}",
            config.adb_path,
            config.screenshot_dir
        );

        let client = Arc::new(AdbCli::new(config.adb_path.clone()));
        Self::with_collaborators(config, client, Arc::new(LocalFileSystem))
    }

    /// Create a server around an existing device client and filesystem
    pub fn with_collaborators(
        config: ServerConfig,
        client: Arc<dyn DeviceClient>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            context: Arc::new(ToolContext {
                client,
                fs,
                screenshot_dir: config.screenshot_dir,
            }),
        }
    }

    /// Run the server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method returns when stdin closes and all pending requests have
    /// been answered.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting ADB bridge server...");
        McpServer::new(self.context).run().await
    }

    /// Serve requests from an arbitrary reader/writer pair
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        McpServer::new(Arc::clone(&self.context))
            .serve(reader, writer)
            .await
    }

    /// Get the shared tool context (useful for testing)
    pub fn context(&self) -> &ToolContext {
        &self.context
    }
}
