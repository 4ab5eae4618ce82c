/// Tools that callers can invoke through `call_tool`
///
/// Each tool lives in its own file with its parameter and response types.
/// `ToolCall` is the parsed form of a `call_tool` request: one variant per
/// tool, carrying that tool's typed parameters.

pub mod devices;
pub mod info;
pub mod install;
pub mod logcat;
pub mod registry;
pub mod screenshot;
pub mod shell;

pub use devices::list_devices;
pub use info::{get_device_info, parse_properties, DeviceInfo};
pub use install::{install_apk, InstallApkParams};
pub use logcat::{get_logcat, logcat_command, LogcatParams};
pub use screenshot::{screenshot_filename, take_screenshot};
pub use shell::{execute_shell_command, ShellCommandParams};

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::adb::{AdbError, DeviceClient};
use crate::fs::FileSystem;

/// Errors a tool call can end with
///
/// Every variant ends up as the `message` of a wire error.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("APK file not found at {path}")]
    ApkNotFound { path: String },

    #[error(transparent)]
    Device(#[from] AdbError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Collaborators shared by every tool invocation
pub struct ToolContext {
    /// Device-communication client, one per process
    pub client: Arc<dyn DeviceClient>,
    /// Filesystem access
    pub fs: Arc<dyn FileSystem>,
    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

/// Parameters for tools that only need a device
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceParams {
    pub device_id: String,
}

/// A parsed `call_tool` request
#[derive(Debug, Clone)]
pub enum ToolCall {
    ListDevices,
    GetDeviceInfo(DeviceParams),
    TakeScreenshot(DeviceParams),
    InstallApk(InstallApkParams),
    ExecuteShellCommand(ShellCommandParams),
    GetLogcat(LogcatParams),
}

impl ToolCall {
    /// Match a tool name and check its parameters
    pub fn parse(tool: &str, parameters: Value) -> Result<Self, ToolError> {
        // A missing `parameters` object is the same as an empty one
        let parameters = match parameters {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let call = match tool {
            devices::NAME => ToolCall::ListDevices,
            info::NAME => ToolCall::GetDeviceInfo(params(parameters)?),
            screenshot::NAME => ToolCall::TakeScreenshot(params(parameters)?),
            install::NAME => ToolCall::InstallApk(params(parameters)?),
            shell::NAME => ToolCall::ExecuteShellCommand(params(parameters)?),
            logcat::NAME => ToolCall::GetLogcat(params(parameters)?),
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(call)
    }

    /// Registered name of the tool this call targets
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ListDevices => devices::NAME,
            ToolCall::GetDeviceInfo(_) => info::NAME,
            ToolCall::TakeScreenshot(_) => screenshot::NAME,
            ToolCall::InstallApk(_) => install::NAME,
            ToolCall::ExecuteShellCommand(_) => shell::NAME,
            ToolCall::GetLogcat(_) => logcat::NAME,
        }
    }

    /// Run the tool and encode its result payload
    pub async fn execute(self, ctx: &ToolContext) -> Result<Value, ToolError> {
        let client = ctx.client.as_ref();
        match self {
            ToolCall::ListDevices => encode(list_devices(client).await?),
            ToolCall::GetDeviceInfo(p) => encode(get_device_info(client, p).await?),
            ToolCall::TakeScreenshot(p) => encode(take_screenshot(ctx, p).await?),
            ToolCall::InstallApk(p) => encode(install_apk(client, ctx.fs.as_ref(), p).await?),
            ToolCall::ExecuteShellCommand(p) => encode(execute_shell_command(client, p).await?),
            ToolCall::GetLogcat(p) => encode(get_logcat(client, p).await?),
        }
    }
}

fn params<T: DeserializeOwned>(parameters: Value) -> Result<T, ToolError> {
    serde_json::from_value(parameters).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

fn encode<T: Serialize>(response: T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(response)?)
}
