/// Tool for running shell commands on a device
///
/// This module implements the execute_shell_command tool. The command
/// string reaches the device shell as-is.

use serde::{Deserialize, Serialize};

use crate::adb::{shell_output, DeviceClient};
use crate::tools::ToolError;

pub const NAME: &str = "execute_shell_command";

/// Parameters for running a shell command
#[derive(Debug, Clone, Deserialize)]
pub struct ShellCommandParams {
    pub device_id: String,
    pub command: String,
}

/// Response from running a shell command
#[derive(Debug, Serialize)]
pub struct ShellCommandResponse {
    pub success: bool,
    pub output: String,
}

/// Run a command and return its trimmed output
pub async fn execute_shell_command(
    client: &dyn DeviceClient,
    params: ShellCommandParams,
) -> Result<ShellCommandResponse, ToolError> {
    let output = shell_output(client, &params.device_id, &params.command).await?;
    Ok(ShellCommandResponse {
        success: true,
        output,
    })
}
