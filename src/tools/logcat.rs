/// Tool for reading the device log
///
/// This module implements the get_logcat tool.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::adb::{shell_output, DeviceClient};
use crate::tools::ToolError;

pub const NAME: &str = "get_logcat";

/// Number of log lines returned when the caller does not say
pub const DEFAULT_LINES: u64 = 100;

/// Parameters for reading the device log
#[derive(Debug, Clone, Deserialize)]
pub struct LogcatParams {
    pub device_id: String,
    #[serde(default, deserialize_with = "line_count")]
    pub lines: Option<u64>,
    /// Case-insensitive text to keep lines matching
    #[serde(default)]
    pub filter: Option<String>,
}

impl LogcatParams {
    pub fn lines(&self) -> u64 {
        self.lines.unwrap_or(DEFAULT_LINES)
    }

    pub fn filter(&self) -> &str {
        self.filter.as_deref().unwrap_or("")
    }
}

/// Accept any non-negative JSON number, e.g. `50` or `50.0`
fn line_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n as u64)),
        Some(n) => Err(D::Error::custom(format!(
            "lines must be a non-negative number, got {}",
            n
        ))),
    }
}

/// Response from reading the device log
#[derive(Debug, Serialize)]
pub struct LogcatResponse {
    pub success: bool,
    pub logs: String,
}

/// Build the device-side logcat command
///
/// The filter is placed inside double quotes without escaping, so a quote
/// in the filter ends the grep pattern.
pub fn logcat_command(lines: u64, filter: &str) -> String {
    let mut command = format!("logcat -d -v time -t {}", lines);
    if !filter.is_empty() {
        command.push_str(&format!(" | grep -i \"{}\"", filter));
    }
    command
}

/// Fetch the most recent log lines from a device
pub async fn get_logcat(
    client: &dyn DeviceClient,
    params: LogcatParams,
) -> Result<LogcatResponse, ToolError> {
    let command = logcat_command(params.lines(), params.filter());
    let logs = shell_output(client, &params.device_id, &command).await?;
    Ok(LogcatResponse {
        success: true,
        logs,
    })
}
