/// Tool for capturing screenshots
///
/// This module implements the take_screenshot tool. The capture stream is
/// copied straight into a PNG file under the screenshots directory.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::tools::{DeviceParams, ToolContext, ToolError};

pub const NAME: &str = "take_screenshot";

/// Response from taking a screenshot
#[derive(Debug, Serialize)]
pub struct ScreenshotResponse {
    pub success: bool,
    pub message: String,
    pub path: String,
    pub filename: String,
}

/// Build a filesystem-safe screenshot file name
///
/// The timestamp is ISO 8601 with `:` and `.` turned into `-`, e.g.
/// `screenshot-emulator-5554-2024-03-01T12-30-05-123Z.png`.
pub fn screenshot_filename(device_id: &str, taken_at: DateTime<Utc>) -> String {
    let stamp = taken_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("screenshot-{}-{}.png", device_id, stamp)
}

/// Capture the device screen and save it as a PNG
///
/// A file left behind by a failed copy is not removed.
pub async fn take_screenshot(
    ctx: &ToolContext,
    params: DeviceParams,
) -> Result<ScreenshotResponse, ToolError> {
    ctx.fs.ensure_dir(&ctx.screenshot_dir).await?;

    let filename = screenshot_filename(&params.device_id, Utc::now());
    let path = ctx.screenshot_dir.join(&filename);

    let mut capture = ctx.client.screencap(&params.device_id).await?;
    let mut file = ctx.fs.create_file(&path).await?;
    let written = tokio::io::copy(&mut capture, &mut file).await?;
    file.shutdown().await?;

    debug!("Wrote {} bytes to {}", written, path.display());

    let path = path.display().to_string();
    Ok(ScreenshotResponse {
        success: true,
        message: format!("Screenshot saved to {}", path),
        path,
        filename,
    })
}
