/// Tool for listing connected devices
///
/// This module implements the list_devices tool.

use serde::Serialize;

use crate::adb::{DeviceClient, DeviceRecord};
use crate::tools::ToolError;

pub const NAME: &str = "list_devices";

/// Response from listing devices
#[derive(Debug, Serialize)]
pub struct ListDevicesResponse {
    pub devices: Vec<DeviceRecord>,
}

/// List connected devices exactly as the client reports them
pub async fn list_devices(client: &dyn DeviceClient) -> Result<ListDevicesResponse, ToolError> {
    let devices = client.list_devices().await?;
    Ok(ListDevicesResponse { devices })
}
