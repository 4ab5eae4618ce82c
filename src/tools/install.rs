/// Tool for installing APKs
///
/// This module implements the install_apk tool.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adb::DeviceClient;
use crate::fs::FileSystem;
use crate::tools::ToolError;

pub const NAME: &str = "install_apk";

/// Parameters for installing an APK
#[derive(Debug, Clone, Deserialize)]
pub struct InstallApkParams {
    pub device_id: String,
    /// Path of the APK on the machine running the server
    pub apk_path: String,
}

/// Response from installing an APK
#[derive(Debug, Serialize)]
pub struct InstallApkResponse {
    pub success: bool,
    pub message: String,
}

/// Install a local APK onto a device
///
/// The device is never contacted when the APK does not exist locally.
pub async fn install_apk(
    client: &dyn DeviceClient,
    fs: &dyn FileSystem,
    params: InstallApkParams,
) -> Result<InstallApkResponse, ToolError> {
    let apk_path = Path::new(&params.apk_path);
    if !fs.exists(apk_path).await? {
        return Err(ToolError::ApkNotFound {
            path: params.apk_path.clone(),
        });
    }

    client.install(&params.device_id, apk_path).await?;

    Ok(InstallApkResponse {
        success: true,
        message: "APK installed successfully".to_string(),
    })
}
