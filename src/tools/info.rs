/// Tool for reading device properties
///
/// This module implements the get_device_info tool. It dumps the device's
/// system properties with `getprop` and projects a handful of them.

use std::collections::HashMap;

use serde::Serialize;

use crate::adb::{shell_output, DeviceClient};
use crate::tools::{DeviceParams, ToolError};

pub const NAME: &str = "get_device_info";

/// Placeholder for properties the device did not report
pub const UNKNOWN: &str = "Unknown";

/// Summary of a device's identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub model: String,
    pub manufacturer: String,
    pub brand: String,
    pub android_version: String,
    pub sdk_version: String,
    pub serial_number: String,
}

/// Response from reading device info
#[derive(Debug, Serialize)]
pub struct DeviceInfoResponse {
    #[serde(rename = "deviceInfo")]
    pub device_info: DeviceInfo,
}

impl DeviceInfo {
    /// Project the interesting properties out of a `getprop` dump
    ///
    /// The serial falls back to the device id the caller used.
    pub fn from_properties(props: &HashMap<String, String>, device_id: &str) -> Self {
        let get = |key: &str| {
            props
                .get(key)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Self {
            model: get("ro.product.model"),
            manufacturer: get("ro.product.manufacturer"),
            brand: get("ro.product.brand"),
            android_version: get("ro.build.version.release"),
            sdk_version: get("ro.build.version.sdk"),
            serial_number: props
                .get("ro.serialno")
                .cloned()
                .unwrap_or_else(|| device_id.to_string()),
        }
    }
}

/// Parse `getprop` output, one `[key]: [value]` pair per line
///
/// Lines that do not have that shape are skipped.
pub fn parse_properties(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix('[')?;
            let (key, value) = rest.split_once("]: [")?;
            let value = value.strip_suffix(']')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Read and summarize a device's properties
pub async fn get_device_info(
    client: &dyn DeviceClient,
    params: DeviceParams,
) -> Result<DeviceInfoResponse, ToolError> {
    let output = shell_output(client, &params.device_id, "getprop").await?;
    let props = parse_properties(&output);

    Ok(DeviceInfoResponse {
        device_info: DeviceInfo::from_properties(&props, &params.device_id),
    })
}
