// Shared fakes and helpers for the unit and integration test targets
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adb_bridge_mcp::*;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncReadExt;

/// In-memory device client with scripted responses
#[derive(Default)]
pub struct FakeDevice {
    /// Devices that exist, with their state
    pub devices: Vec<DeviceRecord>,
    /// Shell output keyed by command; unknown commands print nothing
    pub shell_outputs: HashMap<String, String>,
    /// Bytes returned by screencap
    pub screen: Vec<u8>,
    /// Artificial latency per device
    pub delays: HashMap<String, Duration>,
    /// Every shell call as (device, command)
    pub shell_calls: Mutex<Vec<(String, String)>>,
    /// Every install call as (device, apk path)
    pub installs: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeDevice {
    pub fn with_devices(ids: &[&str]) -> Self {
        Self {
            devices: ids
                .iter()
                .map(|id| DeviceRecord {
                    id: id.to_string(),
                    kind: "device".to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn shell_output(mut self, command: &str, output: &str) -> Self {
        self.shell_outputs.insert(command.to_string(), output.to_string());
        self
    }

    pub fn screen(mut self, bytes: &[u8]) -> Self {
        self.screen = bytes.to_vec();
        self
    }

    pub fn delay(mut self, device_id: &str, delay: Duration) -> Self {
        self.delays.insert(device_id.to_string(), delay);
        self
    }

    pub fn shell_calls(&self) -> Vec<(String, String)> {
        self.shell_calls.lock().unwrap().clone()
    }

    pub fn installs(&self) -> Vec<(String, PathBuf)> {
        self.installs.lock().unwrap().clone()
    }

    /// Wait out the device's latency, then fail if it is not connected
    async fn reach(&self, device_id: &str) -> Result<(), AdbError> {
        if let Some(delay) = self.delays.get(device_id) {
            tokio::time::sleep(*delay).await;
        }

        if self.devices.iter().any(|d| d.id == device_id) {
            Ok(())
        } else {
            Err(AdbError::CommandFailed(format!(
                "error: device '{}' not found",
                device_id
            )))
        }
    }
}

#[async_trait]
impl DeviceClient for FakeDevice {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, AdbError> {
        Ok(self.devices.clone())
    }

    async fn shell(&self, device_id: &str, command: &str) -> Result<ByteStream, AdbError> {
        self.shell_calls
            .lock()
            .unwrap()
            .push((device_id.to_string(), command.to_string()));
        self.reach(device_id).await?;

        let output = self.shell_outputs.get(command).cloned().unwrap_or_default();
        Ok(Box::pin(Cursor::new(output.into_bytes())))
    }

    async fn screencap(&self, device_id: &str) -> Result<ByteStream, AdbError> {
        self.reach(device_id).await?;
        Ok(Box::pin(Cursor::new(self.screen.clone())))
    }

    async fn install(&self, device_id: &str, apk_path: &Path) -> Result<(), AdbError> {
        self.installs
            .lock()
            .unwrap()
            .push((device_id.to_string(), apk_path.to_path_buf()));
        self.reach(device_id).await
    }
}

/// Device client whose every operation panics
pub struct PanickingDevice;

#[async_trait]
impl DeviceClient for PanickingDevice {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, AdbError> {
        panic!("device client blew up")
    }

    async fn shell(&self, _device_id: &str, _command: &str) -> Result<ByteStream, AdbError> {
        panic!("device client blew up")
    }

    async fn screencap(&self, _device_id: &str) -> Result<ByteStream, AdbError> {
        panic!("device client blew up")
    }

    async fn install(&self, _device_id: &str, _apk_path: &Path) -> Result<(), AdbError> {
        panic!("device client blew up")
    }
}

/// Tool context over a fake device and the real filesystem
pub fn context(device: Arc<FakeDevice>, screenshot_dir: &Path) -> ToolContext {
    ToolContext {
        client: device,
        fs: Arc::new(LocalFileSystem),
        screenshot_dir: screenshot_dir.to_path_buf(),
    }
}

/// Server over a fake device and the real filesystem
pub fn server(device: Arc<FakeDevice>, screenshot_dir: &Path) -> AdbBridgeServer {
    let config = ServerConfig {
        screenshot_dir: screenshot_dir.to_path_buf(),
        ..ServerConfig::default()
    };
    AdbBridgeServer::with_collaborators(config, device, Arc::new(LocalFileSystem))
}

/// Feed `input` to the server and collect every response line it writes
pub async fn exchange(server: &AdbBridgeServer, input: &str) -> Vec<Value> {
    let (mut client_side, server_side) = tokio::io::duplex(64 * 1024);

    let collect = async move {
        let mut output = String::new();
        client_side.read_to_string(&mut output).await.unwrap();
        output
    };

    let (served, output) = tokio::join!(server.serve(input.as_bytes(), server_side), collect);
    served.expect("server loop failed");

    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("response is not JSON"))
        .collect()
}

/// Encode one request line
pub fn request(id: Value, method: &str, params: Value) -> String {
    let mut line = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
    .to_string();
    line.push('\n');
    line
}

/// Encode one `call_tool` request line
pub fn call(id: Value, tool: &str, parameters: Value) -> String {
    request(
        id,
        "call_tool",
        serde_json::json!({"tool": tool, "parameters": parameters}),
    )
}
