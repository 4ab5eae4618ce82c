/// Device-communication layer
///
/// This module defines the seam between the tool handlers and whatever
/// actually talks to Android devices. Handlers only ever see the
/// `DeviceClient` trait; the production implementation drives the `adb`
/// executable (see `cli.rs`).

pub mod cli;

pub use cli::AdbCli;

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Readable byte stream produced by a device operation
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Errors raised by the device-communication client
///
/// The display text is the client's own message, which handlers forward
/// to the caller unmodified.
#[derive(Error, Debug)]
pub enum AdbError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    CommandFailed(String),

    #[error("{0}")]
    Stream(#[from] std::io::Error),
}

/// A connected device as reported by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device serial, e.g. `emulator-5554`
    pub id: String,
    /// Connection state, e.g. `device`, `offline`, `unauthorized`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Primitives every device-communication client provides
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// List connected devices
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, AdbError>;

    /// Run a shell command on a device and return its output stream
    async fn shell(&self, device_id: &str, command: &str) -> Result<ByteStream, AdbError>;

    /// Request a PNG screen capture stream from a device
    async fn screencap(&self, device_id: &str) -> Result<ByteStream, AdbError>;

    /// Install a local package file onto a device
    async fn install(&self, device_id: &str, apk_path: &Path) -> Result<(), AdbError>;
}

/// Drain a stream into a complete byte buffer
pub async fn read_all(mut stream: ByteStream) -> Result<Vec<u8>, AdbError> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Run a shell command and collect its output as trimmed text
pub async fn shell_output(
    client: &dyn DeviceClient,
    device_id: &str,
    command: &str,
) -> Result<String, AdbError> {
    let stream = client.shell(device_id, command).await?;
    let bytes = read_all(stream).await?;
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}
