/// `DeviceClient` backed by the `adb` command-line tool
///
/// Every operation spawns `adb` with the target serial and collects its
/// output. A non-zero exit status is reported with adb's own stderr text,
/// except for `shell`, where the status belongs to the remote command.

use std::ffi::OsStr;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{AdbError, ByteStream, DeviceClient, DeviceRecord};

/// Client that shells out to an adb executable
#[derive(Debug, Clone)]
pub struct AdbCli {
    program: PathBuf,
}

impl AdbCli {
    /// Create a client that runs the given adb executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the adb executable this client runs
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run adb and collect its output whatever the exit status
    async fn spawn<I, S>(&self, args: I) -> Result<Output, AdbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args).kill_on_drop(true);
        debug!("Running {:?}", command);

        command.output().await.map_err(|source| AdbError::Spawn {
            program: self.program.display().to_string(),
            source,
        })
    }

    /// Run adb and fail on a non-zero exit status
    async fn run<I, S>(&self, args: I) -> Result<Output, AdbError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.spawn(args).await?;

        if !output.status.success() {
            return Err(AdbError::CommandFailed(failure_message(&output)));
        }

        Ok(output)
    }
}

impl Default for AdbCli {
    fn default() -> Self {
        Self::new("adb")
    }
}

#[async_trait]
impl DeviceClient for AdbCli {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, AdbError> {
        let output = self.run(["devices"]).await?;
        Ok(parse_devices(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn shell(&self, device_id: &str, command: &str) -> Result<ByteStream, AdbError> {
        let output = self.spawn(["-s", device_id, "shell", command]).await?;

        if let Some(message) = transport_error(&output) {
            return Err(AdbError::CommandFailed(message));
        }

        // The remote command's own failures are part of its output
        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(Box::pin(Cursor::new(combined)))
    }

    async fn screencap(&self, device_id: &str) -> Result<ByteStream, AdbError> {
        // exec-out keeps the PNG bytes free of pty line-ending translation
        let output = self
            .run(["-s", device_id, "exec-out", "screencap", "-p"])
            .await?;
        Ok(Box::pin(Cursor::new(output.stdout)))
    }

    async fn install(&self, device_id: &str, apk_path: &Path) -> Result<(), AdbError> {
        let output = self
            .run([
                OsStr::new("-s"),
                OsStr::new(device_id),
                OsStr::new("install"),
                OsStr::new("-r"),
                apk_path.as_os_str(),
            ])
            .await?;

        // Older adb releases exit 0 even when the package manager rejects the APK
        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(line) = stdout.lines().find(|l| l.trim_start().starts_with("Failure")) {
            return Err(AdbError::CommandFailed(line.trim().to_string()));
        }

        Ok(())
    }
}

/// Pick the most useful text out of a failed adb run
fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }

    match output.status.code() {
        Some(code) => format!("adb exited with status {}", code),
        None => "adb terminated by signal".to_string(),
    }
}

/// adb's own failure (unknown device, offline, unauthorized) for a shell run
///
/// adb reports these on stderr as `error: ...` without running anything on
/// the device, so there is no stdout.
fn transport_error(output: &Output) -> Option<String> {
    if output.status.success() || !output.stdout.is_empty() {
        return None;
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.starts_with("error:") || stderr.starts_with("adb: error:") {
        Some(stderr.to_string())
    } else {
        None
    }
}

/// Parse the output of `adb devices`
///
/// The first line is a header; each following line is `<serial>\t<state>`.
fn parse_devices(stdout: &str) -> Vec<DeviceRecord> {
    stdout
        .lines()
        .skip_while(|line| !line.starts_with("List of devices"))
        .skip(1)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let id = parts.next()?;
            let kind = parts.next()?;
            Some(DeviceRecord {
                id: id.to_string(),
                kind: kind.to_string(),
            })
        })
        .collect()
}
