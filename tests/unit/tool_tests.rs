/// Tool handler tests against a fake device
use std::sync::Arc;

use adb_bridge_mcp::*;
use serde_json::json;
use tempfile::{tempdir, NamedTempFile};

use crate::common::{context, FakeDevice};

#[cfg(test)]
mod tool_unit_tests {
    use super::*;

    async fn run(device: Arc<FakeDevice>, tool: &str, parameters: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let temp_dir = tempdir().unwrap();
        let ctx = context(device, temp_dir.path());
        ToolCall::parse(tool, parameters)?.execute(&ctx).await
    }

    #[tokio::test]
    async fn test_list_devices_passes_records_through() {
        let device = Arc::new(FakeDevice::with_devices(&["emulator-5554", "R58M123ABC"]));
        let result = run(device, "list_devices", json!({})).await.unwrap();

        assert_eq!(
            result,
            json!({"devices": [
                {"id": "emulator-5554", "type": "device"},
                {"id": "R58M123ABC", "type": "device"},
            ]})
        );
    }

    #[tokio::test]
    async fn test_device_info_projection() {
        let device = Arc::new(
            FakeDevice::with_devices(&["emulator-5554"])
                .shell_output("getprop", "[ro.product.model]: [Pixel7]\n[ro.product.brand]: [google]\n"),
        );
        let result = run(device, "get_device_info", json!({"device_id": "emulator-5554"}))
            .await
            .unwrap();

        assert_eq!(
            result["deviceInfo"],
            json!({
                "model": "Pixel7",
                "manufacturer": "Unknown",
                "brand": "google",
                "androidVersion": "Unknown",
                "sdkVersion": "Unknown",
                "serialNumber": "emulator-5554",
            })
        );
    }

    #[tokio::test]
    async fn test_device_info_unknown_device() {
        let device = Arc::new(FakeDevice::with_devices(&[]));
        let err = run(device, "get_device_info", json!({"device_id": "ghost"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Device(_)));
        assert_eq!(err.to_string(), "error: device 'ghost' not found");
    }

    #[tokio::test]
    async fn test_shell_command_output_is_trimmed() {
        let device = Arc::new(
            FakeDevice::with_devices(&["abc"]).shell_output("ls /sdcard", "\n  Download\nPictures  \n\n"),
        );
        let result = run(
            device.clone(),
            "execute_shell_command",
            json!({"device_id": "abc", "command": "ls /sdcard"}),
        )
        .await
        .unwrap();

        assert_eq!(result, json!({"success": true, "output": "Download\nPictures"}));
        assert_eq!(device.shell_calls(), vec![("abc".to_string(), "ls /sdcard".to_string())]);
    }

    #[tokio::test]
    async fn test_logcat_default_command() {
        let device = Arc::new(
            FakeDevice::with_devices(&["abc"])
                .shell_output("logcat -d -v time -t 100", "01-01 00:00:00.000 I/Tag( 1): hello\n"),
        );
        let result = run(device.clone(), "get_logcat", json!({"device_id": "abc"}))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"success": true, "logs": "01-01 00:00:00.000 I/Tag( 1): hello"})
        );
    }

    #[tokio::test]
    async fn test_logcat_with_lines_and_filter() {
        let device = Arc::new(FakeDevice::with_devices(&["abc"]));
        run(
            device.clone(),
            "get_logcat",
            json!({"device_id": "abc", "lines": 25, "filter": "crash"}),
        )
        .await
        .unwrap();

        assert_eq!(
            device.shell_calls(),
            vec![(
                "abc".to_string(),
                "logcat -d -v time -t 25 | grep -i \"crash\"".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_logcat_empty_filter_adds_no_pipeline() {
        let device = Arc::new(FakeDevice::with_devices(&["abc"]));
        run(device.clone(), "get_logcat", json!({"device_id": "abc", "filter": ""}))
            .await
            .unwrap();

        assert_eq!(device.shell_calls()[0].1, "logcat -d -v time -t 100");
    }

    #[tokio::test]
    async fn test_install_missing_apk_never_reaches_device() {
        let device = Arc::new(FakeDevice::with_devices(&["abc"]));
        let missing = "/definitely/not/here/app.apk";
        let err = run(
            device.clone(),
            "install_apk",
            json!({"device_id": "abc", "apk_path": missing}),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), format!("APK file not found at {}", missing));
        assert!(device.installs().is_empty());
    }

    #[tokio::test]
    async fn test_install_existing_apk() {
        let apk = NamedTempFile::new().unwrap();
        let device = Arc::new(FakeDevice::with_devices(&["abc"]));
        let result = run(
            device.clone(),
            "install_apk",
            json!({"device_id": "abc", "apk_path": apk.path()}),
        )
        .await
        .unwrap();

        assert_eq!(result, json!({"success": true, "message": "APK installed successfully"}));
        assert_eq!(device.installs(), vec![("abc".to_string(), apk.path().to_path_buf())]);
    }

    #[tokio::test]
    async fn test_screenshot_saved_to_directory() {
        let temp_dir = tempdir().unwrap();
        let shots = temp_dir.path().join("screenshots");
        let device = Arc::new(FakeDevice::with_devices(&["emulator-5554"]).screen(b"\x89PNG\r\n\x1a\nfake"));
        let ctx = context(device, &shots);

        let result = ToolCall::parse("take_screenshot", json!({"device_id": "emulator-5554"}))
            .unwrap()
            .execute(&ctx)
            .await
            .unwrap();

        let filename = result["filename"].as_str().unwrap();
        let path = result["path"].as_str().unwrap();

        assert_eq!(result["success"], json!(true));
        assert!(filename.starts_with("screenshot-emulator-5554-"));
        assert!(filename.ends_with("Z.png"));
        let stamp = &filename["screenshot-emulator-5554-".len()..filename.len() - ".png".len()];
        assert!(!stamp.contains(':') && !stamp.contains('.'));
        assert!(path.ends_with(filename));
        assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG\r\n\x1a\nfake");
    }

    #[tokio::test]
    async fn test_screenshot_directory_failure() {
        // A regular file where the directory should be
        let blocker = NamedTempFile::new().unwrap();
        let shots = blocker.path().join("screenshots");
        let device = Arc::new(FakeDevice::with_devices(&["abc"]));
        let ctx = context(device, &shots);

        let err = ToolCall::parse("take_screenshot", json!({"device_id": "abc"}))
            .unwrap()
            .execute(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Io(_)));
    }

    #[tokio::test]
    async fn test_screenshot_unknown_device_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let device = Arc::new(FakeDevice::with_devices(&[]));
        let ctx = context(device, temp_dir.path());

        let err = ToolCall::parse("take_screenshot", json!({"device_id": "ghost"}))
            .unwrap()
            .execute(&ctx)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "error: device 'ghost' not found");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_parameter_type() {
        let err = ToolCall::parse("get_logcat", json!({"device_id": "abc", "lines": "many"})).unwrap_err();
        assert!(err.to_string().starts_with("Invalid parameters:"));
    }
}
