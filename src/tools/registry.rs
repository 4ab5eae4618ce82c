/// Catalog of tools reported by `list_tools`
///
/// The catalog is static and only describes the tools; routing a
/// `call_tool` request goes through `ToolCall::parse`, not through here.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::tools::{devices, info, install, logcat, screenshot, shell};

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
}

/// Description of one tool parameter
#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
}

/// Description of one tool
#[derive(Debug)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

const DEVICE_ID: ParamSpec = ParamSpec {
    name: "device_id",
    kind: ParamType::String,
    description: "Serial of the target device (see list_devices)",
    required: true,
};

/// Every tool, in registration order
pub static TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: devices::NAME,
        description: "List connected Android devices",
        params: &[],
    },
    ToolDescriptor {
        name: info::NAME,
        description: "Get model, manufacturer, brand, Android version, SDK level and serial of a device",
        params: &[DEVICE_ID],
    },
    ToolDescriptor {
        name: screenshot::NAME,
        description: "Capture the device screen and save it as a PNG file",
        params: &[DEVICE_ID],
    },
    ToolDescriptor {
        name: install::NAME,
        description: "Install an APK file onto a device",
        params: &[
            DEVICE_ID,
            ParamSpec {
                name: "apk_path",
                kind: ParamType::String,
                description: "Local path of the APK file to install",
                required: true,
            },
        ],
    },
    ToolDescriptor {
        name: shell::NAME,
        description: "Run a shell command on a device and return its output",
        params: &[
            DEVICE_ID,
            ParamSpec {
                name: "command",
                kind: ParamType::String,
                description: "Shell command to run",
                required: true,
            },
        ],
    },
    ToolDescriptor {
        name: logcat::NAME,
        description: "Get recent lines from the device log",
        params: &[
            DEVICE_ID,
            ParamSpec {
                name: "lines",
                kind: ParamType::Number,
                description: "Number of lines to fetch (default: 100)",
                required: false,
            },
            ParamSpec {
                name: "filter",
                kind: ParamType::String,
                description: "Only keep lines containing this text, case-insensitive (optional)",
                required: false,
            },
        ],
    },
];

impl ToolDescriptor {
    /// JSON form used in the `list_tools` result
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            properties.insert(
                param.name.to_string(),
                json!({"type": param.kind, "description": param.description}),
            );
        }

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        })
    }
}

/// Look up a tool's descriptor by name
pub fn descriptor(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// Result payload for `list_tools`
pub fn list_tools_result() -> Value {
    let tools: Vec<Value> = TOOLS.iter().map(ToolDescriptor::to_json).collect();
    json!({ "tools": tools })
}
