//! MCP wire frames and tolerant response parsing.
//!
//! Every request carries a numeric correlation id; the server echoes it on
//! the matching response frame. Three request shapes exist: `initialize`
//! (protocol version + capability flags), `tools/list` (optional parameter
//! map), and `tools/call` (tool name + argument document).
//!
//! Parsing is tolerant: a malformed tool entry degrades to empty-string
//! defaults instead of aborting the whole listing.

use chatbridge_domain::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Protocol version declared in the handshake
pub const PROTOCOL_VERSION: &str = "1.0.0";

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_LIST_TOOLS: &str = "tools/list";
pub const METHOD_CALL_TOOL: &str = "tools/call";

/// A single request frame, serialized as one structured text frame
#[derive(Debug, Clone, Serialize)]
pub struct RequestFrame {
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RequestFrame {
    pub fn initialize(id: u64) -> Self {
        Self {
            id,
            method: METHOD_INITIALIZE.to_string(),
            params: json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": true },
            }),
        }
    }

    pub fn list_tools(id: u64) -> Self {
        Self {
            id,
            method: METHOD_LIST_TOOLS.to_string(),
            params: json!({}),
        }
    }

    pub fn call_tool(id: u64, name: &str, arguments: &Map<String, Value>) -> Self {
        Self {
            id,
            method: METHOD_CALL_TOOL.to_string(),
            params: json!({
                "name": name,
                "arguments": arguments,
            }),
        }
    }
}

/// A single response frame, correlated to a request by id
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseFrame {
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ResponseFrame {
    /// Fold the frame into the payload delivered to the awaiting request
    pub fn into_payload(self) -> Result<Value, String> {
        if let Some(error) = self.error {
            let message = error
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(message);
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Parse a `tools/list` result into descriptors.
///
/// Missing or malformed fields degrade each entry to empty-string defaults;
/// a missing `tools` array yields an empty set.
pub fn parse_tool_list(result: &Value) -> Vec<ToolDescriptor> {
    let Some(entries) = result.get("tools").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| ToolDescriptor {
            name: entry
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            description: entry
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            input_schema: entry
                .get("inputSchema")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default(),
        })
        .collect()
}

/// Extract the result text from a `tools/call` result.
pub fn parse_tool_result(result: &Value) -> Option<String> {
    result
        .get("result")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_frame_declares_tool_capability() {
        let frame = RequestFrame::initialize(1);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["method"], "initialize");
        assert_eq!(json["params"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(json["params"]["capabilities"]["tools"], true);
    }

    #[test]
    fn call_frame_carries_name_and_arguments() {
        let mut args = Map::new();
        args.insert("q".to_string(), json!("x"));

        let frame = RequestFrame::call_tool(7, "search", &args);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["params"]["name"], "search");
        assert_eq!(json["params"]["arguments"]["q"], "x");
    }

    #[test]
    fn parse_tool_list_reads_well_formed_entries() {
        let result = json!({
            "tools": [
                {
                    "name": "search",
                    "description": "Search the web",
                    "inputSchema": { "type": "object" }
                }
            ]
        });

        let tools = parse_tool_list(&result);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "search");
        assert_eq!(tools[0].description, "Search the web");
        assert_eq!(tools[0].input_schema["type"], json!("object"));
    }

    #[test]
    fn parse_tool_list_degrades_malformed_entries_to_defaults() {
        let result = json!({
            "tools": [
                { "name": 42, "inputSchema": "not an object" },
                {}
            ]
        });

        let tools = parse_tool_list(&result);
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "");
        assert_eq!(tools[0].description, "");
        assert!(tools[0].input_schema.is_empty());
        assert_eq!(tools[1].name, "");
    }

    #[test]
    fn parse_tool_list_without_array_is_empty() {
        assert!(parse_tool_list(&json!({})).is_empty());
        assert!(parse_tool_list(&json!({"tools": "nope"})).is_empty());
    }

    #[test]
    fn parse_tool_result_extracts_result_field() {
        assert_eq!(
            parse_tool_result(&json!({"result": "3 results"})).as_deref(),
            Some("3 results")
        );
        assert_eq!(parse_tool_result(&json!({"result": 42})), None);
        assert_eq!(parse_tool_result(&json!({})), None);
    }

    #[test]
    fn error_frame_folds_into_message() {
        let frame: ResponseFrame =
            serde_json::from_str(r#"{"id":3,"error":{"message":"unknown tool"}}"#).unwrap();
        assert_eq!(frame.into_payload().unwrap_err(), "unknown tool");
    }

    #[test]
    fn result_frame_folds_into_value() {
        let frame: ResponseFrame =
            serde_json::from_str(r#"{"id":3,"result":{"result":"ok"}}"#).unwrap();
        let payload = frame.into_payload().unwrap();
        assert_eq!(payload["result"], "ok");
    }
}
