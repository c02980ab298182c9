//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool advertised by the tool server
///
/// The input schema is an arbitrary-depth JSON document describing the
/// arguments the tool accepts. Descriptors are replaced wholesale on every
/// successful listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name within the advertised set (e.g. "search")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Input-shape schema as a structured key/value document
    #[serde(default)]
    pub input_schema: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Map::new(),
        }
    }

    pub fn with_schema(mut self, schema: Map<String, Value>) -> Self {
        self.input_schema = schema;
        self
    }
}

/// A call to a tool with structured arguments
///
/// Constructed transiently by the orchestrator when a completion response
/// carries a tool-use directive; never retained in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// Outcome of a tool execution
///
/// Tool failures never surface as errors to the orchestrator; the adapter
/// degrades them to an outcome with the error flag set (fail-soft).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Result text (or a sentinel error string on failure)
    pub result: String,
    /// Whether the execution failed
    pub is_error: bool,
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(tool_name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: result.into(),
            is_error: false,
        }
    }

    /// Create a failed outcome carrying a sentinel error string
    pub fn error(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: message.into(),
            is_error: true,
        }
    }
}
