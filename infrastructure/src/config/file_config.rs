//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default so a partial (or missing) file still yields a
//! usable configuration.

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion provider settings
    pub provider: ProviderConfig,
    /// Tool server settings
    pub mcp: McpConfig,
    /// Orchestration behavior settings
    pub behavior: BehaviorConfig,
}

/// Completion provider endpoint and model selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            api_key: String::new(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
        }
    }
}

/// Tool server connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub server_url: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8080/mcp".to_string(),
        }
    }
}

/// Orchestration behavior toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Append tool results to the conversation history as system messages
    pub append_tool_results: bool,
    /// Stream assistant replies instead of waiting for the full response
    pub stream_responses: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            append_tool_results: false,
            stream_responses: false,
        }
    }
}

impl FileConfig {
    /// Report human-readable problems with the configuration.
    ///
    /// Missing credentials are the only hard problem; everything else has a
    /// workable default.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.provider.api_key.is_empty() {
            issues.push(
                "provider.api_key is empty (set it in the config file or via \
                 CHATBRIDGE_PROVIDER__API_KEY / ANTHROPIC_API_KEY)"
                    .to_string(),
            );
        }
        if self.provider.max_tokens == 0 {
            issues.push("provider.max_tokens must be greater than zero".to_string());
        }
        issues
    }
}
