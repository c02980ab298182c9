//! Infrastructure layer for chatbridge
//!
//! This crate contains the adapters that implement the ports defined in the
//! application layer: the MCP WebSocket tool gateway, the Claude messages
//! API gateway, and configuration file loading.

pub mod claude;
pub mod config;
pub mod mcp;

// Re-export commonly used types
pub use claude::client::ClaudeCompletionGateway;
pub use config::{
    file_config::{BehaviorConfig, FileConfig, McpConfig, ProviderConfig},
    loader::ConfigLoader,
};
pub use mcp::client::McpToolGateway;
