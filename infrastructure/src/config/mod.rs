//! Configuration file loading for chatbridge
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `CHATBRIDGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./chatbridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chatbridge/config.toml`
//! 5. Default values

pub mod file_config;
pub mod loader;

pub use file_config::{BehaviorConfig, FileConfig, McpConfig, ProviderConfig};
pub use loader::ConfigLoader;
