//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CHATBRIDGE_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./chatbridge.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/chatbridge/config.toml`
    /// 5. Default values
    ///
    /// `ANTHROPIC_API_KEY` is honored as a shorthand for
    /// `CHATBRIDGE_PROVIDER__API_KEY`.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        let project = PathBuf::from("chatbridge.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(&project));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CHATBRIDGE_").split("__"));
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                figment = figment.merge(("provider.api_key", key));
            }
        }

        figment.extract().map_err(Box::new)
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chatbridge").join("config.toml"))
    }
}
