mod channels;
mod defaults;
mod env;
mod proxy;


pub use channels::*;
pub use env::apply_env_overrides;
pub use proxy::ProxyDescriptor;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::HookbellError;
use defaults::*;

/// Top-level hookbell configuration.
///
/// Resolved once at startup (file, then environment) and passed by
/// reference everywhere else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hookbell: GeneralConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long to wait for the hook payload on stdin.
    #[serde(default = "default_ingest_timeout_ms")]
    pub ingest_timeout_ms: u64,
    /// Upper bound for a single channel delivery.
    #[serde(default = "default_delivery_timeout_secs")]
    pub delivery_timeout_secs: u64,
    /// Delay between the summary and the unconditional process exit.
    #[serde(default = "default_grace_delay_ms")]
    pub grace_delay_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            ingest_timeout_ms: default_ingest_timeout_ms(),
            delivery_timeout_secs: default_delivery_timeout_secs(),
            grace_delay_ms: default_grace_delay_ms(),
        }
    }
}

impl GeneralConfig {
    pub fn ingest_timeout(&self) -> Duration {
        Duration::from_millis(self.ingest_timeout_ms)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }
}

/// Default config file location, before `~` expansion.
pub fn default_path() -> String {
    default_config_path()
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HookbellError> {
    let expanded = shellexpand(path);
    let path = Path::new(&expanded);
    if !path.exists() {
        tracing::debug!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HookbellError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, HookbellError> {
    toml::from_str(content).map_err(|e| HookbellError::Config(format!("failed to parse config: {}", e)))
}
