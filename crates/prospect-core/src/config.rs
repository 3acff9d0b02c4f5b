use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ProspectError;

/// Top-level Prospect configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub send: SendConfig,
    #[serde(default)]
    pub rdstation: RdStationConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Session identity stamped onto history and transfer rows.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            user_id: default_user_id(),
        }
    }
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Bulk send config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendConfig {
    /// Delay between consecutive link opens, in seconds. One per second
    /// keeps the host's pop-up heuristics from firing all at once.
    #[serde(default = "default_stagger_secs")]
    pub stagger_secs: u64,
    /// Force manual-tap mode even when a graphical session is detected.
    #[serde(default)]
    pub force_manual: bool,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            stagger_secs: default_stagger_secs(),
            force_manual: false,
        }
    }
}

/// RD Station API config.
///
/// Only the endpoint lives here; the token and the enabled flag are
/// user state and live in the settings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdStationConfig {
    #[serde(default = "default_rdstation_url")]
    pub api_url: String,
}

impl Default for RdStationConfig {
    fn default() -> Self {
        Self {
            api_url: default_rdstation_url(),
        }
    }
}

/// Transfer feature config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Directory the filesystem object store writes blobs to.
    #[serde(default = "default_objects_dir")]
    pub objects_dir: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            objects_dir: default_objects_dir(),
        }
    }
}

// --- Default value functions ---

fn default_data_dir() -> String {
    "~/.prospect".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_user_id() -> String {
    "local".to_string()
}
fn default_db_path() -> String {
    "~/.prospect/prospect.db".to_string()
}
fn default_stagger_secs() -> u64 {
    1
}
fn default_rdstation_url() -> String {
    "https://api.rd.services".to_string()
}
fn default_objects_dir() -> String {
    "~/.prospect/objects".to_string()
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
pub fn load(path: &str) -> Result<Config, ProspectError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ProspectError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| ProspectError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.send.stagger_secs, 1);
        assert!(!cfg.send.force_manual);
        assert_eq!(cfg.rdstation.api_url, "https://api.rd.services");
        assert_eq!(cfg.app.user_id, "local");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [send]
            stagger_secs = 3
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.send.stagger_secs, 3);
        assert_eq!(cfg.store.db_path, "~/.prospect/prospect.db");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.app.log_level, "info");
        assert_eq!(cfg.transfer.objects_dir, "~/.prospect/objects");
    }

    #[test]
    fn test_shellexpand_passthrough_without_tilde() {
        assert_eq!(shellexpand("/tmp/x.db"), "/tmp/x.db");
    }
}
