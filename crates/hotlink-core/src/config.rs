//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use hotlink_probe::{DEFAULT_ADAPTER_HEADER, DEFAULT_GATEWAY_PORT};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the bundled pages
    pub resources_dir: PathBuf,
    /// Adapter status command, program first
    pub adapter_command: Vec<String>,
    /// Section header of the wireless adapter in the command output
    pub adapter_header: String,
    /// Port of the phone's web server
    pub gateway_port: u16,
    /// Reconciliation tick interval
    pub tick_interval_ms: u64,
    /// Downloads panel inactivity timeout
    pub panel_timeout_secs: u64,
}

impl Config {
    pub fn new(resources_dir: PathBuf) -> Self {
        Self {
            resources_dir,
            adapter_command: vec!["ipconfig".to_string()],
            adapter_header: DEFAULT_ADAPTER_HEADER.to_string(),
            gateway_port: DEFAULT_GATEWAY_PORT,
            tick_interval_ms: 250,
            panel_timeout_secs: 10,
        }
    }

    /// Read a JSON config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str::<Config>(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.adapter_command.is_empty() {
            return Err(CoreError::Config("adapter_command is empty".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(CoreError::Config(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn panel_timeout(&self) -> Duration {
        Duration::from_secs(self.panel_timeout_secs)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Hotlink"))
            .unwrap_or_else(|| PathBuf::from(".hotlink"))
    }

    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("resources"))
    }
}

// Local data directory lookup per platform
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
