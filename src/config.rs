//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default platform API address
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Delay between a successful submission and the wizard closing
const DEFAULT_AUTO_CLOSE_MS: u64 = 1500;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Base URL of the platform API
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// How long the success confirmation stays up before a wizard closes
    pub auto_close_ms: Option<u64>,
    /// Serve in-memory fixture data instead of calling the API
    pub use_fixtures: Option<bool>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("edu", "platform", "edu-admin-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file
    pub fn log_dir() -> Option<PathBuf> {
        ProjectDirs::from("edu", "platform", "edu-admin-tui")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// API base URL: `EDU_ADMIN_API_URL`, then the config file, then the default
    pub fn api_base_url(&self) -> String {
        std::env::var("EDU_ADMIN_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms.unwrap_or(DEFAULT_AUTO_CLOSE_MS))
    }

    /// Fixtures are on when `EDU_ADMIN_FIXTURES` is `1`/`true` or the config says so
    pub fn fixtures_enabled(&self) -> bool {
        match std::env::var("EDU_ADMIN_FIXTURES") {
            Ok(v) => matches!(v.as_str(), "1" | "true" | "yes"),
            Err(_) => self.use_fixtures.unwrap_or(false),
        }
    }
}
