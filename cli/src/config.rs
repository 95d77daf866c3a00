//! Configuration file handling for the CLI.
//!
//! Settings live in `$XDG_CONFIG_HOME/iam-console/config.toml` (or the
//! platform equivalent). `CONSOLE_*` environment variables override the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use console_business::RawConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token sent as a bearer token
    pub token: Option<String>,
}

impl Config {
    /// `$XDG_CONFIG_HOME/iam-console/config.toml` on Linux, the platform
    /// config directory elsewhere.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("iam-console").join("config.toml"))
    }

    /// Load configuration from `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn set_server(&mut self, url: &str) {
        self.server.url = Some(url.trim().trim_end_matches('/').to_owned());
    }

    pub fn set_token(&mut self, token: &str) {
        self.auth.token = Some(token.trim().to_owned());
    }

    pub fn clear_token(&mut self) {
        self.auth.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.auth.token.is_some()
    }

    /// The file's settings as the lowest-priority configuration layer.
    pub fn to_raw(&self) -> RawConfig {
        RawConfig {
            server_url: self.server.url.clone(),
            organization: self.server.organization.clone(),
            access_token: self.auth.token.clone(),
            ..RawConfig::default()
        }
    }
}
