//! Resolves settings and builds the API client for a command run.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use console_business::{ApiClient, ConsoleConfig, RawConfig};
use tracing::{debug, instrument};

use crate::config::Config;

pub struct AppContext {
    pub config_path: PathBuf,
    pub file: Config,
}

impl AppContext {
    /// Loads the config file from `path`, or from the default location.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Config::default_path()?,
        };
        debug!(path = %config_path.display(), "loading config file");
        let file = Config::load(&config_path)?;
        Ok(Self { config_path, file })
    }

    /// Environment first, then the config file.
    #[instrument(skip_all, name = "resolve_config")]
    pub fn console_config(&self) -> Result<ConsoleConfig> {
        let env = RawConfig::from_env()?;
        resolve(env, &self.file)
    }

    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(self.console_config()?))
    }

    pub fn save(&self) -> Result<()> {
        self.file.save(&self.config_path)
    }
}

pub fn resolve(env: RawConfig, file: &Config) -> Result<ConsoleConfig> {
    ConsoleConfig::from_raw(env.or(file.to_raw()))
        .context("Server not configured; run `iam-console config set-server <url>` or set CONSOLE_SERVER_URL")
}
