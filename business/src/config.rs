use std::env::vars;

use serde::Deserialize;

const ENV_PREFIX: &str = "CONSOLE_";
pub const DEFAULT_ORGANIZATION: &str = "built-in";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("CONSOLE_SERVER_URL must be set")]
    MissingServerUrl,
    #[error("CONSOLE_SERVER_URL must start with http:// or https://, got {0:?}")]
    InvalidServerUrl(String),
    #[error("CONSOLE_CLIENT_ID and CONSOLE_CLIENT_SECRET must be set together")]
    PartialClientCredentials,
    #[error("Failed to read configuration from environment: {0}")]
    Env(String),
}

/// Settings as read from the environment, before validation.
///
/// Every field is optional so sources can be layered with [`RawConfig::or`]
/// before [`ConsoleConfig::from_raw`] checks the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConfig {
    pub server_url: Option<String>,
    pub organization: Option<String>,
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl RawConfig {
    /// Reads `CONSOLE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(vars())
    }

    /// Reads `CONSOLE_*` pairs from any iterator; other keys are ignored.
    pub fn from_vars<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value.into();
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .filter(|_| !value.is_empty())
                    .map(|key| (key.to_owned(), value))
            })
            .collect();
        serde_env::from_iter(scoped).map_err(|e| ConfigError::Env(e.to_string()))
    }

    /// Fills fields missing from `self` with the ones from `fallback`.
    pub fn or(self, fallback: RawConfig) -> Self {
        Self {
            server_url: self.server_url.or(fallback.server_url),
            organization: self.organization.or(fallback.organization),
            access_token: self.access_token.or(fallback.access_token),
            client_id: self.client_id.or(fallback.client_id),
            client_secret: self.client_secret.or(fallback.client_secret),
        }
    }
}

/// Validated connection settings for the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    server_url: String,
    organization: String,
    access_token: Option<String>,
    client_credentials: Option<(String, String)>,
}

impl ConsoleConfig {
    pub fn new(server_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_raw(RawConfig {
            server_url: Some(server_url.into()),
            ..RawConfig::default()
        })
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            server_url,
            organization,
            access_token,
            client_id,
            client_secret,
        } = raw;

        let server_url = server_url
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingServerUrl)?;
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(ConfigError::InvalidServerUrl(server_url));
        }

        let client_credentials = match (client_id, client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialClientCredentials),
        };

        let organization = organization.unwrap_or_else(|| {
            log::debug!("CONSOLE_ORGANIZATION not set, defaulting to {DEFAULT_ORGANIZATION}");
            DEFAULT_ORGANIZATION.to_owned()
        });

        Ok(Self {
            server_url,
            organization,
            access_token,
            client_credentials,
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn client_credentials(&self) -> Option<(&str, &str)> {
        self.client_credentials
            .as_ref()
            .map(|(id, secret)| (id.as_str(), secret.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_is_required() {
        let raw = RawConfig::from_vars([("CONSOLE_ORGANIZATION", "acme")])
            .expect("RawConfig should deserialize");
        assert_eq!(
            ConsoleConfig::from_raw(raw),
            Err(ConfigError::MissingServerUrl)
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_and_organization_defaults() {
        let raw = RawConfig::from_vars([("CONSOLE_SERVER_URL", "https://door.example.com/")])
            .expect("RawConfig should deserialize");

        let config = ConsoleConfig::from_raw(raw).expect("config should build");
        assert_eq!(config.server_url(), "https://door.example.com");
        assert_eq!(config.organization(), DEFAULT_ORGANIZATION);
        assert_eq!(config.access_token(), None);
        assert_eq!(config.client_credentials(), None);
    }

    #[test]
    fn unprefixed_and_empty_vars_are_ignored() {
        let raw = RawConfig::from_vars([
            ("SERVER_URL", "https://wrong.example.com"),
            ("CONSOLE_SERVER_URL", "http://localhost:8000"),
            ("CONSOLE_ACCESS_TOKEN", ""),
        ])
        .expect("RawConfig should deserialize");

        assert_eq!(raw.server_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(raw.access_token, None);
    }

    #[test]
    fn client_credentials_come_in_pairs() {
        let raw = RawConfig::from_vars([
            ("CONSOLE_SERVER_URL", "http://localhost:8000"),
            ("CONSOLE_CLIENT_ID", "id"),
        ])
        .expect("RawConfig should deserialize");
        assert_eq!(
            ConsoleConfig::from_raw(raw),
            Err(ConfigError::PartialClientCredentials)
        );

        let raw = RawConfig::from_vars([
            ("CONSOLE_SERVER_URL", "http://localhost:8000"),
            ("CONSOLE_CLIENT_ID", "id"),
            ("CONSOLE_CLIENT_SECRET", "secret"),
        ])
        .expect("RawConfig should deserialize");
        let config = ConsoleConfig::from_raw(raw).expect("config should build");
        assert_eq!(config.client_credentials(), Some(("id", "secret")));
    }

    #[test]
    fn server_url_needs_a_scheme() {
        let err = ConsoleConfig::new("door.example.com").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidServerUrl("door.example.com".to_owned())
        );
    }

    #[test]
    fn env_layer_wins_over_fallback() {
        let env = RawConfig {
            access_token: Some("from-env".to_owned()),
            ..RawConfig::default()
        };
        let file = RawConfig {
            server_url: Some("http://file.example.com".to_owned()),
            access_token: Some("from-file".to_owned()),
            ..RawConfig::default()
        };

        let merged = env.or(file);
        assert_eq!(merged.server_url.as_deref(), Some("http://file.example.com"));
        assert_eq!(merged.access_token.as_deref(), Some("from-env"));
    }
}
