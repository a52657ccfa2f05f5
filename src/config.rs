//! Application configuration.
//!
//! Read from `$DIGITAL_XMAS_CONFIG`, or `digital-xmas.toml` in the working
//! directory when present. Every key is optional. The API credential from the
//! environment (`API_KEY`, then `GEMINI_API_KEY`) overrides the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::net::wish::DEFAULT_MODEL;

pub const CONFIG_ENV: &str = "DIGITAL_XMAS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "digital-xmas.toml";
pub const CREDENTIAL_ENV: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// API base URL
    pub endpoint: String,
    pub request_timeout_secs: u64,
    /// Fixed layout seed; a random one is chosen when absent
    pub layout_seed: Option<u64>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: String::from("https://generativelanguage.googleapis.com/v1beta/"),
            request_timeout_secs: 30,
            layout_seed: None,
            window_width: 1280.0,
            window_height: 800.0,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        url::Url::parse(&config.endpoint)?;
        Ok(config)
    }

    /// Load from the configured file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("config loaded from {}", path.display());
        Self::from_toml(&text)
    }

    /// Take the credential from the first non-empty variable in `CREDENTIAL_ENV`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let from_env = CREDENTIAL_ENV
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty());
        if let Some(key) = from_env {
            self.api_key = Some(key);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parses_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            layout_seed = 1225
            model = "gemini-2.5-flash"
            window_width = 960.0
            "#,
        )
        .unwrap();
        assert_eq!(config.layout_seed, Some(1225));
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.window_width, 960.0);
        assert_eq!(config.window_height, 800.0);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_endpoint() {
        assert!(matches!(
            AppConfig::from_toml("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("endpoint = \"not a url\""),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn env_credential_overrides_file() {
        let mut config = AppConfig::from_toml("api_key = \"from-file\"").unwrap();
        config.apply_env(|name| match name {
            "API_KEY" => Some(String::new()),
            "GEMINI_API_KEY" => Some("from-env".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn file_credential_kept_without_env() {
        let mut config = AppConfig::from_toml("api_key = \"from-file\"").unwrap();
        config.apply_env(|_| None);
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::from_file(Path::new("/nonexistent/digital-xmas.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/digital-xmas.toml"));
    }
}
