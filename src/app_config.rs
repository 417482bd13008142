//! Module for application configuration settings.
//!
//! User configurations may be specified in a configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use larder::api::{ClientBuilder, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, TenantContext};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::onboarding::{self, OnboardingError};

/// Overrides the configured API key when set and non-empty.
pub const API_KEY_ENV: &str = "LARDER_API_KEY";

const MAX_PAGE_SIZE: u32 = 100;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_query_retries() -> usize {
    3
}

fn serialize_api_key<S>(_api_key: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("****")
}

/// How to reach the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// The merchant API key. Masked whenever the config is serialized.
    #[serde(serialize_with = "serialize_api_key")]
    pub api_key: SecretString,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rows per page for every list command.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Retries for read-only queries on transient failures.
    #[serde(default = "default_query_retries")]
    pub query_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: SecretString::from(String::new()),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            query_retries: default_query_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
struct DangerousApiConfig<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub query_retries: usize,
}

impl<'a> From<&'a ApiConfig> for DangerousApiConfig<'a> {
    fn from(api: &'a ApiConfig) -> Self {
        Self {
            base_url: &api.base_url,
            api_key: api.api_key.expose_secret(),
            timeout_secs: api.timeout_secs,
            page_size: api.page_size,
            query_retries: api.query_retries,
        }
    }
}

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub api: ApiConfig,

    /// The business (and optionally location and producer) every command acts on.
    pub tenant: TenantContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
struct DangerousConfig<'a> {
    pub api: DangerousApiConfig<'a>,
    pub tenant: &'a TenantContext,
}

impl<'a> From<&'a Config> for DangerousConfig<'a> {
    fn from(config: &'a Config) -> Self {
        Self {
            api: DangerousApiConfig::from(&config.api),
            tenant: &config.tenant,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation errors: {0:?}")]
    ValidationErrors(Vec<String>),

    #[error("Failed to onboard: {0}")]
    OnboardingError(OnboardingError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parent directory does not exist.")]
    NoParentDir,

    #[error("No suitable configuration path found.")]
    NoSuitableConfigPath,
}

impl Config {
    /// Validate the correctness of the configuration.
    ///
    /// Returns:
    /// - `Ok(())` if the configuration is valid.
    /// - `Err(Vec<String>)` containing every problem found otherwise.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api.api_key.expose_secret().trim().is_empty() {
            errors.push(format!(
                "No API key configured. Set api.api-key or the {API_KEY_ENV} environment variable."
            ));
        }

        let base = self.api.base_url.as_str();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            errors.push(format!("Base URL '{base}' must start with http:// or https://."));
        }

        if self.api.timeout_secs == 0 {
            errors.push("timeout-secs must be greater than zero.".to_owned());
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            errors.push(format!(
                "page-size must be between 1 and {MAX_PAGE_SIZE}, got {}.",
                self.api.page_size
            ));
        }

        if self.tenant.business_id.trim().is_empty() {
            errors.push("tenant.business-id cannot be empty.".to_owned());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Replace the configured key with `LARDER_API_KEY` when that is set.
    fn apply_env(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    /// A blank override keeps the configured key.
    fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key
            && !key.trim().is_empty()
        {
            debug!("Using API key from {API_KEY_ENV}.");
            self.api.api_key = SecretString::from(key);
        }
        self
    }

    /// A client builder carrying every API setting.
    pub fn client_builder(&self) -> ClientBuilder {
        ClientBuilder::new(self.api.api_key.expose_secret())
            .base_url(self.api.base_url.clone())
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .page_size(self.api.page_size)
            .query_retries(self.api.query_retries)
    }

    /// Returns config file paths in descending priority order.
    /// On macOS, skips `dirs::config_dir()` (resolves to ~/Library/Application Support/).
    fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        #[cfg(not(target_os = "macos"))]
        if let Some(xdg) = dirs::config_dir() {
            paths.push(xdg.join("larder").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("larder").join("config.toml"));
        }

        paths.push(PathBuf::from("/etc/larder/config.toml"));

        paths
    }

    /// Finds the first existing config file from search paths.
    fn find_config_file() -> Option<PathBuf> {
        Self::config_search_paths().into_iter().find(|p| p.exists())
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads config from a single TOML file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = ?path, "Loading configuration file.");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads configuration from the first found config file, or the external path if given.
    pub fn load(external_config_path: Option<&Path>) -> Option<Result<Self, ConfigError>> {
        if let Some(path) = external_config_path {
            return Some(Self::load_from_file(path));
        }

        Self::find_config_file().map(|path| Self::load_from_file(&path))
    }

    /// Loads config or runs onboarding to create one if none exists.
    /// Errors if a config file exists but is malformed.
    pub fn load_or_create(external_config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(res) = Self::load(external_config_path) {
            let config = res?.apply_env();
            if let Err(validation_errors) = config.validate() {
                return Err(ConfigError::ValidationErrors(validation_errors));
            }
            debug!("Loaded configuration successfully.");
            return Ok(config);
        }

        // No config exists: onboard, then write to the highest-priority path.
        let creation_path = match external_config_path {
            Some(path) => path.to_path_buf(),
            None => Self::config_search_paths()
                .into_iter()
                .next()
                .ok_or(ConfigError::NoSuitableConfigPath)?,
        };

        let config = onboarding::run_wizard().map_err(ConfigError::OnboardingError)?;
        Ok(config.save_new(&creation_path)?.apply_env())
    }

    /// Write a freshly created config. Nothing is written if it does not validate.
    fn save_new(self, path: &Path) -> Result<Self, ConfigError> {
        self.validate().map_err(ConfigError::ValidationErrors)?;
        self.dangerously_write_to_disk(path)?;
        info!(path = ?path.display(), "Created configuration file.");
        Ok(self)
    }

    /// Writes the config including the real API key.
    fn dangerously_write_to_disk(&self, path: &Path) -> Result<(), ConfigError> {
        let dangerous_config = DangerousConfig::from(self);
        let toml_str = toml::to_string_pretty(&dangerous_config)?;
        std::fs::create_dir_all(path.parent().ok_or(ConfigError::NoParentDir)?)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[api]
api-key = "sk_test_123"

[tenant]
business-id = "biz_1"
"#;

    #[test]
    fn minimal_file_fills_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.tenant.location_id, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tenant_scope_is_read_in_kebab_case() {
        let raw = format!("{MINIMAL}location-id = \"loc_9\"\n");
        let config = Config::parse(&raw).unwrap();
        assert_eq!(config.tenant.location_id.as_deref(), Some("loc_9"));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config.api.api_key = SecretString::from(String::new());
        config.api.page_size = 0;
        config.api.base_url = "ftp://example".to_owned();
        config.tenant.business_id = " ".to_owned();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn serialized_config_masks_the_key() {
        let config = Config::parse(MINIMAL).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("****"));
        assert!(!text.contains("sk_test_123"));
    }

    #[test]
    fn api_key_override_wins_when_set() {
        let config = Config::parse(MINIMAL)
            .unwrap()
            .with_api_key_override(Some("sk_live_env".to_owned()));
        assert_eq!(config.api.api_key.expose_secret(), "sk_live_env");
    }

    #[test]
    fn blank_api_key_override_is_ignored() {
        for key in [None, Some(String::new()), Some("  ".to_owned())] {
            let config = Config::parse(MINIMAL).unwrap().with_api_key_override(key);
            assert_eq!(config.api.api_key.expose_secret(), "sk_test_123");
        }
    }

    #[test]
    fn overridden_key_is_still_masked() {
        let config = Config::parse(MINIMAL)
            .unwrap()
            .with_api_key_override(Some("sk_live_env".to_owned()));
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("****"));
        assert!(!text.contains("sk_live_env"));
    }

    #[test]
    fn invalid_new_config_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::parse(MINIMAL).unwrap();
        config.tenant.business_id = String::new();

        let err = config.save_new(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationErrors(ref errors) if errors.len() == 1));
        assert!(!path.exists());
    }

    #[test]
    fn valid_new_config_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::parse(MINIMAL).unwrap().save_new(&path).unwrap();

        let reread = Config::load_from_file(&path).unwrap();
        assert_eq!(reread.tenant, config.tenant);
    }

    #[test]
    fn written_config_keeps_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::parse(MINIMAL).unwrap();
        config.dangerously_write_to_disk(&path).unwrap();

        let reread = Config::load_from_file(&path).unwrap();
        assert_eq!(reread.api.api_key.expose_secret(), "sk_test_123");
        assert_eq!(reread.tenant, config.tenant);
    }
}
