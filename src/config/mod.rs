//! Application Configuration
//!
//! Service credentials and settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::recognition::Category;

/// Environment variable overriding `credentials.api_key`
pub const API_KEY_ENV: &str = "IMAGE_RECOGNIZER_API_KEY";

/// Environment variable overriding `credentials.secret_key`
pub const SECRET_KEY_ENV: &str = "IMAGE_RECOGNIZER_SECRET_KEY";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API credentials
    pub credentials: CredentialsConfig,
    /// Remote service settings
    pub service: ServiceConfig,
    /// Recognition behavior
    pub recognition: RecognitionSettings,
}

impl AppConfig {
    /// Replace credentials with values from the process environment, if set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Replace credentials with values from `lookup`, ignoring empty values
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.credentials.api_key = key;
        }
        if let Some(secret) = lookup(SECRET_KEY_ENV).filter(|v| !v.is_empty()) {
            self.credentials.secret_key = secret;
        }
    }
}

/// API key and secret used to request access tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Client id (API Key)
    pub api_key: String,
    /// Client secret (Secret Key)
    pub secret_key: String,
}

impl CredentialsConfig {
    /// Both halves of the credential pair are present
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL for both the token and the recognition endpoints
    pub base_url: String,
    /// Per-request timeout in seconds; 0 disables the timeout
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://aip.baidubce.com".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Request timeout as a duration, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Recognition behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Category used when a selector matches nothing. Unset means unknown
    /// selectors are rejected.
    pub fallback_category: Option<Category>,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert!(config.credentials.api_key.is_empty());
        assert!(config.credentials.secret_key.is_empty());
        assert!(!config.credentials.is_complete());

        assert_eq!(config.service.base_url, "https://aip.baidubce.com");
        assert_eq!(
            config.service.request_timeout(),
            Some(Duration::from_secs(30))
        );

        assert!(config.recognition.fallback_category.is_none());
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.credentials.api_key = "key".to_string();
        config.credentials.secret_key = "secret".to_string();
        config.service.request_timeout_secs = 5;
        config.recognition.fallback_category = Some(Category::Animal);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert!(parsed.credentials.is_complete());
        assert_eq!(parsed.service.request_timeout_secs, 5);
        assert_eq!(parsed.recognition.fallback_category, Some(Category::Animal));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [credentials]
            api_key = "abc"

            [recognition]
            fallback_category = "animal"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.credentials.api_key, "abc");
        assert!(parsed.credentials.secret_key.is_empty());
        assert_eq!(parsed.service.base_url, "https://aip.baidubce.com");
        assert_eq!(parsed.recognition.fallback_category, Some(Category::Animal));
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [service]
            request_timeout_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.service.request_timeout(), None);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.service.base_url = "http://127.0.0.1:8080".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.service.base_url, "http://127.0.0.1:8080");
        assert_eq!(
            loaded.service.request_timeout_secs,
            config.service.request_timeout_secs
        );
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fallback_category_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [recognition]
            fallback_category = "passport"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.credentials.api_key = "from-file".to_string();

        config.apply_overrides_from(|key| match key {
            API_KEY_ENV => Some("from-env".to_string()),
            SECRET_KEY_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.credentials.api_key, "from-env");
        assert!(config.credentials.secret_key.is_empty());
    }
}
