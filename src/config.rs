//! Configuration management for Wanderlust
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WanderlustError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the generation service credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Root configuration structure for Wanderlust
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderlustConfig {
    /// Generation service configuration
    pub gemini: GeminiConfig,
    /// Web server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// OpenTelemetry export configuration
    pub telemetry: TelemetryConfig,
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL of the generative-language API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model used for `generateContent`
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Request timeout in seconds, 0 leaves it to the transport
    #[serde(default)]
    pub timeout_seconds: u32,
    /// Retries on transient failures, 0 means a single attempt
    #[serde(default)]
    pub max_retries: u32,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Listening port; `PORT` overrides it
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with the page and its assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// PEM certificate, only used with the `tls` feature
    pub tls_cert_path: Option<String>,
    /// PEM private key, only used with the `tls` feature
    pub tls_key_path: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// OpenTelemetry export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP/HTTP collector base URL, export is disabled when unset
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-pro".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3003
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_service_name() -> String {
    "wanderlust".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            timeout_seconds: 0,
            max_retries: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
            body_limit_bytes: default_body_limit(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: default_service_name(),
        }
    }
}

impl WanderlustConfig {
    /// Load configuration from `config_path`, the user config dir or `./config.toml`,
    /// then the environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(Self::env_overrides());

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WanderlustConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_fallbacks();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// `WANDERLUST_<SECTION>__<KEY>` variables, e.g. `WANDERLUST_GEMINI__MODEL`
    fn env_overrides() -> Environment {
        Environment::with_prefix("WANDERLUST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wanderlust").join("config.toml"))
    }

    /// `GEMINI_API_KEY` fills a missing key, `PORT` overrides the port
    fn apply_env_fallbacks(&mut self) {
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        }
        if let Some(port) = env::var("PORT").ok().and_then(|port| port.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.body_limit_bytes == 0 {
            self.server.body_limit_bytes = default_body_limit();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.telemetry.service_name.is_empty() {
            self.telemetry.service_name = default_service_name();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The key is optional until a generation is requested, but never blank
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.gemini.api_key {
            if api_key.trim().is_empty() {
                return Err(WanderlustError::config(
                    "Gemini API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.gemini.timeout_seconds > 300 {
            return Err(WanderlustError::config(
                "Gemini API timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.gemini.max_retries > 10 {
            return Err(WanderlustError::config(
                "Gemini API max retries cannot exceed 10"
            ).into());
        }

        if self.server.port == 0 {
            return Err(WanderlustError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WanderlustError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WanderlustError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !is_http_url(&self.gemini.base_url) {
            return Err(WanderlustError::config(
                "Gemini API base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        if let Some(endpoint) = &self.telemetry.otlp_endpoint {
            if !is_http_url(endpoint) {
                return Err(WanderlustError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL"
                ).into());
            }
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(WanderlustError::config(
                "TLS requires both tls_cert_path and tls_key_path"
            ).into());
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = WanderlustConfig::default();
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.gemini.max_retries, 0);
        assert_eq!(config.gemini.timeout_seconds, 0);
        assert_eq!(config.server.port, 3003);
        assert_eq!(config.logging.level, "info");
        assert!(config.gemini.api_key.is_none());
        assert!(config.telemetry.otlp_endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = WanderlustConfig::default();
        config.gemini.api_key = Some("   ".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WanderlustConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WanderlustConfig::default();
        config.gemini.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = WanderlustConfig::default();
        config.gemini.max_retries = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_half_tls_pair() {
        let mut config = WanderlustConfig::default();
        config.server.tls_cert_path = Some("cert.pem".to_string());
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("TLS requires both"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = WanderlustConfig::default();
        config.gemini.model = String::new();
        config.logging.format = String::new();
        config.server.body_limit_bytes = 0;
        config.apply_defaults();
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.server.body_limit_bytes, 64 * 1024);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[gemini]
model = "gemini-1.5-flash"
max_retries = 2

[server]
static_dir = "public"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = WanderlustConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.gemini.max_retries, 2);
        assert_eq!(config.server.static_dir, "public");
        assert_eq!(config.logging.format, "json");
        // Sections and keys missing from the file keep their defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.telemetry.service_name, "wanderlust");
    }

    #[test]
    fn test_shipped_default_config_loads() {
        let config =
            WanderlustConfig::load_from_path(Some(PathBuf::from("config/default.toml"))).unwrap();
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.server.static_dir, "static");
        assert_eq!(config.server.body_limit_bytes, 65536);
    }

    #[test]
    fn test_env_override_names() {
        let vars = config::Map::from([
            ("WANDERLUST_GEMINI__MODEL".to_string(), "gemini-1.5-flash".to_string()),
            ("WANDERLUST_SERVER__PORT".to_string(), "8080".to_string()),
        ]);
        let settings = Config::builder()
            .add_source(WanderlustConfig::env_overrides().source(Some(vars)))
            .build()
            .unwrap();
        let config: WanderlustConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WanderlustConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("wanderlust"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
