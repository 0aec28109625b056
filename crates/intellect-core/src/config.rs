//! Gateway configuration loaded from file and environment.
//!
//! | Source | Example | Notes |
//! |--------|---------|-------|
//! | defaults | port 8000 | see [`AppConfig::load_from`] |
//! | TOML file | `config/gateway.toml` | path overridable with `INTELLECT_CONFIG` |
//! | env | `INTELLECT__PORT=9000` | prefix `INTELLECT`, separator `__` |
//! | env | `GOOGLE_API_KEY` | plain key accepted when the prefixed one is absent |
//!
//! A missing Google API key is a [`ConfigError::MissingApiKey`]; the gateway treats it as fatal
//! before binding a listener.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_THINKING_MODEL: &str = "gemini-2.0-flash-thinking-exp-01-21";
pub const DEFAULT_SVG_MODEL: &str = "gemini-2.0-flash";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("configuration load failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Runtime configuration for the tutor gateway and its completion client.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// Base URL of the Gemini REST API (without trailing slash).
    pub api_base: String,
    /// Model used for ordinary chat turns.
    pub chat_model: String,
    /// Model used when the caller asks for the thinking model.
    pub thinking_model: String,
    /// Model used by the direct SVG endpoint and background SVG jobs.
    pub svg_model: String,
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub google_api_key: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_name", &self.app_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("thinking_model", &self.thinking_model)
            .field("svg_model", &self.svg_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("google_api_key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Load config. Precedence: env `INTELLECT__*` > file (`INTELLECT_CONFIG` or `config/gateway`) > defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("INTELLECT_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        Self::load_from(Path::new(&config_path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "Intellect Tutor")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000_i64)?
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("chat_model", DEFAULT_CHAT_MODEL)?
            .set_default("thinking_model", DEFAULT_THINKING_MODEL)?
            .set_default("svg_model", DEFAULT_SVG_MODEL)?
            .set_default("request_timeout_secs", 60_i64)?
            .set_default("google_api_key", "")?;

        let builder = if path.exists() || path.with_extension("toml").exists() {
            builder.add_source(config::File::with_name(&path.to_string_lossy()))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("INTELLECT").separator("__"))
            .build()?;

        let mut cfg: AppConfig = built.try_deserialize()?;
        if cfg.google_api_key.trim().is_empty() {
            cfg.google_api_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();
        }
        cfg.google_api_key = cfg.google_api_key.trim().to_string();
        if cfg.google_api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Config for tests and tooling: defaults with an explicit key, no file or env lookup.
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            app_name: "Intellect Tutor".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            api_base: DEFAULT_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            thinking_model: DEFAULT_THINKING_MODEL.to_string(),
            svg_model: DEFAULT_SVG_MODEL.to_string(),
            request_timeout_secs: 60,
            google_api_key: api_key.trim().to_string(),
        }
    }
}

/// Presence of well-known environment variables, without exposing values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvStatus {
    pub variables: BTreeMap<String, bool>,
    pub google_api_key_set: bool,
    pub google_api_key_length: usize,
}

const CHECKED_ENV_VARS: &[&str] = &[
    "NEXT_PUBLIC_SUPABASE_URL",
    "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    "SUPABASE_SERVICE_ROLE_KEY",
    "AUTH0_SECRET",
    "AUTH0_BASE_URL",
    "AUTH0_ISSUER_BASE_URL",
    "AUTH0_CLIENT_ID",
    "AUTH0_CLIENT_SECRET",
];

impl EnvStatus {
    pub fn collect(config: &AppConfig) -> Self {
        let variables = CHECKED_ENV_VARS
            .iter()
            .map(|name| {
                let set = std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
                (name.to_string(), set)
            })
            .collect();
        Self {
            variables,
            google_api_key_set: !config.google_api_key.is_empty(),
            google_api_key_length: config.google_api_key.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "port = 9123\nthinking_model = \"custom-thinker\"\ngoogle_api_key = \"  k-123 \"").unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.port, 9123);
        assert_eq!(cfg.thinking_model, "custom-thinker");
        assert_eq!(cfg.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(cfg.google_api_key, "k-123");
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9123");
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = AppConfig::with_api_key("super-secret");
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn env_status_reports_key_length_only() {
        let cfg = AppConfig::with_api_key("abcdef");
        let status = EnvStatus::collect(&cfg);
        assert!(status.google_api_key_set);
        assert_eq!(status.google_api_key_length, 6);
        assert_eq!(status.variables.len(), CHECKED_ENV_VARS.len());
    }
}
