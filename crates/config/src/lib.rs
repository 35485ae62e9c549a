//! Configuration loading, validation, and management for ScopeDesk.
//!
//! Loads configuration from `~/.scopedesk/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! API keys are never part of the file format: the credential is supplied at
//! runtime (flag, environment, or the chat prompt) and never written back.

use scopedesk_core::identity::{Scope, StaticDirectory, UserRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variables consulted for the credential, highest priority first.
pub const CREDENTIAL_ENV_VARS: &[&str] = &[
    "SCOPEDESK_API_KEY",
    "OPENAI_API_KEY",
    "OPENROUTER_API_KEY",
];

/// The root configuration structure.
///
/// Maps directly to `~/.scopedesk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// HTTP timeout for a single provider call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Dataset location
    #[serde(default)]
    pub data: DataConfig,

    /// Provider-specific endpoint overrides
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Selectable identities; empty means the built-in table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_request_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("sample_data.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// A scope value as written in TOML: `8` or `"North"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeValue {
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for ScopeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// One `[[users]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Display name used for selection
    pub name: String,

    pub user_id: String,

    #[serde(default = "default_role")]
    pub role: String,

    /// `grade`, `region`, or anything else (which sees no data)
    pub scope_type: String,

    pub scope_value: ScopeValue,
}

fn default_role() -> String {
    "admin".into()
}

impl UserConfig {
    /// Convert into a domain record.
    ///
    /// Grade scopes must carry an integer (or integer text). Unknown scope
    /// types are kept as `Scope::Unrecognized` so they fail closed.
    pub fn to_record(&self) -> Result<UserRecord, ConfigError> {
        let scope = match self.scope_type.as_str() {
            "grade" => match &self.scope_value {
                ScopeValue::Integer(n) => Scope::Grade(*n),
                ScopeValue::Text(t) => Scope::Grade(t.trim().parse().map_err(|_| {
                    ConfigError::ValidationError(format!(
                        "user '{}' has a grade scope with non-integer value '{t}'",
                        self.name
                    ))
                })?),
            },
            "region" => Scope::Region(self.scope_value.to_string()),
            other => {
                tracing::warn!(
                    user = %self.name,
                    scope_type = %other,
                    "Unrecognized scope type, this user will see no data"
                );
                Scope::Unrecognized {
                    kind: other.to_string(),
                    value: self.scope_value.to_string(),
                }
            }
        };

        Ok(UserRecord::new(
            self.user_id.clone(),
            self.name.clone(),
            self.role.clone(),
            scope,
        ))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.scopedesk/config.toml).
    ///
    /// Environment overrides:
    /// - `SCOPEDESK_PROVIDER`
    /// - `SCOPEDESK_MODEL`
    /// - `SCOPEDESK_DATA`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply environment-style overrides. Runs whether or not a file was found.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("SCOPEDESK_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("SCOPEDESK_MODEL") {
            self.default_model = model;
        }

        if let Some(data) = lookup("SCOPEDESK_DATA") {
            self.data.path = PathBuf::from(data);
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".scopedesk")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        let mut seen: Vec<&str> = Vec::new();
        for user in &self.users {
            if user.name.trim().is_empty() || user.user_id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "every user needs a non-empty name and user_id".into(),
                ));
            }
            if seen.contains(&user.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate user name '{}'",
                    user.name
                )));
            }
            seen.push(&user.name);
            user.to_record()?;
        }

        Ok(())
    }

    /// The identity directory: configured users in order, or the built-in table.
    pub fn directory(&self) -> Result<StaticDirectory, ConfigError> {
        if self.users.is_empty() {
            return Ok(StaticDirectory::builtin());
        }
        let records = self
            .users
            .iter()
            .map(UserConfig::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StaticDirectory::new(records))
    }

    /// Model to use for a provider: per-provider override, else the default.
    pub fn model_for(&self, provider: &str) -> String {
        self.providers
            .get(provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            data: DataConfig::default(),
            providers: HashMap::new(),
            users: vec![],
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
