//! Configuration types for the agent-echo service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EchoError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Hosted-model generation settings.
    pub generation: GenerationConfig,
    /// Feed scheduler settings.
    pub feed: FeedConfig,
    /// Phone-number auth stub settings.
    pub auth: AuthConfig,
    /// Flat-file storage settings.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host/interface to bind.
    pub host: String,
    /// Port to bind (0 = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 9090,
        }
    }
}

/// Hosted-model generation configuration.
///
/// Points at any OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider base URL (with or without a trailing `/v1`).
    pub api_url: String,
    /// Model identifier sent with each completion request.
    pub api_model: String,
    /// API key reference.
    pub api_key: SecretRef,
    /// Per-request timeout in seconds. Bounds worst-case cycle latency.
    pub timeout_secs: u64,
    /// Maximum tokens per generated completion.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_owned(),
            api_model: "gpt-4o-mini".to_owned(),
            api_key: SecretRef::Env {
                var: "AGENT_ECHO_API_KEY".to_owned(),
            },
            timeout_secs: 30,
            max_tokens: 256,
            temperature: 0.9,
        }
    }
}

/// Feed scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Interval between automatic post-generation cycles, in milliseconds.
    pub post_interval_ms: u64,
    /// Minimum accepted persona prompt length in characters.
    pub prompt_min_chars: usize,
    /// Maximum accepted persona prompt length in characters.
    pub prompt_max_chars: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            post_interval_ms: 30_000,
            prompt_min_chars: 10,
            prompt_max_chars: 500,
        }
    }
}

/// Phone-number auth stub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Telegram bot token reference. The stub never calls Telegram, but an
    /// empty token is still rejected at service construction.
    pub bot_token: SecretRef,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_token: SecretRef::Env {
                var: "TELEGRAM_BOT_TOKEN".to_owned(),
            },
        }
    }
}

/// Flat-file storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data root override. When `None`, [`crate::app_dirs::data_dir`] is used.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the effective data root directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::app_dirs::data_dir)
    }

    /// Directory for persisted user records (`{telegram_id}.json`).
    #[must_use]
    pub fn users_dir(&self) -> PathBuf {
        self.effective_data_dir().join("users")
    }

    /// Directory for persisted wallet files (`{user_id}.json`).
    #[must_use]
    pub fn wallets_dir(&self) -> PathBuf {
        self.effective_data_dir().join("wallets")
    }
}

/// Secret reference used for API keys and tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretRef {
    /// No secret.
    #[default]
    None,
    /// Inline literal value (discouraged; prefer env).
    Literal { value: String },
    /// Resolve from an environment variable.
    Env { var: String },
}

impl SecretRef {
    /// Resolve the secret to a value, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when an `env` reference names a missing or empty
    /// variable.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Literal { value } => Ok(Some(value.clone())),
            Self::Env { var } => {
                let value = std::env::var(var).map_err(|_| {
                    EchoError::Config(format!("secret env var is missing: {var}"))
                })?;
                if value.trim().is_empty() {
                    return Err(EchoError::Config(format!("secret env var is empty: {var}")));
                }
                Ok(Some(value))
            }
        }
    }

    /// Resolve the secret, treating "not set" as an empty string.
    pub fn resolve_or_empty(&self) -> Result<String> {
        Ok(self.resolve()?.unwrap_or_default())
    }
}

impl EchoConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EchoError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| EchoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `{config_dir}/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_dir().join("config.toml")
    }
}
