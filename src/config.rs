use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub service: ServiceConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Wrap the rendered blocks in the chat bubble container.
    pub wrap_document: bool,
    /// Alternate body row backgrounds.
    pub striped_rows: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap_document: true,
            striped_rows: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub system_instruction: String,
    /// Sent in place of an empty user message.
    pub default_prompt: String,
    pub messages: MessagesConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
            api_key_env: "GEMINI_API_KEY".to_string(),
            system_instruction: concat!(
                "You are a senior application engineer for industrial pneumatic components.\n",
                "Identify the part described or shown by the user and suggest the closest\n",
                "Camozzi equivalent. When comparing parts, answer with a markdown table whose\n",
                "first row is a header. Use **bold** for part codes."
            )
            .to_string(),
            default_prompt: "Identify this item and suggest the Camozzi equivalent.".to_string(),
            messages: MessagesConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// User-facing replies for the outcomes that carry no model text.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagesConfig {
    pub empty_response: String,
    pub resource_unavailable: String,
    pub communication_failure: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            empty_response: "Unable to generate a technical response.".to_string(),
            resource_unavailable: "SYSTEM ALERT: The requested model is unavailable or the API key is not valid for this resource.".to_string(),
            communication_failure: "TECHNICAL ERROR: Communication with the engineering server failed. Please try again shortly.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    /// The configuration embedded at build time.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. A missing file yields the compiled defaults.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::compiled_default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load config, falling back to the compiled defaults on any error.
    ///
    /// The error is handed back so the caller can report it once logging is up.
    pub fn load(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::try_load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::compiled_default(), Some(e)),
        }
    }
}

/// Mask an API key for logging, keeping only its first four characters.
pub fn mask_api_key(key: Option<&str>) -> String {
    match key {
        Some(key) => {
            let prefix: String = key.chars().take(4).collect();
            format!("{prefix}****")
        }
        None => "not found".to_string(),
    }
}
