//! Startup configuration: `coala.toml`, then environment, then CLI flags.

use crate::llama::GenerationOptions;
use crate::preprocessing::{PromptTemplate, TemplateError, DEFAULT_TEMPLATE};
use crate::session::HistoryRetention;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "coala.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid server url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("Invalid prompt template: {0}")]
    Template(#[from] TemplateError),
    #[error("Invalid value `{value}` for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub generation: GenerationOptions,
    pub prompt: PromptConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

/// Identifiers the model server was started with. Opaque to this crate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub base: String,
    pub adapter: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub connect_timeout_seconds: u64,
    /// Upper bound for one whole generation; unset means wait forever.
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    pub template: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub history: HistoryRetention,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub subtitle: String,
    pub sidebar_title: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base: "TinyPixel/CodeLlama-7B-Python-bf16-sharded".to_string(),
            adapter: Some("hariqueen/myllama2".to_string()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            connect_timeout_seconds: 10,
            request_timeout_seconds: Some(300),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "🐨 Coala Chatbot".to_string(),
            subtitle: "📘 Ask me about Python code.".to_string(),
            sidebar_title: "Question history".to_string(),
        }
    }
}

impl Config {
    /// Reads `path`, or `coala.toml` in the working directory when it exists,
    /// falling back to defaults. Environment overrides are applied on top;
    /// call [`Config::validate`] once every override is in.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides from `COALA_*` variables; `lookup` abstracts the environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("COALA_SERVER_URL") {
            self.server.url = url;
        }
        if let Some(base) = lookup("COALA_BASE_MODEL") {
            self.model.base = base;
        }
        if let Some(adapter) = lookup("COALA_ADAPTER") {
            self.model.adapter = (!adapter.trim().is_empty()).then_some(adapter);
        }
        if let Some(value) = lookup("COALA_MAX_NEW_TOKENS") {
            self.generation.max_new_tokens =
                value.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidEnv {
                        var: "COALA_MAX_NEW_TOKENS",
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
        }
        if let Some(value) = lookup("COALA_HISTORY") {
            self.session.history = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: "COALA_HISTORY",
                value: value.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_url()?;
        self.template()?;
        Ok(())
    }

    pub fn server_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.server.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.server.url.clone(),
            source,
        })
    }

    pub fn template(&self) -> Result<PromptTemplate, ConfigError> {
        Ok(PromptTemplate::parse(&self.prompt.template)?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.server.connect_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.server.request_timeout_seconds.map(Duration::from_secs)
    }
}
