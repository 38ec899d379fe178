//! Lab configuration.
//!
//! Settings come from an optional `mecamaster.toml`; the Gemini API key is
//! read from the environment only and handed straight to the provider.

use crate::tutor::TutorModels;
use model::{GeminiConfig, GeminiProvider, ModelError, ModelProvider, OllamaConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "mecamaster.toml";

/// Environment variables searched for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No API key found; set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Provider(#[from] ModelError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    pub base_url: String,
    pub reasoning_model: String,
    pub fast_model: String,
    pub timeout_secs: u64,
    pub thinking_budget: Option<u32>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for GeminiSection {
    fn default() -> Self {
        let models = TutorModels::default();
        Self {
            base_url: GeminiConfig::default().base_url,
            reasoning_model: models.reasoning,
            fast_model: models.fast,
            timeout_secs: 120,
            thinking_budget: models.thinking_budget,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            base_url: OllamaConfig::default().base_url,
            model: "llama3.1:8b".to_string(),
            timeout_secs: 120,
            temperature: None,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub provider: ProviderKind,
    pub gemini: GeminiSection,
    pub ollama: OllamaSection,
}

impl LabConfig {
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: LabConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path` if given (it must exist), otherwise `mecamaster.toml` in
    /// the working directory if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.exists() {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.gemini.reasoning_model.trim().is_empty() || self.gemini.fast_model.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "Gemini model names cannot be empty".to_string(),
            ));
        }
        if self.ollama.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Ollama model name cannot be empty".to_string(),
            ));
        }
        if self.gemini.timeout_secs == 0 || self.ollama.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        for temperature in [self.gemini.temperature, self.ollama.temperature]
            .into_iter()
            .flatten()
        {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::Invalid(
                    "Temperature must be between 0.0 and 2.0".to_string(),
                ));
            }
        }
        if self.gemini.max_output_tokens == Some(0) || self.ollama.max_tokens == Some(0) {
            return Err(ConfigError::Invalid(
                "Max tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// First non-empty value among [`API_KEY_VARS`].
    pub fn api_key_from_env() -> Option<String> {
        API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    pub fn gemini_config(&self, api_key: impl Into<String>) -> GeminiConfig {
        let mut config = GeminiConfig::new(api_key)
            .with_base_url(self.gemini.base_url.clone())
            .with_timeout(Duration::from_secs(self.gemini.timeout_secs));
        if let Some(temperature) = self.gemini.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.gemini.max_output_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    pub fn ollama_config(&self) -> OllamaConfig {
        let mut config = OllamaConfig::new()
            .with_base_url(self.ollama.base_url.clone())
            .with_timeout(Duration::from_secs(self.ollama.timeout_secs));
        if let Some(temperature) = self.ollama.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.ollama.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    pub fn tutor_models(&self) -> TutorModels {
        match self.provider {
            ProviderKind::Gemini => TutorModels {
                reasoning: self.gemini.reasoning_model.clone(),
                fast: self.gemini.fast_model.clone(),
                thinking_budget: self.gemini.thinking_budget,
            },
            ProviderKind::Ollama => TutorModels::single(self.ollama.model.clone()),
        }
    }

    /// Builds the provider selected by `provider`.
    pub fn build_provider(&self) -> ConfigResult<Arc<dyn ModelProvider>> {
        match self.provider {
            ProviderKind::Gemini => {
                let api_key = Self::api_key_from_env().ok_or(ConfigError::MissingApiKey)?;
                let provider = GeminiProvider::new(self.gemini_config(api_key))?;
                Ok(Arc::new(provider))
            }
            ProviderKind::Ollama => self.build_ollama(),
        }
    }

    #[cfg(feature = "ollama")]
    fn build_ollama(&self) -> ConfigResult<Arc<dyn ModelProvider>> {
        let provider = model::OllamaProvider::new(self.ollama_config())?;
        Ok(Arc::new(provider))
    }

    #[cfg(not(feature = "ollama"))]
    fn build_ollama(&self) -> ConfigResult<Arc<dyn ModelProvider>> {
        Err(ConfigError::Invalid(
            "this build does not include the ollama provider".to_string(),
        ))
    }
}
