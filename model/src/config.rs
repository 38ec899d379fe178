use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

fn validate_base_url(base_url: &str) -> Result<(), String> {
    if base_url.is_empty() {
        return Err("Base URL cannot be empty".to_string());
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err("Base URL must start with http:// or https://".to_string());
    }

    Ok(())
}

fn validate_sampling(
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
) -> Result<(), String> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err("Temperature must be between 0.0 and 2.0".to_string());
    }

    if let Some(max_tokens) = max_tokens {
        if max_tokens == 0 {
            return Err("Max tokens must be greater than 0".to_string());
        }
    }

    if timeout.is_zero() {
        return Err("Timeout must be greater than 0".to_string());
    }

    Ok(())
}

/// Connection settings for the Gemini `generateContent` API.
///
/// The API key is held here and nowhere else; `Debug` output redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub default_temperature: Option<f32>,
    pub default_max_tokens: Option<u32>,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(120),
            default_temperature: None,
            default_max_tokens: None,
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = Some(max_tokens);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.api_key.trim().is_empty() {
            return Err("API key cannot be empty".to_string());
        }

        validate_sampling(
            self.default_temperature.unwrap_or(1.0),
            self.default_max_tokens,
            self.timeout,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub default_temperature: f32,
    pub default_max_tokens: Option<u32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(120),
            default_temperature: 0.7,
            default_max_tokens: None,
        }
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = Some(max_tokens);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;
        validate_sampling(
            self.default_temperature,
            self.default_max_tokens,
            self.timeout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gemini_config_needs_key() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.validate().is_err());

        let config = GeminiConfig::new("secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gemini_debug_redacts_key() {
        let config = GeminiConfig::new("very-secret-key");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("very-secret-key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_config_builder() {
        let config = OllamaConfig::new()
            .with_base_url("https://ollama.example.com")
            .with_temperature(0.5)
            .with_max_tokens(512)
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "https://ollama.example.com");
        assert_eq!(config.default_temperature, 0.5);
        assert_eq!(config.default_max_tokens, Some(512));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GeminiConfig::new("key");

        config.base_url = "".to_string();
        assert!(config.validate().is_err());

        config.base_url = "generativelanguage.googleapis.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://generativelanguage.googleapis.com".to_string();
        config.default_temperature = Some(3.0);
        assert!(config.validate().is_err());

        config.default_temperature = Some(0.2);
        config.default_max_tokens = Some(0);
        assert!(config.validate().is_err());

        config.default_max_tokens = None;
        config.timeout = Duration::from_secs(0);
        assert!(config.validate().is_err());

        let mut config = OllamaConfig::default();
        config.default_temperature = -1.0;
        assert!(config.validate().is_err());
    }
}
