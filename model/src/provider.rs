use crate::types::{ChatRequest, ChatResponse, ModelInfo};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Authentication failed")]
    Authentication,

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl ModelError {
    /// Maps a failed HTTP exchange to the closest error kind.
    pub(crate) fn from_status(status: reqwest::StatusCode, model: &str, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => ModelError::Authentication,
            404 => ModelError::ModelNotFound {
                model: model.to_string(),
            },
            429 => ModelError::RateLimit,
            500..=599 => ModelError::ServiceUnavailable {
                message: format!("{}: {}", status, body),
            },
            _ => ModelError::Unknown {
                message: format!("API returned {}: {}", status, body),
            },
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error, service: &str) -> Self {
        if err.is_timeout() {
            ModelError::ServiceUnavailable {
                message: "Request timeout".to_string(),
            }
        } else if err.is_connect() {
            ModelError::ServiceUnavailable {
                message: format!("Cannot connect to {}", service),
            }
        } else {
            ModelError::Network(err)
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> ModelResult<ChatResponse>;

    async fn list_models(&self) -> ModelResult<Vec<ModelInfo>>;

    async fn health_check(&self) -> ModelResult<()>;

    fn provider_name(&self) -> &'static str;
}
