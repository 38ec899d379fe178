pub mod config;
pub mod gemini;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod provider;
pub mod types;

pub use config::{GeminiConfig, OllamaConfig};
pub use gemini::GeminiProvider;
pub use provider::{ModelError, ModelProvider, ModelResult};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, FinishReason, MessageRole, ModelInfo, Usage,
};

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

pub mod prelude {
    pub use crate::config::*;
    pub use crate::gemini::*;
    pub use crate::provider::*;
    pub use crate::types::*;

    #[cfg(feature = "ollama")]
    pub use crate::ollama::*;
}
