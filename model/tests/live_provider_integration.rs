//! Checks against real model services. Run with `--ignored` once a local
//! Ollama server is up or `GEMINI_API_KEY` is exported.

use model::{ChatMessage, ChatRequest, FinishReason, GeminiConfig, GeminiProvider, ModelProvider};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(120);
const GEMINI_MODEL: &str = "gemini-3-flash-preview";

fn gemini_provider() -> GeminiProvider {
    let key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    GeminiProvider::new(GeminiConfig::new(key).with_timeout(TIMEOUT)).expect("provider creation")
}

#[tokio::test]
#[ignore]
async fn test_gemini_health_check() {
    let provider = gemini_provider();

    tokio::time::timeout(TIMEOUT, provider.health_check())
        .await
        .expect("health_check timed out")
        .expect("health_check failed");
}

#[tokio::test]
#[ignore]
async fn test_gemini_basic_chat() {
    let provider = gemini_provider();
    let request = ChatRequest::new(
        GEMINI_MODEL,
        vec![
            ChatMessage::system("Answer in exactly one sentence."),
            ChatMessage::user("What does an H-bridge do?"),
        ],
    );

    let response = tokio::time::timeout(TIMEOUT, provider.chat(request))
        .await
        .expect("chat timed out")
        .expect("chat failed");

    assert!(
        matches!(response.choices[0].finish_reason, Some(FinishReason::Stop)),
        "expected Stop, got {:?}",
        response.choices[0].finish_reason
    );
    let text = response.text().expect("text must exist");
    assert!(!text.is_empty(), "text must not be empty");
}

#[tokio::test]
#[ignore]
async fn test_gemini_invalid_model_returns_error() {
    let provider = gemini_provider();
    let request = ChatRequest::new("nonexistent-model-xyz", vec![ChatMessage::user("Hello")]);

    let result = tokio::time::timeout(TIMEOUT, provider.chat(request))
        .await
        .expect("chat timed out");

    assert!(result.is_err(), "expected error for nonexistent model");
}

#[cfg(feature = "ollama")]
mod ollama {
    use super::TIMEOUT;
    use model::{ChatMessage, ChatRequest, ModelProvider, OllamaConfig, OllamaProvider};

    const MODEL: &str = "qwen3:0.6b";

    fn make_provider() -> OllamaProvider {
        OllamaProvider::new(OllamaConfig::default().with_timeout(TIMEOUT))
            .expect("provider creation")
    }

    #[tokio::test]
    #[ignore]
    async fn test_ollama_chat_usage_adds_up() {
        let provider = make_provider();
        let request = ChatRequest::new(MODEL, vec![ChatMessage::user("Say hello.")]);

        let response = tokio::time::timeout(TIMEOUT, provider.chat(request))
            .await
            .expect("chat timed out")
            .expect("chat failed");

        let usage = response.usage.as_ref().expect("usage must be present");
        assert_eq!(
            usage.total_tokens,
            usage.prompt_tokens + usage.completion_tokens
        );
    }
}
