use crate::config::GeminiConfig;
use crate::provider::{ModelError, ModelProvider, ModelResult};
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, FinishReason, MessageRole, ModelInfo, Usage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Deserialize)]
struct GeminiModel {
    name: String,
}

/// Provider backed by the hosted Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    http_client: reqwest::Client,
    base_url: String,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> ModelResult<Self> {
        config
            .validate()
            .map_err(|message| ModelError::InvalidConfig { message })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Unknown {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url,
            config,
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_request_body(&self, request: &ChatRequest) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in &request.messages {
            let text = message.content.clone().unwrap_or_default();
            match message.role {
                MessageRole::System => system_parts.push(GeminiPart {
                    text: Some(text),
                    thought: None,
                }),
                MessageRole::User | MessageRole::Assistant => {
                    let role = if message.role == MessageRole::User {
                        "user"
                    } else {
                        "model"
                    };
                    contents.push(GeminiContent {
                        role: Some(role.to_string()),
                        parts: vec![GeminiPart {
                            text: Some(text),
                            thought: None,
                        }],
                    });
                }
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: system_parts,
            })
        };

        let temperature = request.temperature.or(self.config.default_temperature);
        let max_output_tokens = request.max_tokens.or(self.config.default_max_tokens);
        let thinking_config = request.thinking_budget.map(|thinking_budget| ThinkingConfig {
            thinking_budget,
        });

        let generation_config =
            if temperature.is_some() || max_output_tokens.is_some() || thinking_config.is_some() {
                Some(GenerationConfig {
                    temperature,
                    max_output_tokens,
                    thinking_config,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    fn parse_finish_reason(reason: &str) -> FinishReason {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Other,
        }
    }

    fn parse_response(response: GenerateContentResponse) -> ChatResponse {
        let choices = response
            .candidates
            .into_iter()
            .map(|candidate| {
                // Thought summaries are not part of the answer.
                let text: String = candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .filter(|part| !part.thought.unwrap_or(false))
                            .filter_map(|part| part.text)
                            .collect()
                    })
                    .unwrap_or_default();

                Choice {
                    message: ChatMessage {
                        role: MessageRole::Assistant,
                        content: if text.is_empty() { None } else { Some(text) },
                    },
                    finish_reason: candidate
                        .finish_reason
                        .as_deref()
                        .map(Self::parse_finish_reason),
                }
            })
            .collect();

        let usage = response.usage_metadata.map(|usage| Usage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        });

        ChatResponse { choices, usage }
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn chat(&self, request: ChatRequest) -> ModelResult<ChatResponse> {
        debug!("Starting generateContent request with model: {}", request.model);

        let body = self.build_request_body(&request);

        let http_response = self
            .http_client
            .post(self.generate_url(&request.model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::from_transport(e, "Gemini API"))?;

        let status = http_response.status();
        if !status.is_success() {
            let error_text = http_response.text().await.unwrap_or_default();
            error!("Gemini API returned {}", status);
            return Err(ModelError::from_status(status, &request.model, error_text));
        }

        let raw = http_response.text().await.map_err(ModelError::Network)?;
        let api_response: GenerateContentResponse = serde_json::from_str(&raw)?;

        info!("generateContent request completed successfully");

        Ok(Self::parse_response(api_response))
    }

    async fn list_models(&self) -> ModelResult<Vec<ModelInfo>> {
        debug!("Listing Gemini models");

        let http_response = self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| ModelError::from_transport(e, "Gemini API"))?;

        let status = http_response.status();
        if !status.is_success() {
            let error_text = http_response.text().await.unwrap_or_default();
            return Err(ModelError::from_status(status, "models", error_text));
        }

        let raw = http_response.text().await.map_err(ModelError::Network)?;
        let listing: ListModelsResponse = serde_json::from_str(&raw)?;

        let models: Vec<ModelInfo> = listing
            .models
            .into_iter()
            .map(|model| ModelInfo {
                name: model
                    .name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(model.name),
                size: None,
                digest: None,
                modified_at: None,
            })
            .collect();

        info!("Retrieved {} models", models.len());
        Ok(models)
    }

    async fn health_check(&self) -> ModelResult<()> {
        debug!("Performing health check");

        match self.list_models().await {
            Ok(_) => {
                info!("Health check passed");
                Ok(())
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                Err(e)
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
