use crate::config::OllamaConfig;
use crate::provider::{ModelError, ModelProvider, ModelResult};
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, FinishReason, MessageRole, ModelInfo, Usage,
};
use async_trait::async_trait;
use ollama_rs::Ollama;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Serialize)]
struct OllamaApiRequest {
    model: String,
    messages: Vec<OllamaApiMessage>,
    stream: bool,
    options: OllamaApiOptions,
}

#[derive(Serialize)]
struct OllamaApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct OllamaApiOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaApiResponse {
    message: OllamaApiResponseMessage,
    done_reason: Option<String>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct OllamaApiResponseMessage {
    content: String,
}

/// Provider for a locally running Ollama server.
pub struct OllamaProvider {
    client: Ollama,
    http_client: reqwest::Client,
    base_url: String,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> ModelResult<Self> {
        config
            .validate()
            .map_err(|message| ModelError::InvalidConfig { message })?;

        let host = config
            .base_url
            .trim_end_matches('/')
            .trim_end_matches("/v1")
            .to_string();

        let base_url = format!("{}/", host);

        // Ollama::new wants the port separately; fall back to the default one.
        let (scheme_host, port) = match host.rsplit_once(':') {
            Some((head, port)) if head.contains("://") => match port.parse::<u16>() {
                Ok(port) => (head.to_string(), port),
                Err(_) => (host.clone(), 11434),
            },
            _ => (host.clone(), 11434),
        };
        let client = Ollama::new(scheme_host, port);

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::Unknown {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            http_client,
            base_url,
            config,
        })
    }

    fn build_request_body(&self, request: &ChatRequest) -> OllamaApiRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| OllamaApiMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                content: msg.content.clone().unwrap_or_default(),
            })
            .collect();

        OllamaApiRequest {
            model: request.model.clone(),
            messages,
            stream: false,
            options: OllamaApiOptions {
                temperature: request
                    .temperature
                    .unwrap_or(self.config.default_temperature),
                num_predict: request.max_tokens.or(self.config.default_max_tokens),
            },
        }
    }

    fn parse_response(response: OllamaApiResponse) -> ChatResponse {
        let content = if response.message.content.is_empty() {
            None
        } else {
            Some(response.message.content)
        };

        let finish_reason = match response.done_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("stop") | None => FinishReason::Stop,
            Some(_) => FinishReason::Other,
        };

        let prompt_tokens = response.prompt_eval_count.unwrap_or(0) as u32;
        let completion_tokens = response.eval_count.unwrap_or(0) as u32;

        ChatResponse {
            choices: vec![Choice {
                message: ChatMessage {
                    role: MessageRole::Assistant,
                    content,
                },
                finish_reason: Some(finish_reason),
            }],
            usage: Some(Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        }
    }

    fn handle_ollama_error(err: ollama_rs::error::OllamaError) -> ModelError {
        match err {
            ollama_rs::error::OllamaError::ReqwestError(e) => {
                ModelError::from_transport(e, "Ollama service")
            }
            ollama_rs::error::OllamaError::JsonError(e) => ModelError::Serialization(e),
            _ => ModelError::Unknown {
                message: format!("Ollama error: {}", err),
            },
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    async fn chat(&self, request: ChatRequest) -> ModelResult<ChatResponse> {
        debug!("Starting chat request with model: {}", request.model);

        let body = self.build_request_body(&request);
        let url = format!("{}api/chat", self.base_url);

        let http_response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::from_transport(e, "Ollama service"))?;

        let status = http_response.status();
        if !status.is_success() {
            let error_text = http_response.text().await.unwrap_or_default();
            return Err(ModelError::from_status(status, &request.model, error_text));
        }

        let api_response: OllamaApiResponse =
            http_response.json().await.map_err(ModelError::Network)?;

        info!("Chat request completed successfully");

        Ok(Self::parse_response(api_response))
    }

    async fn list_models(&self) -> ModelResult<Vec<ModelInfo>> {
        debug!("Listing available models");

        let models = self
            .client
            .list_local_models()
            .await
            .map_err(Self::handle_ollama_error)?;

        let model_infos: Vec<ModelInfo> = models
            .into_iter()
            .map(|model| ModelInfo {
                name: model.name,
                size: Some(model.size),
                digest: None,
                modified_at: Some(model.modified_at),
            })
            .collect();

        info!("Retrieved {} models", model_infos.len());
        Ok(model_infos)
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
        "ollama"
    }
}
