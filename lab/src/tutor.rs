use crate::advisory::{AdvisoryGateway, AdvisoryResult};
use crate::project::ProjectData;
use async_trait::async_trait;
use model::{ChatMessage, ChatRequest, ModelProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Which model answers which kind of question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorModels {
    /// Used for feedback and modeling explanations.
    pub reasoning: String,
    /// Used for code drafts.
    pub fast: String,
    /// Reasoning budget attached to feedback requests.
    pub thinking_budget: Option<u32>,
}

impl Default for TutorModels {
    fn default() -> Self {
        Self {
            reasoning: "gemini-3-pro-preview".to_string(),
            fast: "gemini-3-flash-preview".to_string(),
            thinking_budget: Some(15_000),
        }
    }
}

impl TutorModels {
    /// One model for everything, no reasoning budget.
    pub fn single(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            reasoning: model.clone(),
            fast: model,
            thinking_budget: None,
        }
    }
}

/// Mechatronics tutor backed by a language model provider.
pub struct Tutor {
    provider: Arc<dyn ModelProvider>,
    models: TutorModels,
}

impl Tutor {
    pub fn new(provider: Arc<dyn ModelProvider>, models: TutorModels) -> Self {
        Self { provider, models }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn models(&self) -> &TutorModels {
        &self.models
    }

    pub(crate) fn feedback_prompt(prompt: &str, snapshot_json: &str) -> String {
        format!(
            "You are an expert Mechatronics Engineering Professor. Provide constructive feedback \
             on the following project context: {}. User prompt: {}. Focus on requirements \
             analysis, physics-based modeling (derivatives/integrals), and Arduino programming.",
            snapshot_json, prompt
        )
    }

    pub(crate) fn control_code_prompt(component_names: &[String], control_logic: &str) -> String {
        format!(
            "Write a basic Arduino code for a mechatronics project using these components: {}. \
             Logic: {}. Include comments explaining the control logic.",
            component_names.join(", "),
            control_logic
        )
    }

    pub(crate) fn model_explanation_prompt(physics_concept: &str) -> String {
        format!(
            "Explain the mathematical model for {} in mechatronics. Use LaTeX notation for \
             integrals and derivatives. Explain how to apply it to a real system.",
            physics_concept
        )
    }

    async fn ask(
        &self,
        model: &str,
        prompt: String,
        thinking_budget: Option<u32>,
    ) -> AdvisoryResult<String> {
        let mut request = ChatRequest::new(model, vec![ChatMessage::user(prompt)]);
        if let Some(budget) = thinking_budget {
            request = request.with_thinking_budget(budget);
        }

        debug!(
            "Sending tutor request to {} ({})",
            model,
            self.provider.provider_name()
        );
        let response = self.provider.chat(request).await?;
        let text = response.text().unwrap_or_default().to_string();
        info!("Tutor answered with {} characters", text.len());
        Ok(text)
    }
}

#[async_trait]
impl AdvisoryGateway for Tutor {
    async fn request_feedback(
        &self,
        prompt: &str,
        snapshot: &ProjectData,
    ) -> AdvisoryResult<String> {
        let snapshot_json = snapshot.snapshot_json()?;
        self.ask(
            &self.models.reasoning,
            Self::feedback_prompt(prompt, &snapshot_json),
            self.models.thinking_budget,
        )
        .await
    }

    async fn request_control_code_draft(
        &self,
        component_names: &[String],
        control_logic: &str,
    ) -> AdvisoryResult<String> {
        self.ask(
            &self.models.fast,
            Self::control_code_prompt(component_names, control_logic),
            None,
        )
        .await
    }

    async fn request_model_explanation(&self, physics_concept: &str) -> AdvisoryResult<String> {
        self.ask(
            &self.models.reasoning,
            Self::model_explanation_prompt(physics_concept),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::AdvisoryError;
    use model::{
        ChatResponse, Choice, FinishReason, ModelError, ModelInfo, ModelResult,
    };
    use std::sync::Mutex;

    /// Records every request and answers with a fixed reply.
    struct RecordingProvider {
        reply: Option<String>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl RecordingProvider {
        fn answering(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> ChatRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ModelProvider for RecordingProvider {
        async fn chat(&self, request: ChatRequest) -> ModelResult<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(ChatResponse {
                choices: vec![Choice {
                    message: ChatMessage {
                        role: model::MessageRole::Assistant,
                        content: self.reply.clone(),
                    },
                    finish_reason: Some(FinishReason::Stop),
                }],
                usage: None,
            })
        }

        async fn list_models(&self) -> ModelResult<Vec<ModelInfo>> {
            Ok(vec![])
        }

        async fn health_check(&self) -> ModelResult<()> {
            Ok(())
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }
    }

    struct DownProvider;

    #[async_trait]
    impl ModelProvider for DownProvider {
        async fn chat(&self, _request: ChatRequest) -> ModelResult<ChatResponse> {
            Err(ModelError::ServiceUnavailable {
                message: "offline".to_string(),
            })
        }

        async fn list_models(&self) -> ModelResult<Vec<ModelInfo>> {
            Err(ModelError::Authentication)
        }

        async fn health_check(&self) -> ModelResult<()> {
            Err(ModelError::Authentication)
        }

        fn provider_name(&self) -> &'static str {
            "down"
        }
    }

    fn prompt_of(request: &ChatRequest) -> String {
        request.messages[0].content.clone().unwrap()
    }

    #[tokio::test]
    async fn test_feedback_embeds_snapshot_and_uses_reasoning_model() {
        let provider = RecordingProvider::answering(Some("Buen comienzo."));
        let tutor = Tutor::new(provider.clone(), TutorModels::default());

        let mut store = crate::store::ProjectStore::default();
        store.set_project_name("Tanque de nivel");
        let answer = tutor
            .request_feedback("¿Es medible?", store.data())
            .await
            .unwrap();
        assert_eq!(answer, "Buen comienzo.");

        let request = provider.last_request();
        assert_eq!(request.model, "gemini-3-pro-preview");
        assert_eq!(request.thinking_budget, Some(15_000));
        let prompt = prompt_of(&request);
        assert!(prompt.starts_with("You are an expert Mechatronics Engineering Professor."));
        assert!(prompt.contains("\"projectName\":\"Tanque de nivel\""));
        assert!(prompt.contains("User prompt: ¿Es medible?."));
    }

    #[tokio::test]
    async fn test_control_code_uses_fast_model() {
        let provider = RecordingProvider::answering(Some("void setup() {}"));
        let tutor = Tutor::new(provider.clone(), TutorModels::default());

        let names = vec!["Arduino Uno R3".to_string(), "Servo MG996R".to_string()];
        let code = tutor
            .request_control_code_draft(&names, "Control de flujo")
            .await
            .unwrap();
        assert_eq!(code, "void setup() {}");

        let request = provider.last_request();
        assert_eq!(request.model, "gemini-3-flash-preview");
        assert_eq!(request.thinking_budget, None);
        assert!(prompt_of(&request)
            .contains("using these components: Arduino Uno R3, Servo MG996R. Logic: Control de flujo."));
    }

    #[tokio::test]
    async fn test_model_explanation_asks_for_latex() {
        let provider = RecordingProvider::answering(None);
        let tutor = Tutor::new(provider.clone(), TutorModels::single("qwen3:0.6b"));

        let text = tutor
            .request_model_explanation("Llenado de tanque con integral")
            .await
            .unwrap();
        assert_eq!(text, "");

        let request = provider.last_request();
        assert_eq!(request.model, "qwen3:0.6b");
        let prompt = prompt_of(&request);
        assert!(prompt.contains("mathematical model for Llenado de tanque con integral"));
        assert!(prompt.contains("LaTeX"));
    }

    #[tokio::test]
    async fn test_provider_errors_become_advisory_errors() {
        let tutor = Tutor::new(Arc::new(DownProvider), TutorModels::default());
        let result = tutor.request_model_explanation("PID").await;
        assert!(matches!(
            result,
            Err(AdvisoryError::Provider(ModelError::ServiceUnavailable { .. }))
        ));
        assert_eq!(tutor.provider_name(), "down");
    }
}
