use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Token budget for providers that expose an explicit reasoning phase.
    pub thinking_budget: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            thinking_budget: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first choice, if the model produced any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: Option<u64>,
    pub digest: Option<String>,
    pub modified_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let sys_msg = ChatMessage::system("You are a professor");
        assert_eq!(sys_msg.role, MessageRole::System);
        assert_eq!(sys_msg.content, Some("You are a professor".to_string()));

        let user_msg = ChatMessage::user("Explain PID");
        assert_eq!(user_msg.role, MessageRole::User);

        let reply = ChatMessage::assistant("Sure");
        assert_eq!(reply.role, MessageRole::Assistant);
    }

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new("gemini-3-pro-preview", vec![ChatMessage::user("Hi")])
            .with_temperature(0.4)
            .with_max_tokens(2048)
            .with_thinking_budget(15_000);

        assert_eq!(request.model, "gemini-3-pro-preview");
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.thinking_budget, Some(15_000));
    }

    #[test]
    fn test_response_text_takes_first_choice() {
        let response = ChatResponse {
            choices: vec![
                Choice {
                    message: ChatMessage::assistant("first"),
                    finish_reason: Some(FinishReason::Stop),
                },
                Choice {
                    message: ChatMessage::assistant("second"),
                    finish_reason: Some(FinishReason::Stop),
                },
            ],
            usage: None,
        };
        assert_eq!(response.text(), Some("first"));

        let empty = ChatResponse {
            choices: vec![],
            usage: None,
        };
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("x")).unwrap();
        assert!(json.contains("\"role\":\"user\""));
    }
}
