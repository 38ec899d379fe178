//! Advisory gateway boundary.
//!
//! The store never talks to a language model directly. It hands out an
//! [`AdvisoryCall`] describing one request, the caller runs it against any
//! [`AdvisoryGateway`], and the resulting [`AdvisoryOutcome`] is applied back
//! to the store. Each call carries an [`AdvisoryTicket`] so that only the most
//! recently issued request can change what the student sees.

use crate::project::ProjectData;
use async_trait::async_trait;
use model::ModelError;
use thiserror::Error;

/// Shown before the first tutor exchange.
pub const GREETING_MESSAGE: &str = "¡Hola! Soy tu tutor de Mecatrónica. Comencemos dándole un nombre a tu proyecto y definiendo los requerimientos de tu sistema.";

/// Shown in place of the tutor message while a request is outstanding.
pub const LOADING_MESSAGE: &str = "Analizando el sistema...";

/// Shown whenever a gateway call fails.
pub const FALLBACK_MESSAGE: &str =
    "Lo siento, hubo un error al procesar tu consulta con la IA. Por favor, intenta de nuevo.";

pub const EMPTY_FEEDBACK_MESSAGE: &str = "No pude generar una respuesta.";

pub const CODE_READY_MESSAGE: &str = "He generado un borrador de código para tu sistema. Revísalo en la pestaña de programación.";

pub const MODEL_READY_MESSAGE: &str = "He analizado el modelo matemático. Las derivadas e integrales son clave para el control PID o la dinámica del sistema.";

/// Control behaviour requested when drafting code from the current selection.
pub const DEFAULT_CONTROL_LOGIC: &str = "Control de flujo basado en sensores seleccionados";

/// Canned questions offered next to the tutor, as `(label, prompt)`.
pub const QUICK_PROMPTS: [(&str, &str); 4] = [
    (
        "Validar requerimientos",
        "Evalúa mis requerimientos actuales. ¿Son específicos, medibles y realistas para un sistema mecatrónico?",
    ),
    (
        "Validar selección",
        "¿Esta combinación de componentes es compatible para mi proyecto?",
    ),
    (
        "¿Integral de volumen?",
        "¿Cómo aplico una integral para calcular el volumen en un tanque?",
    ),
    (
        "¿Seguridad?",
        "Dime qué requisitos de seguridad faltan en mi diseño.",
    ),
];

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Model provider error: {0}")]
    Provider(#[from] ModelError),

    #[error("Failed to serialize project snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

/// The three request shapes a tutor must answer.
#[async_trait]
pub trait AdvisoryGateway: Send + Sync {
    async fn request_feedback(&self, prompt: &str, snapshot: &ProjectData)
        -> AdvisoryResult<String>;

    async fn request_control_code_draft(
        &self,
        component_names: &[String],
        control_logic: &str,
    ) -> AdvisoryResult<String>;

    async fn request_model_explanation(&self, physics_concept: &str) -> AdvisoryResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryKind {
    Feedback,
    ControlCode,
    ModelExplanation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryTicket {
    pub(crate) sequence: u64,
    pub(crate) kind: AdvisoryKind,
}

impl AdvisoryTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn kind(&self) -> AdvisoryKind {
        self.kind
    }
}

/// Owned inputs of one advisory request.
#[derive(Debug, Clone)]
pub enum AdvisoryRequest {
    Feedback {
        prompt: String,
        snapshot: ProjectData,
    },
    ControlCode {
        component_names: Vec<String>,
        control_logic: String,
    },
    ModelExplanation {
        concept: String,
    },
}

impl AdvisoryRequest {
    pub fn kind(&self) -> AdvisoryKind {
        match self {
            AdvisoryRequest::Feedback { .. } => AdvisoryKind::Feedback,
            AdvisoryRequest::ControlCode { .. } => AdvisoryKind::ControlCode,
            AdvisoryRequest::ModelExplanation { .. } => AdvisoryKind::ModelExplanation,
        }
    }

    pub async fn send(&self, gateway: &dyn AdvisoryGateway) -> AdvisoryResult<String> {
        match self {
            AdvisoryRequest::Feedback { prompt, snapshot } => {
                gateway.request_feedback(prompt, snapshot).await
            }
            AdvisoryRequest::ControlCode {
                component_names,
                control_logic,
            } => {
                gateway
                    .request_control_code_draft(component_names, control_logic)
                    .await
            }
            AdvisoryRequest::ModelExplanation { concept } => {
                gateway.request_model_explanation(concept).await
            }
        }
    }
}

/// An issued request that has not been sent yet.
#[derive(Debug, Clone)]
pub struct AdvisoryCall {
    pub ticket: AdvisoryTicket,
    pub request: AdvisoryRequest,
}

impl AdvisoryCall {
    pub async fn run(self, gateway: &dyn AdvisoryGateway) -> AdvisoryOutcome {
        let result = self.request.send(gateway).await;
        AdvisoryOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct AdvisoryOutcome {
    pub ticket: AdvisoryTicket,
    pub result: AdvisoryResult<String>,
}

/// What happened when an outcome was handed back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// A newer request was issued after this one; nothing changed.
    Stale,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGateway;

    #[async_trait]
    impl AdvisoryGateway for EchoGateway {
        async fn request_feedback(
            &self,
            prompt: &str,
            snapshot: &ProjectData,
        ) -> AdvisoryResult<String> {
            Ok(format!("{}|{}", prompt, snapshot.project_name()))
        }

        async fn request_control_code_draft(
            &self,
            component_names: &[String],
            control_logic: &str,
        ) -> AdvisoryResult<String> {
            Ok(format!("{}|{}", component_names.join(","), control_logic))
        }

        async fn request_model_explanation(&self, physics_concept: &str) -> AdvisoryResult<String> {
            Err(AdvisoryError::Provider(ModelError::Unknown {
                message: physics_concept.to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn test_request_dispatches_to_matching_operation() {
        let request = AdvisoryRequest::ControlCode {
            component_names: vec!["Servo MG996R".to_string(), "Arduino Uno R3".to_string()],
            control_logic: "abrir compuerta".to_string(),
        };
        assert_eq!(request.kind(), AdvisoryKind::ControlCode);
        assert_eq!(
            request.send(&EchoGateway).await.unwrap(),
            "Servo MG996R,Arduino Uno R3|abrir compuerta"
        );

        let request = AdvisoryRequest::Feedback {
            prompt: "¿Está bien?".to_string(),
            snapshot: ProjectData::default(),
        };
        assert_eq!(request.send(&EchoGateway).await.unwrap(), "¿Está bien?|");
    }

    #[tokio::test]
    async fn test_call_keeps_ticket_on_failure() {
        let ticket = AdvisoryTicket {
            sequence: 7,
            kind: AdvisoryKind::ModelExplanation,
        };
        let call = AdvisoryCall {
            ticket,
            request: AdvisoryRequest::ModelExplanation {
                concept: "motor DC".to_string(),
            },
        };
        let outcome = call.run(&EchoGateway).await;
        assert_eq!(outcome.ticket, ticket);
        assert!(outcome.result.is_err());
    }

    #[test]
    fn test_quick_prompts_are_questions() {
        for (label, prompt) in QUICK_PROMPTS {
            assert!(!label.is_empty());
            assert!(!prompt.is_empty());
        }
    }
}
