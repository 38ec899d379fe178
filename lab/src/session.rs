use crate::advisory::{AdvisoryCall, AdvisoryGateway, Completion, DEFAULT_CONTROL_LOGIC};
use crate::store::ProjectStore;
use std::sync::Arc;
use tracing::debug;

/// One student's working session: a store plus the tutor it consults.
pub struct Session {
    store: ProjectStore,
    gateway: Arc<dyn AdvisoryGateway>,
}

impl Session {
    pub fn new(store: ProjectStore, gateway: Arc<dyn AdvisoryGateway>) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProjectStore {
        &mut self.store
    }

    async fn run(&mut self, call: AdvisoryCall) -> Completion {
        debug!("Running advisory request #{}", call.ticket.sequence());
        let outcome = call.run(self.gateway.as_ref()).await;
        self.store.complete(outcome)
    }

    /// Asks the tutor a free-form question about the current project.
    pub async fn ask_tutor(&mut self, prompt: &str) -> Completion {
        let call = self.store.begin_feedback(prompt);
        self.run(call).await
    }

    /// Drafts control code for the selected components.
    pub async fn generate_control_code(&mut self) -> Completion {
        let call = self.store.begin_control_code(DEFAULT_CONTROL_LOGIC);
        self.run(call).await
    }

    pub async fn analyze_math_model(&mut self, concept: &str) -> Completion {
        let call = self.store.begin_model_explanation(concept);
        self.run(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::{
        AdvisoryError, AdvisoryResult, CODE_READY_MESSAGE, FALLBACK_MESSAGE,
    };
    use crate::project::ProjectData;
    use async_trait::async_trait;
    use model::ModelError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedGateway {
        fail: bool,
        code_calls: Mutex<Vec<(Vec<String>, String)>>,
    }

    #[async_trait]
    impl AdvisoryGateway for ScriptedGateway {
        async fn request_feedback(
            &self,
            prompt: &str,
            _snapshot: &ProjectData,
        ) -> AdvisoryResult<String> {
            if self.fail {
                return Err(AdvisoryError::Provider(ModelError::Authentication));
            }
            Ok(format!("Sobre \"{}\": revisa las unidades.", prompt))
        }

        async fn request_control_code_draft(
            &self,
            component_names: &[String],
            control_logic: &str,
        ) -> AdvisoryResult<String> {
            self.code_calls
                .lock()
                .unwrap()
                .push((component_names.to_vec(), control_logic.to_string()));
            Ok("void setup() {}\nvoid loop() {}".to_string())
        }

        async fn request_model_explanation(&self, physics_concept: &str) -> AdvisoryResult<String> {
            Ok(format!("Modelo de {}", physics_concept))
        }
    }

    #[tokio::test]
    async fn test_ask_tutor_updates_message() {
        let mut session = Session::new(
            ProjectStore::default(),
            Arc::new(ScriptedGateway::default()),
        );
        assert_eq!(session.ask_tutor("torque").await, Completion::Applied);
        assert_eq!(
            session.store().advisory_message(),
            "Sobre \"torque\": revisa las unidades."
        );
        assert!(!session.store().is_advisory_loading());
    }

    #[tokio::test]
    async fn test_generate_control_code_sends_selection_and_default_logic() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut session = Session::new(ProjectStore::default(), gateway.clone());
        session.store_mut().toggle_component_selection("sensor-ultra");
        session.store_mut().toggle_component_selection("dc-pump");

        session.generate_control_code().await;

        let calls = gateway.code_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ["HC-SR04 Ultrasonic", "12V DC Water Pump"]);
        assert_eq!(calls[0].1, DEFAULT_CONTROL_LOGIC);
        assert_eq!(
            session.store().data().arduino_code(),
            "void setup() {}\nvoid loop() {}"
        );
        assert_eq!(session.store().advisory_message(), CODE_READY_MESSAGE);
    }

    #[tokio::test]
    async fn test_analyze_math_model_stores_explanation() {
        let mut session = Session::new(
            ProjectStore::default(),
            Arc::new(ScriptedGateway::default()),
        );
        session.analyze_math_model("motor DC").await;
        assert_eq!(session.store().data().math_model(), "Modelo de motor DC");
    }

    #[tokio::test]
    async fn test_failure_falls_back_without_touching_data() {
        let mut session = Session::new(
            ProjectStore::default(),
            Arc::new(ScriptedGateway {
                fail: true,
                ..ScriptedGateway::default()
            }),
        );
        session.store_mut().set_project_name("Riego automático");
        let before = session.store().data().clone();

        assert_eq!(session.ask_tutor("¿Seguridad?").await, Completion::Failed);
        assert_eq!(session.store().advisory_message(), FALLBACK_MESSAGE);
        assert_eq!(session.store().data(), &before);
    }
}
