//! Project state store.
//!
//! Owns the active phase, the project data and the tutor panel state. Every
//! change to a project goes through one of the methods here.

use crate::advisory::{
    AdvisoryCall, AdvisoryKind, AdvisoryOutcome, AdvisoryRequest, AdvisoryTicket, Completion,
    CODE_READY_MESSAGE, EMPTY_FEEDBACK_MESSAGE, FALLBACK_MESSAGE, GREETING_MESSAGE,
    MODEL_READY_MESSAGE,
};
use crate::catalog::Catalog;
use crate::phase::ProjectPhase;
use crate::project::ProjectData;
use crate::requirement::{RequirementId, RequirementKind, SystemRequirement};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of toggling a component id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
    /// Neither selected nor in the catalog.
    Unknown,
}

#[derive(Debug, Clone)]
struct AdvisoryPanel {
    message: String,
    issued: u64,
    loading: bool,
}

impl Default for AdvisoryPanel {
    fn default() -> Self {
        Self {
            message: GREETING_MESSAGE.to_string(),
            issued: 0,
            loading: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectStore {
    phase: ProjectPhase,
    data: ProjectData,
    catalog: Arc<Catalog>,
    advisory: AdvisoryPanel,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::standard()))
    }
}

impl ProjectStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            phase: ProjectPhase::default(),
            data: ProjectData::default(),
            catalog,
            advisory: AdvisoryPanel::default(),
        }
    }

    pub fn phase(&self) -> ProjectPhase {
        self.phase
    }

    pub fn data(&self) -> &ProjectData {
        &self.data
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn advisory_message(&self) -> &str {
        &self.advisory.message
    }

    pub fn is_advisory_loading(&self) -> bool {
        self.advisory.loading
    }

    pub fn set_phase(&mut self, phase: ProjectPhase) {
        debug!("Phase {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.data.project_name = name.into();
    }

    pub fn add_requirement(&mut self, kind: RequirementKind) -> RequirementId {
        let requirement = SystemRequirement::new(kind);
        let id = requirement.id().clone();
        self.data.requirements.push(requirement);
        debug!("Added {} requirement {}", kind, id);
        id
    }

    /// Silently ignores ids that are not present.
    pub fn update_requirement_description(
        &mut self,
        id: &RequirementId,
        description: impl Into<String>,
    ) {
        if let Some(requirement) = self.data.requirements.iter_mut().find(|r| r.id() == id) {
            requirement.set_description(description);
        }
    }

    /// Silently ignores ids that are not present.
    pub fn remove_requirement(&mut self, id: &RequirementId) {
        self.data.requirements.retain(|r| r.id() != id);
    }

    pub fn toggle_component_selection(&mut self, component_id: &str) -> SelectionChange {
        let selected = &mut self.data.selected_components;
        if let Some(position) = selected.iter().position(|c| c.id == component_id) {
            selected.remove(position);
            return SelectionChange::Deselected;
        }

        match self.catalog.get(component_id) {
            Some(component) => {
                selected.push(Arc::clone(component));
                SelectionChange::Selected
            }
            None => {
                debug!("Ignoring toggle of unknown component {}", component_id);
                SelectionChange::Unknown
            }
        }
    }

    pub fn set_math_model(&mut self, text: impl Into<String>) {
        self.data.math_model = text.into();
    }

    pub fn set_arduino_code(&mut self, text: impl Into<String>) {
        self.data.arduino_code = text.into();
    }

    pub fn budget_total(&self) -> f64 {
        self.data.budget_total()
    }

    fn issue(&mut self, request: AdvisoryRequest) -> AdvisoryCall {
        self.advisory.issued += 1;
        self.advisory.loading = true;
        let ticket = AdvisoryTicket {
            sequence: self.advisory.issued,
            kind: request.kind(),
        };
        debug!("Issued advisory request #{} ({:?})", ticket.sequence, ticket.kind);
        AdvisoryCall { ticket, request }
    }

    /// Starts a feedback request carrying a snapshot of the current project.
    pub fn begin_feedback(&mut self, prompt: impl Into<String>) -> AdvisoryCall {
        let snapshot = self.data.clone();
        self.issue(AdvisoryRequest::Feedback {
            prompt: prompt.into(),
            snapshot,
        })
    }

    /// Starts a code draft request for the selected components.
    pub fn begin_control_code(&mut self, control_logic: impl Into<String>) -> AdvisoryCall {
        let component_names = self.data.selected_component_names();
        self.issue(AdvisoryRequest::ControlCode {
            component_names,
            control_logic: control_logic.into(),
        })
    }

    pub fn begin_model_explanation(&mut self, concept: impl Into<String>) -> AdvisoryCall {
        self.issue(AdvisoryRequest::ModelExplanation {
            concept: concept.into(),
        })
    }

    /// Applies a finished request. Outcomes of anything but the latest issued
    /// request are dropped without touching the store.
    pub fn complete(&mut self, outcome: AdvisoryOutcome) -> Completion {
        let AdvisoryOutcome { ticket, result } = outcome;

        if ticket.sequence != self.advisory.issued {
            info!(
                "Discarding stale advisory response #{} (latest is #{})",
                ticket.sequence, self.advisory.issued
            );
            return Completion::Stale;
        }

        self.advisory.loading = false;

        match result {
            Ok(text) => {
                match ticket.kind {
                    AdvisoryKind::Feedback => {
                        self.advisory.message = if text.trim().is_empty() {
                            EMPTY_FEEDBACK_MESSAGE.to_string()
                        } else {
                            text
                        };
                    }
                    AdvisoryKind::ControlCode => {
                        self.data.arduino_code = text;
                        self.advisory.message = CODE_READY_MESSAGE.to_string();
                    }
                    AdvisoryKind::ModelExplanation => {
                        self.data.math_model = text;
                        self.advisory.message = MODEL_READY_MESSAGE.to_string();
                    }
                }
                Completion::Applied
            }
            Err(e) => {
                warn!("Advisory request #{} failed: {}", ticket.sequence, e);
                self.advisory.message = FALLBACK_MESSAGE.to_string();
                Completion::Failed
            }
        }
    }
}
