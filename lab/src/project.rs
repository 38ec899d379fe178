use crate::catalog::Component;
use crate::requirement::{RequirementId, SystemRequirement};
use serde::Serialize;
use std::sync::Arc;

/// Everything the student has produced so far.
///
/// Mutation goes through [`crate::store::ProjectStore`]; this type only
/// exposes reads. Its JSON form is the snapshot handed to the tutor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub(crate) project_name: String,
    pub(crate) requirements: Vec<SystemRequirement>,
    pub(crate) selected_components: Vec<Arc<Component>>,
    pub(crate) math_model: String,
    pub(crate) arduino_code: String,
}

impl ProjectData {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn requirements(&self) -> &[SystemRequirement] {
        &self.requirements
    }

    pub fn requirement(&self, id: &RequirementId) -> Option<&SystemRequirement> {
        self.requirements.iter().find(|r| r.id() == id)
    }

    pub fn selected_components(&self) -> &[Arc<Component>] {
        &self.selected_components
    }

    pub fn is_selected(&self, component_id: &str) -> bool {
        self.selected_components
            .iter()
            .any(|c| c.id == component_id)
    }

    pub fn selected_component_names(&self) -> Vec<String> {
        self.selected_components
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Sum of `cost` over the selected components.
    pub fn budget_total(&self) -> f64 {
        self.selected_components.iter().map(|c| c.cost).sum()
    }

    pub fn math_model(&self) -> &str {
        &self.math_model
    }

    pub fn arduino_code(&self) -> &str {
        &self.arduino_code
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::requirement::RequirementKind;

    #[test]
    fn test_snapshot_uses_camel_case() {
        let catalog = Catalog::standard();
        let mut data = ProjectData {
            project_name: "Tanque de nivel".to_string(),
            ..ProjectData::default()
        };
        data.requirements
            .push(SystemRequirement::new(RequirementKind::Functional));
        data.selected_components
            .push(Arc::clone(catalog.get("dc-pump").unwrap()));

        let value: serde_json::Value =
            serde_json::from_str(&data.snapshot_json().unwrap()).unwrap();
        assert_eq!(value["projectName"], "Tanque de nivel");
        assert_eq!(value["requirements"][0]["type"], "functional");
        assert_eq!(value["selectedComponents"][0]["id"], "dc-pump");
        assert_eq!(value["selectedComponents"][0]["cost"], 8.0);
        assert_eq!(value["mathModel"], "");
        assert_eq!(value["arduinoCode"], "");
    }

    #[test]
    fn test_budget_of_empty_selection_is_zero() {
        assert_eq!(ProjectData::default().budget_total(), 0.0);
    }
}
