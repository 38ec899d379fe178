//! Read-only component catalog.
//!
//! The catalog is built once and shared behind an [`Arc`]; selections in a
//! project hold clones of the same `Arc<Component>` handles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Sensor,
    Actuator,
    Controller,
    Power,
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentCategory::Sensor => "sensor",
            ComponentCategory::Actuator => "actuator",
            ComponentCategory::Controller => "controller",
            ComponentCategory::Power => "power",
        };
        f.write_str(name)
    }
}

/// A purchasable hardware part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub category: ComponentCategory,
    pub description: String,
    /// Informational label/value pairs such as `"Voltage" -> "5V"`.
    pub specifications: BTreeMap<String, String>,
    pub cost: f64,
    pub image: String,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ComponentCategory,
        description: impl Into<String>,
        cost: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            description: description.into(),
            specifications: BTreeMap::new(),
            cost: cost.max(0.0),
            image: image.into(),
        }
    }

    pub fn with_spec(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.specifications.insert(label.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<Arc<Component>>,
}

impl Catalog {
    /// Builds a catalog; later entries with an id already present are dropped.
    pub fn new(components: impl IntoIterator<Item = Component>) -> Self {
        let mut entries: Vec<Arc<Component>> = Vec::new();
        for component in components {
            if entries.iter().all(|c| c.id != component.id) {
                entries.push(Arc::new(component));
            }
        }
        Self {
            components: entries,
        }
    }

    /// The parts offered to every student project.
    pub fn standard() -> Self {
        Self::new([
            Component::new(
                "ard-uno",
                "Arduino Uno R3",
                ComponentCategory::Controller,
                "Universal 8-bit microcontroller board.",
                25.00,
                "https://picsum.photos/seed/arduino/200/200",
            )
            .with_spec("Voltage", "5V")
            .with_spec("I/O Pins", "14 Digital, 6 Analog")
            .with_spec("Clock", "16MHz"),
            Component::new(
                "servo-mg996r",
                "Servo MG996R",
                ComponentCategory::Actuator,
                "High torque metal gear servo motor.",
                12.50,
                "https://picsum.photos/seed/servo/200/200",
            )
            .with_spec("Torque", "11kg/cm")
            .with_spec("Speed", "0.17s/60deg")
            .with_spec("Voltage", "4.8V - 7.2V"),
            Component::new(
                "sensor-ultra",
                "HC-SR04 Ultrasonic",
                ComponentCategory::Sensor,
                "Distance measurement sensor.",
                4.00,
                "https://picsum.photos/seed/ultra/200/200",
            )
            .with_spec("Range", "2cm - 400cm")
            .with_spec("Resolution", "0.3cm")
            .with_spec("Angle", "15 deg"),
            Component::new(
                "dc-pump",
                "12V DC Water Pump",
                ComponentCategory::Actuator,
                "Miniature submersible water pump.",
                8.00,
                "https://picsum.photos/seed/pump/200/200",
            )
            .with_spec("Flow Rate", "240L/H")
            .with_spec("Head", "3m")
            .with_spec("Current", "400mA"),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Component>> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Component>> {
        self.components.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_contents() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.ids().collect::<Vec<_>>(),
            ["ard-uno", "servo-mg996r", "sensor-ultra", "dc-pump"]
        );

        let uno = catalog.get("ard-uno").unwrap();
        assert_eq!(uno.name, "Arduino Uno R3");
        assert_eq!(uno.category, ComponentCategory::Controller);
        assert_eq!(uno.cost, 25.00);
        assert_eq!(uno.specifications.get("Clock").map(String::as_str), Some("16MHz"));

        assert_eq!(catalog.get("servo-mg996r").unwrap().cost, 12.50);
        assert!(catalog.get("stepper-nema17").is_none());
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let catalog = Catalog::new([
            Component::new("a", "First", ComponentCategory::Power, "", 1.0, ""),
            Component::new("a", "Second", ComponentCategory::Power, "", 2.0, ""),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().name, "First");
    }

    #[test]
    fn test_negative_cost_is_clamped() {
        let part = Component::new("x", "X", ComponentCategory::Sensor, "", -3.0, "");
        assert_eq!(part.cost, 0.0);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&ComponentCategory::Actuator).unwrap();
        assert_eq!(json, "\"actuator\"");
    }
}
