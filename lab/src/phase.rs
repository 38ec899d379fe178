use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The five stages of a guided project, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPhase {
    #[default]
    Requirements,
    Components,
    Modeling,
    Programming,
    Report,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown phase: {0}")]
pub struct UnknownPhase(pub String);

impl ProjectPhase {
    pub const ALL: [ProjectPhase; 5] = [
        ProjectPhase::Requirements,
        ProjectPhase::Components,
        ProjectPhase::Modeling,
        ProjectPhase::Programming,
        ProjectPhase::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPhase::Requirements => "requirements",
            ProjectPhase::Components => "components",
            ProjectPhase::Modeling => "modeling",
            ProjectPhase::Programming => "programming",
            ProjectPhase::Report => "report",
        }
    }

    /// Position in [`ProjectPhase::ALL`].
    pub fn index(&self) -> usize {
        ProjectPhase::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or_default()
    }

    /// Following phase, staying on the last one.
    pub fn next(&self) -> ProjectPhase {
        ProjectPhase::ALL[(self.index() + 1).min(ProjectPhase::ALL.len() - 1)]
    }

    /// Preceding phase, staying on the first one.
    pub fn previous(&self) -> ProjectPhase {
        ProjectPhase::ALL[self.index().saturating_sub(1)]
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for ProjectPhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProjectPhase::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}
