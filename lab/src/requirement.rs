use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque requirement identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(String);

impl RequirementId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequirementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Functional,
    Economic,
    Safety,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown requirement type: {0} (expected functional, economic or safety)")]
pub struct UnknownRequirementKind(pub String);

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKind::Functional => "functional",
            RequirementKind::Economic => "economic",
            RequirementKind::Safety => "safety",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequirementKind {
    type Err = UnknownRequirementKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "functional" => Ok(RequirementKind::Functional),
            "economic" => Ok(RequirementKind::Economic),
            "safety" => Ok(RequirementKind::Safety),
            _ => Err(UnknownRequirementKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    Pending,
    Defined,
}

impl RequirementStatus {
    /// `Defined` once the description holds any non-whitespace text.
    pub fn for_description(description: &str) -> Self {
        if description.trim().is_empty() {
            RequirementStatus::Pending
        } else {
            RequirementStatus::Defined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRequirement {
    id: RequirementId,
    #[serde(rename = "type")]
    kind: RequirementKind,
    description: String,
    status: RequirementStatus,
}

impl SystemRequirement {
    pub fn new(kind: RequirementKind) -> Self {
        Self {
            id: RequirementId::generate(),
            kind,
            description: String::new(),
            status: RequirementStatus::Pending,
        }
    }

    pub fn id(&self) -> &RequirementId {
        &self.id
    }

    pub fn kind(&self) -> RequirementKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> RequirementStatus {
        self.status
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.status = RequirementStatus::for_description(&self.description);
    }
}
