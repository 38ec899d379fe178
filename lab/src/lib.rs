pub mod advisory;
pub mod catalog;
pub mod command;
pub mod config;
pub mod phase;
pub mod project;
pub mod requirement;
pub mod session;
pub mod store;
pub mod tutor;
pub mod view;

pub use advisory::{
    AdvisoryCall, AdvisoryError, AdvisoryGateway, AdvisoryKind, AdvisoryOutcome,
    AdvisoryRequest, AdvisoryResult, AdvisoryTicket, Completion,
};
pub use catalog::{Catalog, Component, ComponentCategory};
pub use command::{execute, Command, CommandError, CommandResult, Flow};
pub use config::{ConfigError, ConfigResult, LabConfig, ProviderKind};
pub use phase::ProjectPhase;
pub use project::ProjectData;
pub use requirement::{RequirementId, RequirementKind, RequirementStatus, SystemRequirement};
pub use session::Session;
pub use store::{ProjectStore, SelectionChange};
pub use tutor::{Tutor, TutorModels};
