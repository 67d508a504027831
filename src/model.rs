//! Core data model for the agent builder.
//!
//! These types represent the configuration flow:
//! transcript messages and their actions, the wizard steps,
//! the agent draft being assembled, and the pieces it collects.

mod capability;
mod draft;
mod message;
mod source;
mod step;

pub use capability::CapabilityRef;
pub use draft::{
    AgentDraft, MemoryStrategy, PromptKind, PromptPatch, PromptTemplates, WorkflowParams,
    WorkflowPatch,
};
pub use message::{Action, ActionButton, Message, Panel, Sender};
pub use source::{SourceKind, SourceRecord};
pub use step::{Precondition, Step, StepState};
