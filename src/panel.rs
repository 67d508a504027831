//! Sub-panels offered inside the transcript.
//!
//! Panels hold their own working state and validate input locally. The
//! session only ever sees what they emit: knowledge events and saved patches.

pub mod knowledge;
pub mod prompt;
pub mod workflow;

pub use knowledge::{KnowledgeEvent, format_bytes};
pub use prompt::{PROMPT_VARIABLES, PromptPanel};
pub use workflow::WorkflowPanel;

/// Input a panel refused to pass on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported file type: {0} (accepted: .pdf, .doc, .docx, .txt, .csv)")]
    UnsupportedFileType(String),

    #[error("file name is empty")]
    EmptyFileName,
}
