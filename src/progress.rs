//! Progress summary: how far along the agent is, step by step.

use crate::model::{AgentDraft, Step};

/// Characters of the purpose shown before it is cut off.
const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Share of configurable steps completed, 0 to 100.
    pub percent: u8,
    pub description: String,
    pub tools: String,
    pub sources: String,
    pub prompts: String,

    /// Which of the four summary lines are complete, in display order.
    pub completed: [bool; 4],
}

impl Progress {
    pub fn of(step: Step, draft: &AgentDraft) -> Self {
        let index = step.index();
        let percent = u8::try_from(index * 100 / Step::TOTAL).unwrap_or(100);

        let description = if draft.purpose.is_empty() {
            "Not defined yet".to_string()
        } else {
            let preview: String = draft.purpose.chars().take(PREVIEW_CHARS).collect();
            format!("{preview}...")
        };
        let tools = match draft.selected_capabilities.len() {
            0 => "No tools selected".to_string(),
            n => format!("{n} tools selected"),
        };
        let sources = match draft.knowledge_sources.len() {
            0 => "No sources added".to_string(),
            n => format!("{n} sources added"),
        };
        let prompts = if draft.prompts_customized {
            "Customized"
        } else {
            "Default templates"
        };

        Self {
            percent,
            description,
            tools,
            sources,
            prompts: prompts.to_string(),
            completed: [index > 0, index > 1, index > 2, index > 3],
        }
    }
}
