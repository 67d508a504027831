//! The agent draft: configuration accumulated across the wizard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CapabilityRef, SourceRecord};

pub const DEFAULT_PLANNER_PROMPT: &str = "You are a helpful assistant that carefully plans \
    responses. First, break down the user's request into steps. Then, gather any necessary \
    information. Finally, provide a comprehensive response that addresses all aspects of the \
    user's query.";

pub const DEFAULT_GENERATOR_PROMPT: &str = "You are an AI agent designed to help users with \
    their tasks. Be conversational, helpful, and accurate in your responses. Ask clarifying \
    questions when information is missing.";

/// The configuration record being built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDraft {
    /// What the agent is for, taken from the first description.
    pub purpose: String,

    /// Selected capabilities, unique by id, in selection order.
    pub selected_capabilities: Vec<CapabilityRef>,

    pub knowledge_sources: Vec<SourceRecord>,

    pub prompt_templates: PromptTemplates,

    pub workflow_params: WorkflowParams,

    /// Set once the prompt templates have been saved at least once.
    pub prompts_customized: bool,

    /// Set by the deployment sequence.
    pub deployed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplates {
    pub planner: String,
    pub generator: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            planner: DEFAULT_PLANNER_PROMPT.to_string(),
            generator: DEFAULT_GENERATOR_PROMPT.to_string(),
        }
    }
}

/// Which of the two templates an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptKind {
    Planner,
    Generator,
}

impl PromptKind {
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Planner => DEFAULT_PLANNER_PROMPT,
            Self::Generator => DEFAULT_GENERATOR_PROMPT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowParams {
    /// Upper bound on execution steps, in `1..=10`.
    pub max_steps: u8,
    pub memory_strategy: MemoryStrategy,
    pub advanced_mode: bool,
}

impl WorkflowParams {
    pub const MIN_STEPS: u8 = 1;
    pub const MAX_STEPS: u8 = 10;
    pub const DEFAULT_STEPS: u8 = 5;
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            max_steps: Self::DEFAULT_STEPS,
            memory_strategy: MemoryStrategy::Full,
            advanced_mode: false,
        }
    }
}

/// How much conversation history the agent keeps in context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemoryStrategy {
    /// Summary only.
    Summary,
    /// Recent history.
    Recent,
    /// Full history.
    #[default]
    Full,
}

impl MemoryStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "Summary Only",
            Self::Recent => "Recent History",
            Self::Full => "Full History",
        }
    }
}

/// Emitted by the prompt panel on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPatch {
    pub planner: String,
    pub generator: String,
}

/// Emitted by the workflow panel on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPatch {
    pub max_steps: u8,
    pub memory_strategy: MemoryStrategy,
    pub advanced_mode: bool,
}

impl AgentDraft {
    /// Add the capability if absent, remove it if present.
    ///
    /// Returns whether it is selected afterwards.
    pub fn toggle_capability(&mut self, capability: CapabilityRef) -> bool {
        if let Some(pos) = self
            .selected_capabilities
            .iter()
            .position(|c| c.id == capability.id)
        {
            self.selected_capabilities.remove(pos);
            false
        } else {
            self.selected_capabilities.push(capability);
            true
        }
    }

    pub fn is_selected(&self, capability_id: u32) -> bool {
        self.selected_capabilities
            .iter()
            .any(|c| c.id == capability_id)
    }

    pub fn add_source(&mut self, source: SourceRecord) {
        self.knowledge_sources.push(source);
    }

    pub fn remove_source(&mut self, id: Uuid) -> Option<SourceRecord> {
        let pos = self.knowledge_sources.iter().position(|s| s.id == id)?;
        Some(self.knowledge_sources.remove(pos))
    }

    pub fn apply_prompts(&mut self, patch: PromptPatch) {
        self.prompt_templates = PromptTemplates {
            planner: patch.planner,
            generator: patch.generator,
        };
        self.prompts_customized = true;
    }

    /// Merge saved workflow settings. `max_steps` is clamped into range.
    pub fn apply_workflow(&mut self, patch: WorkflowPatch) {
        self.workflow_params = WorkflowParams {
            max_steps: patch
                .max_steps
                .clamp(WorkflowParams::MIN_STEPS, WorkflowParams::MAX_STEPS),
            memory_strategy: patch.memory_strategy,
            advanced_mode: patch.advanced_mode,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    fn capability(id: u32) -> CapabilityRef {
        CapabilityRef {
            id,
            name: format!("Tool {id}"),
            description: String::new(),
            category: "Testing".into(),
            popular: false,
            configurable: true,
        }
    }

    #[test]
    fn defaults_match_a_fresh_session() {
        let draft = AgentDraft::default();

        assert!(draft.purpose.is_empty());
        assert!(draft.knowledge_sources.is_empty());
        assert_eq!(draft.prompt_templates.planner, DEFAULT_PLANNER_PROMPT);
        assert_eq!(draft.workflow_params.max_steps, 5);
        assert_eq!(draft.workflow_params.memory_strategy, MemoryStrategy::Full);
        assert!(!draft.deployed);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut draft = AgentDraft::default();
        draft.toggle_capability(capability(1));
        let before = draft.selected_capabilities.clone();

        assert!(draft.toggle_capability(capability(3)));
        assert!(draft.is_selected(3));
        assert!(!draft.toggle_capability(capability(3)));

        assert_eq!(draft.selected_capabilities, before);
    }

    #[test]
    fn toggle_keys_on_id_only() {
        let mut draft = AgentDraft::default();
        draft.toggle_capability(capability(2));

        let mut renamed = capability(2);
        renamed.name = "Renamed".into();
        draft.toggle_capability(renamed);

        assert!(draft.selected_capabilities.is_empty());
    }

    #[test]
    fn remove_source_by_id() {
        let mut draft = AgentDraft::default();
        let keep = SourceRecord::url("https://example.com", Timestamp::UNIX_EPOCH);
        let stale = SourceRecord::file("faq.pdf", 1024, Timestamp::UNIX_EPOCH);
        let stale_id = stale.id;
        draft.add_source(keep.clone());
        draft.add_source(stale);

        let removed = draft.remove_source(stale_id).unwrap();
        assert_eq!(removed.display_name(), "faq.pdf");
        assert_eq!(draft.knowledge_sources, vec![keep]);
        assert!(draft.remove_source(stale_id).is_none());
    }

    #[test]
    fn workflow_patch_is_clamped() {
        let mut draft = AgentDraft::default();
        draft.apply_workflow(WorkflowPatch {
            max_steps: 42,
            memory_strategy: MemoryStrategy::Recent,
            advanced_mode: true,
        });

        assert_eq!(draft.workflow_params.max_steps, 10);
        assert_eq!(draft.workflow_params.memory_strategy, MemoryStrategy::Recent);
        assert!(draft.workflow_params.advanced_mode);

        draft.apply_workflow(WorkflowPatch {
            max_steps: 0,
            memory_strategy: MemoryStrategy::Summary,
            advanced_mode: false,
        });
        assert_eq!(draft.workflow_params.max_steps, 1);
    }

    #[test]
    fn saving_prompts_marks_them_customized() {
        let mut draft = AgentDraft::default();
        draft.apply_prompts(PromptPatch {
            planner: "Plan carefully.".into(),
            generator: DEFAULT_GENERATOR_PROMPT.into(),
        });

        assert!(draft.prompts_customized);
        assert_eq!(draft.prompt_templates.planner, "Plan carefully.");
    }
}
