//! Reply synthesis: the system's side of the conversation.
//!
//! A reply is a pure function of the current step, the draft, and the user
//! message being answered. Anything the reply implies for the draft comes
//! back as a [`DraftPatch`] for the caller to apply; this module never
//! mutates state itself.

use std::fmt::Write;

use crate::model::{Action, ActionButton, AgentDraft, Panel, Step};

pub const WELCOME: &str = "Welcome to Agent Whisperer Studio! I'll help you build your custom \
    AI agent. To get started, describe what kind of agent you want to create - what should it \
    do and who is it for?";

/// The next system message, plus any change it makes to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub actions: Vec<ActionButton>,
    pub panels: Vec<Panel>,
    pub patch: Option<DraftPatch>,
}

/// A draft change that accompanies a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftPatch {
    /// Record the agent's purpose from the first description.
    SetPurpose(String),
}

impl DraftPatch {
    pub fn apply(self, draft: &mut AgentDraft) {
        match self {
            Self::SetPurpose(purpose) => draft.purpose = purpose,
        }
    }
}

impl Reply {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            actions: Vec::new(),
            panels: Vec::new(),
            patch: None,
        }
    }

    fn with_action(mut self, label: &str, action: Action) -> Self {
        self.actions.push(ActionButton::new(label, action));
        self
    }

    fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    fn with_patch(mut self, patch: DraftPatch) -> Self {
        self.patch = Some(patch);
        self
    }
}

/// Produce the reply to `user_message` given where the wizard stands.
pub fn synthesize(step: Step, draft: &AgentDraft, user_message: &str) -> Reply {
    match step {
        Step::Describe if draft.purpose.trim().is_empty() => Reply::text(
            "Thanks for sharing! Let me clarify a few details about your agent. \
             What specific tasks or problems should this agent solve?",
        )
        .with_action(
            "Continue",
            Action::Advance {
                from: Step::Describe,
            },
        )
        .with_patch(DraftPatch::SetPurpose(user_message.trim().to_string())),

        Step::Describe => Reply::text(format!(
            "Great! Based on your description, I'll help you build an agent that can {}. \
             Now, let's configure the tools your agent will need.",
            draft.purpose
        ))
        .with_action(
            "Continue to Tool Selection",
            Action::Advance {
                from: Step::Describe,
            },
        ),

        Step::ConfigureTools => Reply::text(
            "I've analyzed your agent requirements and found some useful tools. \
             Please select the tools your agent will need from the marketplace below.",
        )
        .with_panel(Panel::CapabilityPicker),

        Step::KnowledgeBase => Reply::text(
            "Now let's build your agent's knowledge base. You can upload documents \
             or add URLs that contain information your agent should know about.",
        )
        .with_panel(Panel::KnowledgeBase),

        Step::PromptsWorkflow => Reply::text(
            "Let's customize how your agent thinks and responds. You can edit the \
             prompts below and configure the agent's workflow.",
        )
        .with_panel(Panel::PromptBuilder)
        .with_panel(Panel::WorkflowBuilder {
            capability_ids: draft.selected_capabilities.iter().map(|c| c.id).collect(),
        }),

        Step::ReviewDeploy => {
            Reply::text(review_summary(draft)).with_action("Deploy Agent", Action::Deploy)
        }

        Step::Deployed => Reply::text(
            "Your agent is now ready to use! You can start interacting with it \
             or make further adjustments to its configuration.",
        ),
    }
}

fn review_summary(draft: &AgentDraft) -> String {
    let mut out = String::from(
        "Your agent is almost ready! Here's a summary of what we've built together:\n\n",
    );
    let prompts = if draft.prompts_customized {
        "Customized for your specific use case"
    } else {
        "Using the default templates"
    };
    let workflow = &draft.workflow_params;

    // Writing to a String is infallible.
    let _ = writeln!(out, "• Purpose: {}", draft.purpose);
    let _ = writeln!(
        out,
        "• Tools: {} tools selected",
        draft.selected_capabilities.len()
    );
    let _ = writeln!(
        out,
        "• Knowledge Base: {} sources added",
        draft.knowledge_sources.len()
    );
    let _ = writeln!(out, "• Prompts: {prompts}");
    let _ = writeln!(
        out,
        "• Workflow: up to {} steps, {} memory",
        workflow.max_steps,
        workflow.memory_strategy.label()
    );
    out.push_str("\nWould you like to deploy your agent now?");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{CapabilityRef, SourceRecord};

    fn capability(id: u32) -> CapabilityRef {
        CapabilityRef {
            id,
            name: format!("Tool {id}"),
            description: String::new(),
            category: "Testing".into(),
            popular: false,
            configurable: false,
        }
    }

    #[test]
    fn first_description_sets_purpose_and_offers_continue() {
        let reply = synthesize(Step::Describe, &AgentDraft::default(), "Build a support bot");

        assert!(reply.content.contains('?'));
        assert_eq!(
            reply.actions,
            vec![ActionButton::new(
                "Continue",
                Action::Advance {
                    from: Step::Describe
                }
            )]
        );
        assert_eq!(
            reply.patch,
            Some(DraftPatch::SetPurpose("Build a support bot".into()))
        );
    }

    #[test]
    fn later_description_summarizes_purpose() {
        let draft = AgentDraft {
            purpose: "triage support tickets".into(),
            ..AgentDraft::default()
        };
        let reply = synthesize(Step::Describe, &draft, "It should also escalate");

        assert!(reply.content.contains("triage support tickets"));
        assert_eq!(
            reply.actions[0].action,
            Action::Advance {
                from: Step::Describe
            }
        );
        assert!(reply.patch.is_none());
    }

    #[test]
    fn middle_steps_attach_panels() {
        let mut draft = AgentDraft::default();
        draft.toggle_capability(capability(4));

        let tools = synthesize(Step::ConfigureTools, &draft, "ok");
        assert_eq!(tools.panels, vec![Panel::CapabilityPicker]);
        assert!(tools.actions.is_empty());

        let knowledge = synthesize(Step::KnowledgeBase, &draft, "ok");
        assert_eq!(knowledge.panels, vec![Panel::KnowledgeBase]);

        let prompts = synthesize(Step::PromptsWorkflow, &draft, "ok");
        assert_eq!(
            prompts.panels,
            vec![
                Panel::PromptBuilder,
                Panel::WorkflowBuilder {
                    capability_ids: vec![4]
                }
            ]
        );
    }

    #[test]
    fn review_counts_tools_and_sources() {
        let mut draft = AgentDraft {
            purpose: "answer HR questions".into(),
            ..AgentDraft::default()
        };
        draft.toggle_capability(capability(1));
        draft.toggle_capability(capability(2));
        draft.add_source(SourceRecord::url(
            "https://example.com",
            Timestamp::UNIX_EPOCH,
        ));

        let reply = synthesize(Step::ReviewDeploy, &draft, "looks good");

        assert!(reply.content.contains("Tools: 2 tools selected"));
        assert!(reply.content.contains("Knowledge Base: 1 sources added"));
        assert!(reply.content.contains("Purpose: answer HR questions"));
        assert!(reply.content.contains("Using the default templates"));
        assert_eq!(
            reply.actions,
            vec![ActionButton::new("Deploy Agent", Action::Deploy)]
        );
    }

    #[test]
    fn after_deployment_there_is_nothing_to_do() {
        let reply = synthesize(Step::Deployed, &AgentDraft::default(), "hello?");

        assert!(reply.content.starts_with("Your agent is now ready to use!"));
        assert!(reply.actions.is_empty());
        assert!(reply.panels.is_empty());
    }

    #[test]
    fn patch_applies_to_draft() {
        let mut draft = AgentDraft::default();
        DraftPatch::SetPurpose("summarize meetings".into()).apply(&mut draft);

        assert_eq!(draft.purpose, "summarize meetings");
    }
}
