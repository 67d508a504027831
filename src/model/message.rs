//! Transcript messages: what was said, by whom, and what can be done next.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Step;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    User,
    System,
}

/// A single, immutable entry in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Assigned in append order, starting at 1.
    pub id: u64,

    pub sender: Sender,

    pub content: String,

    /// Follow-up actions offered with this message, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionButton>,

    /// Sub-panels the presentation layer should render under the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<Panel>,

    pub sent_at: Timestamp,
}

/// A labelled action attached to a system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    pub label: String,
    pub action: Action,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// What an action does when invoked.
///
/// Interpreted by a single dispatcher on the session; actions carry
/// no behavior of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Action {
    /// Move on from `from`. Refused once the wizard has left that step.
    Advance { from: Step },

    /// Start the deployment sequence.
    Deploy,

    /// Add or remove a capability from the draft.
    ToggleCapability { id: u32 },
}

/// Reference to a sub-panel, resolved by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "camelCase")]
pub enum Panel {
    /// Capability marketplace with search and toggles.
    CapabilityPicker,

    /// File and URL sources.
    KnowledgeBase,

    /// Planner and generator template editor.
    PromptBuilder,

    /// Execution parameters. Carries the capabilities selected when
    /// the panel was offered, so the flow diagram can list them.
    #[serde(rename_all = "camelCase")]
    WorkflowBuilder { capability_ids: Vec<u32> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_and_actions_serialize_camel_case() {
        let panel = serde_json::to_value(Panel::WorkflowBuilder {
            capability_ids: vec![1, 4],
        })
        .unwrap();
        assert_eq!(
            panel,
            serde_json::json!({ "panel": "workflowBuilder", "capabilityIds": [1, 4] })
        );

        let action = serde_json::to_value(Action::Advance {
            from: Step::Describe,
        })
        .unwrap();
        assert_eq!(action["kind"], "advance");
        assert!(action.get("from").is_some());
    }
}
