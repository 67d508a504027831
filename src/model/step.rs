//! The wizard's steps and the state machine that moves between them.

use serde::{Deserialize, Serialize};

use super::AgentDraft;

/// One phase of agent configuration.
///
/// Strictly sequential. `Deployed` is terminal and only reachable
/// through the deployment sequence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    Describe,
    ConfigureTools,
    KnowledgeBase,
    PromptsWorkflow,
    ReviewDeploy,
    Deployed,
}

impl Step {
    /// Number of configurable steps.
    pub const TOTAL: usize = 5;

    /// The configurable steps, in order.
    pub const CONFIGURABLE: [Step; Self::TOTAL] = [
        Step::Describe,
        Step::ConfigureTools,
        Step::KnowledgeBase,
        Step::PromptsWorkflow,
        Step::ReviewDeploy,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Describe => 0,
            Self::ConfigureTools => 1,
            Self::KnowledgeBase => 2,
            Self::PromptsWorkflow => 3,
            Self::ReviewDeploy => 4,
            Self::Deployed => 5,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Describe => Some(Self::ConfigureTools),
            Self::ConfigureTools => Some(Self::KnowledgeBase),
            Self::KnowledgeBase => Some(Self::PromptsWorkflow),
            Self::PromptsWorkflow => Some(Self::ReviewDeploy),
            Self::ReviewDeploy | Self::Deployed => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::Describe | Self::Deployed => None,
            Self::ConfigureTools => Some(Self::Describe),
            Self::KnowledgeBase => Some(Self::ConfigureTools),
            Self::PromptsWorkflow => Some(Self::KnowledgeBase),
            Self::ReviewDeploy => Some(Self::PromptsWorkflow),
        }
    }

    /// Short label for the progress indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Describe => "Describe Agent",
            Self::ConfigureTools => "Configure Tools",
            Self::KnowledgeBase => "Knowledge Base",
            Self::PromptsWorkflow => "Prompts & Workflow",
            Self::ReviewDeploy => "Review & Deploy",
            Self::Deployed => "Deployed",
        }
    }

    /// Page heading shown while the step is active.
    pub fn title(self) -> &'static str {
        match self {
            Self::Describe => "Create Your AI Agent",
            Self::ConfigureTools => "Select Agent Tools",
            Self::KnowledgeBase => "Build Knowledge Base",
            Self::PromptsWorkflow => "Configure Prompts & Workflow",
            Self::ReviewDeploy => "Review & Deploy Agent",
            Self::Deployed => "Your agent is ready to use!",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Describe => {
                "Describe what you want your AI agent to do and who it's for. \
                 Be specific about the problems it should solve."
            }
            Self::ConfigureTools => {
                "Select tools from the marketplace that your agent will need \
                 to accomplish its tasks."
            }
            Self::KnowledgeBase => {
                "Upload documents or add URLs to build your agent's knowledge base."
            }
            Self::PromptsWorkflow => {
                "Customize how your agent thinks and responds with prompt \
                 templates and workflow settings."
            }
            Self::ReviewDeploy => {
                "Review your agent configuration and deploy it to make it \
                 available for use."
            }
            Self::Deployed => {
                "You've successfully built your custom AI agent. You can now \
                 start using it or make further adjustments."
            }
        }
    }

    /// Placeholder for the message input.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Describe => "Describe the agent you want to build...",
            _ => "Type your message...",
        }
    }
}

/// Why a requested transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("describe the agent before moving on")]
    PurposeMissing,

    #[error("this is the last step; deploy the agent to finish")]
    AwaitingDeploy,

    #[error("deployment is only available from the review step")]
    NotAtReview,

    #[error("the agent is already deployed")]
    AlreadyDeployed,

    #[error("the agent has not been deployed yet")]
    NotDeployed,

    #[error("that action was offered at an earlier step")]
    StaleAction,
}

/// Where the wizard currently stands.
#[derive(Debug, Clone, Default)]
pub struct StepState {
    current: Step,
}

impl StepState {
    pub fn current(&self) -> Step {
        self.current
    }

    /// Move forward one step.
    ///
    /// Leaving `Describe` requires a purpose on the draft. The last
    /// configurable step does not advance: only deployment finishes the flow.
    pub fn advance(&mut self, draft: &AgentDraft) -> Result<Step, Precondition> {
        if self.current == Step::Describe && draft.purpose.trim().is_empty() {
            return Err(Precondition::PurposeMissing);
        }
        match self.current.next() {
            Some(next) => {
                self.current = next;
                Ok(next)
            }
            None if self.current == Step::Deployed => Err(Precondition::AlreadyDeployed),
            None => Err(Precondition::AwaitingDeploy),
        }
    }

    /// Move back one step, stopping at the first.
    ///
    /// Does nothing once deployed.
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.current.previous() {
            self.current = previous;
        }
        self.current
    }

    /// Jump to the terminal state. Reserved for the deployment sequence.
    pub(crate) fn finish(&mut self) {
        self.current = Step::Deployed;
    }

    /// Start over from the first step.
    pub(crate) fn reset(&mut self) {
        self.current = Step::Describe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn described() -> AgentDraft {
        AgentDraft {
            purpose: "Answer billing questions".into(),
            ..AgentDraft::default()
        }
    }

    #[test]
    fn advance_without_purpose_stays_put() {
        let mut state = StepState::default();
        let err = state.advance(&AgentDraft::default()).unwrap_err();

        assert_eq!(err, Precondition::PurposeMissing);
        assert_eq!(state.current(), Step::Describe);
    }

    #[test]
    fn whitespace_purpose_counts_as_missing() {
        let mut state = StepState::default();
        let draft = AgentDraft {
            purpose: "   ".into(),
            ..AgentDraft::default()
        };

        assert!(state.advance(&draft).is_err());
        assert_eq!(state.current().index(), 0);
    }

    #[test]
    fn advance_with_purpose_moves_to_tools() {
        let mut state = StepState::default();
        let step = state.advance(&described()).unwrap();

        assert_eq!(step, Step::ConfigureTools);
        assert_eq!(state.current().index(), 1);
    }

    #[test]
    fn advance_stops_at_review() {
        let mut state = StepState::default();
        let draft = described();
        for _ in 0..4 {
            state.advance(&draft).unwrap();
        }
        assert_eq!(state.current(), Step::ReviewDeploy);

        let err = state.advance(&draft).unwrap_err();
        assert_eq!(err, Precondition::AwaitingDeploy);
        assert_eq!(state.current(), Step::ReviewDeploy);
    }

    #[test]
    fn retreat_floors_at_first_step() {
        let mut state = StepState::default();
        assert_eq!(state.retreat(), Step::Describe);

        state.advance(&described()).unwrap();
        assert_eq!(state.retreat(), Step::Describe);
        assert_eq!(state.retreat(), Step::Describe);
    }

    #[test]
    fn deployed_is_terminal() {
        let mut state = StepState::default();
        state.finish();

        assert_eq!(state.retreat(), Step::Deployed);
        assert_eq!(
            state.advance(&described()).unwrap_err(),
            Precondition::AlreadyDeployed
        );
        assert_eq!(state.current().index(), Step::TOTAL);
    }

    #[test]
    fn only_describe_uses_the_describe_placeholder() {
        assert_eq!(
            Step::Describe.placeholder(),
            "Describe the agent you want to build..."
        );
        for step in &Step::CONFIGURABLE[1..] {
            assert_eq!(step.placeholder(), "Type your message...");
        }
    }
}
