//! The configuration session: one run through the wizard.
//!
//! The session owns the step state, the draft, and the transcript, and is the
//! only thing that mutates them. Every change comes from a discrete event:
//! a submitted message, an invoked action, a panel event, or deferred work
//! coming due in [`Session::poll`].
//!
//! Replies and deployments are deferred by the configured [`Timing`]. At most
//! one reply and one deployment can be pending at a time; both are cancelled
//! when the session is closed or dropped.

use std::collections::HashSet;

use jiff::Timestamp;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CapabilityCatalog;
use crate::clock::{Clock, Deferred, Timing, take_due};
use crate::deploy::{DeploySequencer, Notification};
use crate::model::{
    Action, AgentDraft, Precondition, PromptPatch, SourceRecord, Step, StepState, WorkflowPatch,
};
use crate::panel::KnowledgeEvent;
use crate::progress::Progress;
use crate::synthesize::{WELCOME, synthesize};
use crate::transcript::{EmptyInput, Transcript};

/// Why a session operation was refused. None of these end the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,

    #[error("{0}")]
    PreconditionNotMet(#[from] Precondition),

    #[error("{0} is already in progress")]
    AlreadyInProgress(&'static str),

    #[error("no message with id {0}")]
    UnknownMessage(u64),

    #[error("message {message_id} has no action {index}")]
    UnknownAction { message_id: u64, index: usize },

    #[error("action {index} of message {message_id} was already used")]
    ActionConsumed { message_id: u64, index: usize },

    #[error("no capability with id {0}")]
    UnknownCapability(u32),

    #[error("no knowledge source with id {0}")]
    UnknownSource(Uuid),

    #[error("session is closed")]
    Closed,
}

impl From<EmptyInput> for SessionError {
    fn from(_: EmptyInput) -> Self {
        Self::EmptyInput
    }
}

pub type Result<T> = core::result::Result<T, SessionError>;

/// Something that happened while polling deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A system reply was appended to the transcript.
    Replied { message_id: u64 },

    /// Deployment completed and a notification was raised.
    Deployed,
}

pub struct Session {
    id: Uuid,
    timing: Timing,
    clock: Box<dyn Clock>,
    catalog: Box<dyn CapabilityCatalog>,
    steps: StepState,
    draft: AgentDraft,
    transcript: Transcript,
    /// The user message awaiting a reply.
    pending_reply: Option<Deferred<String>>,
    deploy: DeploySequencer,
    /// (message id, action index) pairs already invoked.
    consumed: HashSet<(u64, usize)>,
    notifications: Vec<Notification>,
    closed: bool,
}

impl Session {
    /// Starts a session with a fresh draft and the welcome message.
    pub fn new(
        timing: Timing,
        clock: Box<dyn Clock>,
        catalog: Box<dyn CapabilityCatalog>,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            timing,
            clock,
            catalog,
            steps: StepState::default(),
            draft: AgentDraft::default(),
            transcript: Transcript::default(),
            pending_reply: None,
            deploy: DeploySequencer::default(),
            consumed: HashSet::new(),
            notifications: Vec::new(),
            closed: false,
        };
        session.welcome();
        info!(session = %session.id, "session started");
        session
    }

    // ── Reads ──

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.steps.current()
    }

    pub fn draft(&self) -> &AgentDraft {
        &self.draft
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn catalog(&self) -> &dyn CapabilityCatalog {
        self.catalog.as_ref()
    }

    /// True from a successful submit until its reply is appended.
    pub fn is_thinking(&self) -> bool {
        self.pending_reply.is_some()
    }

    pub fn is_deploying(&self) -> bool {
        self.deploy.is_deploying()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Notifications raised so far, oldest first. Kept apart from the transcript.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.step(), &self.draft)
    }

    /// When the earliest pending work comes due, if any.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        let reply = self.pending_reply.as_ref().map(Deferred::due);
        match (reply, self.deploy.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Conversation ──

    /// Appends a user message and schedules the reply. Returns the message id.
    ///
    /// Refused while a previous reply is still pending, before anything
    /// is appended.
    pub fn submit(&mut self, content: &str) -> Result<u64> {
        self.ensure_open()?;
        if self.pending_reply.is_some() {
            warn!("message submitted while a reply is pending");
            return Err(SessionError::AlreadyInProgress("a reply"));
        }
        let now = self.clock.now();
        let id = self.transcript.append_user(content, now).inspect_err(|_| {
            debug!("empty message ignored");
        })?;
        self.pending_reply = Some(Deferred::schedule(
            now,
            self.timing.thinking,
            content.to_string(),
        ));
        debug!(id, step = ?self.step(), "reply scheduled");
        Ok(id)
    }

    /// Fires whatever deferred work is due and reports what happened.
    pub fn poll(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.closed {
            return events;
        }
        let now = self.clock.now();

        if let Some(user_message) = take_due(&mut self.pending_reply, now) {
            let reply = synthesize(self.step(), &self.draft, &user_message);
            if let Some(patch) = reply.patch {
                debug!(?patch, "draft patched by reply");
                patch.apply(&mut self.draft);
            }
            let message_id = self.transcript.append_system(
                reply.content,
                reply.actions,
                reply.panels,
                now,
            );
            events.push(Event::Replied { message_id });
        }

        if self.deploy.poll(now) {
            self.draft.deployed = true;
            self.steps.finish();
            self.notifications.push(Notification::deployed(now));
            info!(session = %self.id, "agent deployed");
            events.push(Event::Deployed);
        }

        events
    }

    // ── Controls ──

    /// The "Next" control.
    pub fn advance(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let step = self.steps.advance(&self.draft).inspect_err(|reason| {
            debug!(%reason, "advance refused");
        })?;
        info!(?step, "advanced");
        Ok(step)
    }

    /// The "Back" control.
    pub fn retreat(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let step = self.steps.retreat();
        info!(?step, "retreated");
        Ok(step)
    }

    /// Runs action `index` of message `message_id`.
    ///
    /// Each action runs at most once; a refused action can be retried.
    pub fn invoke(&mut self, message_id: u64, index: usize) -> Result<()> {
        self.ensure_open()?;
        let message = self
            .transcript
            .get(message_id)
            .ok_or(SessionError::UnknownMessage(message_id))?;
        let action = message
            .actions
            .get(index)
            .ok_or(SessionError::UnknownAction { message_id, index })?
            .action;
        if self.consumed.contains(&(message_id, index)) {
            return Err(SessionError::ActionConsumed { message_id, index });
        }
        self.dispatch(action)?;
        self.consumed.insert((message_id, index));
        Ok(())
    }

    /// The single interpreter for actions.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        debug!(?action, "dispatching action");
        match action {
            Action::Advance { from } if from != self.step() => {
                debug!(?from, step = ?self.step(), "stale advance refused");
                Err(Precondition::StaleAction.into())
            }
            Action::Advance { .. } => self.advance().map(drop),
            Action::Deploy => self.deploy(),
            Action::ToggleCapability { id } => self.toggle_capability(id).map(drop),
        }
    }

    // ── Panel events ──

    /// Selects or deselects a catalog capability. Returns whether it is now selected.
    pub fn toggle_capability(&mut self, id: u32) -> Result<bool> {
        self.ensure_idle()?;
        let capability = self
            .catalog
            .get(id)
            .ok_or(SessionError::UnknownCapability(id))?;
        let selected = self.draft.toggle_capability(capability);
        info!(id, selected, "capability toggled");
        Ok(selected)
    }

    /// Applies a knowledge panel event. Returns the id of an added source.
    pub fn apply_knowledge(&mut self, event: KnowledgeEvent) -> Result<Option<Uuid>> {
        self.ensure_idle()?;
        let now = self.clock.now();
        let record = match event {
            KnowledgeEvent::FileAdded { name, size_bytes } => {
                SourceRecord::file(name, size_bytes, now)
            }
            KnowledgeEvent::UrlAdded { url } => SourceRecord::url(url, now),
            KnowledgeEvent::SourceRemoved { id } => {
                let removed = self
                    .draft
                    .remove_source(id)
                    .ok_or(SessionError::UnknownSource(id))?;
                info!(%id, source = removed.display_name(), "knowledge source removed");
                return Ok(None);
            }
        };
        let id = record.id;
        info!(%id, source = record.display_name(), "knowledge source added");
        self.draft.add_source(record);
        Ok(Some(id))
    }

    pub fn apply_prompts(&mut self, patch: PromptPatch) -> Result<()> {
        self.ensure_idle()?;
        self.draft.apply_prompts(patch);
        info!("prompt templates saved");
        Ok(())
    }

    pub fn apply_workflow(&mut self, patch: WorkflowPatch) -> Result<()> {
        self.ensure_idle()?;
        self.draft.apply_workflow(patch);
        info!(params = ?self.draft.workflow_params, "workflow saved");
        Ok(())
    }

    // ── Lifecycle ──

    /// Starts deployment. Only available from the review step.
    pub fn deploy(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.deploy.is_deploying() {
            warn!("deploy requested while already deploying");
            return Err(SessionError::AlreadyInProgress("a deployment"));
        }
        match self.step() {
            Step::ReviewDeploy => {}
            Step::Deployed => return Err(Precondition::AlreadyDeployed.into()),
            _ => return Err(Precondition::NotAtReview.into()),
        }
        let now = self.clock.now();
        self.deploy
            .start(now, self.timing.deploy)
            .map_err(|_| SessionError::AlreadyInProgress("a deployment"))
    }

    /// After deployment, starts a new agent from scratch.
    ///
    /// The transcript is kept; a new welcome message marks the restart.
    pub fn build_another(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.step() != Step::Deployed {
            return Err(Precondition::NotDeployed.into());
        }
        if self.pending_reply.is_some() {
            return Err(SessionError::AlreadyInProgress("a reply"));
        }
        self.draft = AgentDraft::default();
        self.steps.reset();
        self.welcome();
        info!(session = %self.id, "starting another agent");
        Ok(())
    }

    /// Cancels pending work. Nothing changes after this.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.pending_reply.take().is_some() {
            debug!("pending reply cancelled");
        }
        if self.deploy.cancel() {
            debug!("pending deployment cancelled");
        }
        self.closed = true;
        info!(session = %self.id, "session closed");
    }

    fn welcome(&mut self) {
        let now = self.clock.now();
        self.transcript
            .append_system(WELCOME.to_string(), Vec::new(), Vec::new(), now);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    /// Steps and the draft are frozen while a deployment is in flight.
    fn ensure_idle(&self) -> Result<()> {
        self.ensure_open()?;
        if self.deploy.is_deploying() {
            debug!("change refused while deploying");
            return Err(SessionError::AlreadyInProgress("a deployment"));
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
