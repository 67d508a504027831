//! The transcript: an append-only log of exchanged messages.
//!
//! Ids are assigned here, in append order, starting at 1. There is no way
//! to edit or remove an entry once it is in.

use jiff::Timestamp;
use tracing::debug;

use crate::model::{ActionButton, Message, Panel, Sender};

/// Returned when a user message has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("message is empty")]
pub struct EmptyInput;

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Appends a user message and returns its id.
    ///
    /// Blank or whitespace-only content is rejected and nothing is appended.
    pub fn append_user(&mut self, content: &str, at: Timestamp) -> Result<u64, EmptyInput> {
        if content.trim().is_empty() {
            return Err(EmptyInput);
        }
        Ok(self.push(Sender::User, content.to_string(), Vec::new(), Vec::new(), at))
    }

    /// Appends a system message and returns its id.
    pub fn append_system(
        &mut self,
        content: String,
        actions: Vec<ActionButton>,
        panels: Vec<Panel>,
        at: Timestamp,
    ) -> u64 {
        self.push(Sender::System, content, actions, panels, at)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: u64) -> Option<&Message> {
        // Ids are dense and 1-based.
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.messages.get(index)
    }

    /// The most recent system message that offers actions.
    pub fn latest_with_actions(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::System && !m.actions.is_empty())
    }

    fn push(
        &mut self,
        sender: Sender,
        content: String,
        actions: Vec<ActionButton>,
        panels: Vec<Panel>,
        sent_at: Timestamp,
    ) -> u64 {
        let id = self.messages.last().map_or(1, |m| m.id + 1);
        debug!(id, ?sender, actions = actions.len(), panels = panels.len(), "message appended");
        self.messages.push(Message {
            id,
            sender,
            content,
            actions,
            panels,
            sent_at,
        });
        id
    }
}
