//! Deployment sequencing.
//!
//! Deployment is simulated: starting it schedules a completion after a fixed
//! latency, and completion always succeeds. At most one deployment can be in
//! flight.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::{Deferred, take_due};

/// Raised on the notification channel when a deployment completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub raised_at: Timestamp,
}

impl Notification {
    pub fn deployed(raised_at: Timestamp) -> Self {
        Self {
            title: "Agent Deployed Successfully!".to_string(),
            body: "Congratulations! Your AI agent has been successfully built and deployed. \
                   You can now interact with your agent or continue to make refinements."
                .to_string(),
            raised_at,
        }
    }
}

/// Returned when a deployment is requested while one is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a deployment is already in progress")]
pub struct DeployInProgress;

#[derive(Debug, Default)]
pub struct DeploySequencer {
    pending: Option<Deferred<()>>,
}

impl DeploySequencer {
    pub fn is_deploying(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.pending.as_ref().map(Deferred::due)
    }

    /// Begin a deployment that completes `delay` after `now`.
    pub fn start(&mut self, now: Timestamp, delay: SignedDuration) -> Result<(), DeployInProgress> {
        if self.pending.is_some() {
            return Err(DeployInProgress);
        }
        self.pending = Some(Deferred::schedule(now, delay, ()));
        info!(?delay, "deployment started");
        Ok(())
    }

    /// Returns true exactly once: when the running deployment has completed.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let finished = take_due(&mut self.pending, now).is_some();
        if finished {
            info!("deployment finished");
        }
        finished
    }

    /// Drop the running deployment, if any. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
