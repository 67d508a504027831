//! Time source and deferred work.
//!
//! Simulated latency is modeled as data, not as timers: a [`Deferred`] is a
//! payload with a due instant, and whoever owns it decides when to check.
//! Tests drive time by hand with `ManualClock`.

use jiff::{SignedDuration, Timestamp};

/// Anything that can say what time it is.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Simulated latencies for the session's deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Between a user message and the system reply.
    pub thinking: SignedDuration,

    /// Between starting and finishing a deployment.
    pub deploy: SignedDuration,
}

impl Timing {
    /// No latency at all: deferred work is due as soon as it is scheduled.
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            thinking: SignedDuration::ZERO,
            deploy: SignedDuration::ZERO,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            thinking: SignedDuration::from_millis(1500),
            deploy: SignedDuration::from_millis(2500),
        }
    }
}

/// A payload that becomes available at a fixed instant.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    due: Timestamp,
    payload: T,
}

impl<T> Deferred<T> {
    pub fn schedule(now: Timestamp, delay: SignedDuration, payload: T) -> Self {
        // Saturate rather than fail on absurd configured delays.
        let due = now.checked_add(delay).unwrap_or(Timestamp::MAX);
        Self { due, payload }
    }

    pub fn due(&self) -> Timestamp {
        self.due
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due
    }
}

/// Remove and return the payload in `slot` if it is due.
///
/// Leaves the slot untouched when empty or not yet due.
pub fn take_due<T>(slot: &mut Option<Deferred<T>>, now: Timestamp) -> Option<T> {
    if slot.as_ref().is_some_and(|d| d.is_due(now)) {
        slot.take().map(|d| d.payload)
    } else {
        None
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::cell::Cell;
    use std::rc::Rc;

    use jiff::{SignedDuration, Timestamp};

    use super::Clock;

    /// A clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Rc<Cell<Timestamp>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Rc::new(Cell::new(Timestamp::UNIX_EPOCH)),
            }
        }

        pub fn advance(&self, by: SignedDuration) {
            self.now.set(self.now.get().checked_add(by).unwrap());
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            self.now.get()
        }
    }
}
