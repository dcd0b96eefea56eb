//! Cancellable, replaceable delayed values

use std::time::Duration;

use tokio::time::Instant;

/// Holds the most recent value of a burst until a quiet period has passed
///
/// Pushing a new value replaces the pending one and restarts the timer;
/// replaced values are dropped, never queued.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Store a value and restart the timer; returns true if a pending value was replaced
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        self.pending.replace((value, now + self.delay)).is_some()
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Take the pending value regardless of its deadline
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    /// Drop the pending value; returns true if there was one
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
