//! Declarative interactions for rendered popups
//!
//! Templates declare *what* is interactive with [`InteractionDescriptor`]s;
//! the [`InteractionRunner`] interprets them against one rendered instance.
//! Time is passed in explicitly so the runner is deterministic; a driver
//! calls [`InteractionRunner::advance`] when a reset deadline is due.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Behavior attached to an interactive element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Trigger enters the claimed state, which expires after the reset delay
    ToggleClaimed,
}

/// Declares one interactive element of a rendered template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionDescriptor {
    pub element_id: String,
    pub behavior: Behavior,
    pub reset_delay: Duration,
}

impl InteractionDescriptor {
    pub fn toggle_claimed(element_id: impl Into<String>, reset_delay: Duration) -> Self {
        Self {
            element_id: element_id.into(),
            behavior: Behavior::ToggleClaimed,
            reset_delay,
        }
    }
}

/// Interaction state of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Idle,
    Claimed { until: Instant },
}

/// What a trigger did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Element moved from idle to claimed
    Claimed,
    /// Element was already claimed; nothing changed
    Ignored,
    /// No interactive element with that id in the mounted instance
    Unknown,
}

#[derive(Debug)]
struct Element {
    descriptor: InteractionDescriptor,
    state: ElementState,
}

/// Interprets interaction descriptors for the currently mounted markup
#[derive(Debug, Default)]
pub struct InteractionRunner {
    elements: HashMap<String, Element>,
    generation: u64,
}

impl InteractionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mounted instance
    ///
    /// All elements start idle; claimed timers of the previous instance are
    /// dropped with it.
    pub fn mount(&mut self, descriptors: &[InteractionDescriptor]) {
        self.generation += 1;
        self.elements = descriptors
            .iter()
            .map(|d| {
                (
                    d.element_id.clone(),
                    Element {
                        descriptor: d.clone(),
                        state: ElementState::Idle,
                    },
                )
            })
            .collect();
        debug!(
            generation = self.generation,
            elements = self.elements.len(),
            "mounted interactions"
        );
    }

    /// Remove every element, e.g. when the preview shows a render error
    pub fn unmount(&mut self) {
        self.mount(&[]);
    }

    /// Number of instances mounted so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle a trigger event on an element
    pub fn trigger(&mut self, element_id: &str, now: Instant) -> TriggerOutcome {
        self.advance(now);
        let Some(element) = self.elements.get_mut(element_id) else {
            return TriggerOutcome::Unknown;
        };
        match (element.descriptor.behavior, element.state) {
            (Behavior::ToggleClaimed, ElementState::Claimed { .. }) => TriggerOutcome::Ignored,
            (Behavior::ToggleClaimed, ElementState::Idle) => {
                element.state = ElementState::Claimed {
                    until: now + element.descriptor.reset_delay,
                };
                debug!(element = element_id, "claimed");
                TriggerOutcome::Claimed
            }
        }
    }

    /// Return every element whose reset delay has elapsed to idle
    pub fn advance(&mut self, now: Instant) {
        for (id, element) in self.elements.iter_mut() {
            if let ElementState::Claimed { until } = element.state {
                if until <= now {
                    element.state = ElementState::Idle;
                    debug!(element = id.as_str(), "claim reset");
                }
            }
        }
    }

    /// Current state of an element, if it exists in the mounted instance
    pub fn state(&self, element_id: &str) -> Option<ElementState> {
        self.elements.get(element_id).map(|e| e.state)
    }

    pub fn is_claimed(&self, element_id: &str) -> bool {
        matches!(self.state(element_id), Some(ElementState::Claimed { .. }))
    }

    /// Earliest pending reset, for drivers that sleep until the next event
    pub fn next_deadline(&self) -> Option<Instant> {
        self.elements
            .values()
            .filter_map(|e| match e.state {
                ElementState::Claimed { until } => Some(until),
                ElementState::Idle => None,
            })
            .min()
    }
}
