//! # Diagnostic Events
//!
//! Resources and agents report what they do through an [`EventSink`]. The sink is a thin
//! wrapper over an unbounded Tokio channel, so emitting never blocks or awaits: a slow (or
//! absent) consumer can't stall the protocol.
//!
//! ```rust,ignore
//! let (events, receiver) = EventSink::channel();
//! let (table, agents) = Table::set(5, Duration::ZERO, events)?;
//! let mut recorder = EventRecorder::new(receiver);
//! // ... run agents ...
//! recorder.drain();
//! recorder.check_exclusion()?;
//! ```
//!
//! The [`recorder`] module replays a captured stream and checks that per-resource hold
//! intervals never overlap.

pub mod recorder;

pub use recorder::*;

use crate::model::{AgentId, AgentState, ResourceId};
use tokio::sync::mpsc;

/// Something observable happened at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `agent` became the holder of `resource`.
    Acquired { resource: ResourceId, agent: AgentId },
    /// `agent` gave `resource` back.
    Released { resource: ResourceId, agent: AgentId },
    /// `agent` moved between states.
    Transition {
        agent: AgentId,
        from: AgentState,
        to: AgentState,
    },
}

/// Fire-and-forget event consumer handle.
///
/// Cloning is cheap; every resource and agent carries its own clone.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::UnboundedSender<Event>>,
}

impl EventSink {
    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// A sink backed by an unbounded channel, plus the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn emit(&self, event: Event) {
        if let Some(sender) = &self.sender {
            // A closed receiver only means nobody is listening anymore.
            let _ = sender.send(event);
        }
    }
}
