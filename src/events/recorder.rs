//! # Event Recorder
//!
//! Test utility that captures the event stream and replays it against the mutual-exclusion
//! rule: a resource is acquired only while free and released only by its holder.
//!
//! Resources emit `Released` before their lock is handed on and `Acquired` after it is
//! taken, so the channel order is a faithful order of hold intervals.

use super::Event;
use crate::model::{AgentId, ResourceId};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;

/// A replayed stream broke mutual exclusion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExclusionViolation {
    #[error("{resource} acquired by {agent} while still held by {holder}")]
    Overlap {
        resource: ResourceId,
        agent: AgentId,
        holder: AgentId,
    },
    #[error("{resource} released by {agent} but held by {holder:?}")]
    ForeignRelease {
        resource: ResourceId,
        agent: AgentId,
        holder: Option<AgentId>,
    },
}

/// Collects events from an [`EventSink`](super::EventSink) channel.
pub struct EventRecorder {
    receiver: mpsc::UnboundedReceiver<Event>,
    events: Vec<Event>,
}

impl EventRecorder {
    pub fn new(receiver: mpsc::UnboundedReceiver<Event>) -> Self {
        Self {
            receiver,
            events: Vec::new(),
        }
    }

    /// Pulls everything currently buffered. Returns how many events were added.
    pub fn drain(&mut self) -> usize {
        let before = self.events.len();
        while let Ok(event) = self.receiver.try_recv() {
            self.events.push(event);
        }
        self.events.len() - before
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of completed (acquired then released) holds per resource.
    ///
    /// Fails on the first event that contradicts mutual exclusion.
    pub fn check_exclusion(&self) -> Result<HashMap<ResourceId, usize>, ExclusionViolation> {
        let mut holders: HashMap<ResourceId, AgentId> = HashMap::new();
        let mut holds: HashMap<ResourceId, usize> = HashMap::new();

        for event in &self.events {
            match *event {
                Event::Acquired { resource, agent } => {
                    if let Some(&holder) = holders.get(&resource) {
                        return Err(ExclusionViolation::Overlap {
                            resource,
                            agent,
                            holder,
                        });
                    }
                    holders.insert(resource, agent);
                }
                Event::Released { resource, agent } => match holders.get(&resource) {
                    Some(&holder) if holder == agent => {
                        holders.remove(&resource);
                        *holds.entry(resource).or_default() += 1;
                    }
                    other => {
                        return Err(ExclusionViolation::ForeignRelease {
                            resource,
                            agent,
                            holder: other.copied(),
                        });
                    }
                },
                Event::Transition { .. } => {}
            }
        }

        Ok(holds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;

    fn acquired(resource: usize, agent: usize) -> Event {
        Event::Acquired {
            resource: ResourceId::new(resource),
            agent: AgentId::new(agent),
        }
    }

    fn released(resource: usize, agent: usize) -> Event {
        Event::Released {
            resource: ResourceId::new(resource),
            agent: AgentId::new(agent),
        }
    }

    fn recorded(events: &[Event]) -> EventRecorder {
        let (sink, receiver) = EventSink::channel();
        for event in events {
            sink.emit(*event);
        }
        let mut recorder = EventRecorder::new(receiver);
        assert_eq!(recorder.drain(), events.len());
        recorder
    }

    #[test]
    fn test_sequential_holds_pass() {
        let recorder = recorded(&[
            acquired(0, 0),
            acquired(1, 1),
            released(0, 0),
            acquired(0, 4),
            released(0, 4),
            released(1, 1),
        ]);
        let holds = recorder.check_exclusion().unwrap();
        assert_eq!(holds[&ResourceId::new(0)], 2);
        assert_eq!(holds[&ResourceId::new(1)], 1);
    }

    #[test]
    fn test_overlap_is_detected() {
        let recorder = recorded(&[acquired(2, 1), acquired(2, 2)]);
        assert_eq!(
            recorder.check_exclusion(),
            Err(ExclusionViolation::Overlap {
                resource: ResourceId::new(2),
                agent: AgentId::new(2),
                holder: AgentId::new(1),
            })
        );
    }

    #[test]
    fn test_release_by_stranger_is_detected() {
        let recorder = recorded(&[acquired(0, 0), released(0, 1)]);
        assert!(matches!(
            recorder.check_exclusion(),
            Err(ExclusionViolation::ForeignRelease { holder: Some(_), .. })
        ));
    }
}
