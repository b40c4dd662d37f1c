//! # The Table
//!
//! [`Table::set`] lays out the ring: `N` resources, `N` seats wired by
//! [`wiring::wire`], and one [`Agent`] per seat. After that the table is static topology.
//! It holds the resources and the [`Roster`] for inspection and has no runtime role; the
//! ordering policy lives inside each agent.
//!
//! ```rust,ignore
//! let (table, agents) = Table::set(5, Duration::ZERO, EventSink::disabled())?;
//! assert_eq!(table.seats()[4].primary, ResourceId::new(0));
//! ```

pub mod error;
pub mod roster;
pub mod wiring;

pub use error::*;
pub use roster::*;
pub use wiring::*;

use crate::agent::Agent;
use crate::events::EventSink;
use crate::model::ResourceId;
use crate::resource::Resource;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Resources, seats and roster of one ring.
#[derive(Debug, Clone)]
pub struct Table {
    resources: Vec<Arc<Resource>>,
    seats: Vec<Seat>,
    roster: Roster,
}

impl Table {
    /// Builds the ring and returns it together with its agents, ready to run.
    ///
    /// # Errors
    /// [`TableError::TooFewAgents`] when `count < 2`.
    pub fn set(
        count: usize,
        eat_for: Duration,
        events: EventSink,
    ) -> Result<(Self, Vec<Agent>), TableError> {
        let seats = wire(count)?;
        let resources: Vec<Arc<Resource>> = (0..count)
            .map(|index| Resource::new(ResourceId::new(index), events.clone()))
            .collect();

        let agents = seats
            .iter()
            .map(|seat| {
                Agent::new(
                    seat.agent,
                    Arc::clone(&resources[seat.primary.index()]),
                    Arc::clone(&resources[seat.secondary.index()]),
                    eat_for,
                    events.clone(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let roster = Roster::new(agents.iter().map(Agent::view).collect());
        info!(agents = count, "Table set");

        Ok((
            Self {
                resources,
                seats,
                roster,
            },
            agents,
        ))
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Arc<Resource>> {
        self.resources.get(id.index())
    }

    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}
