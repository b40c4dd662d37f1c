//! # Agents
//!
//! An [`Agent`] loops forever through Thinking → Hungry → Eating → Thinking. To eat it
//! needs both of its resources, taken in a fixed order: `primary` first, then
//! `secondary`. The table assigns that order at wiring time so that `primary` always has
//! the lower index; [`Agent::new`] refuses anything else.
//!
//! ## Cancellation
//! [`Agent::run`] watches a stop signal while thinking and while acquiring. When the signal
//! fires, the in-flight acquisition future is dropped, and with it any
//! [`ResourceGuard`](crate::resource::ResourceGuard) already taken, so nothing stays held.
//!
//! ## Failures
//! A [`ResourceError`](crate::resource::ResourceError) ends this agent's loop with an
//! [`AgentError`]. The guards it held are dropped on the way out; neighbours carry on.

pub mod error;
pub mod view;

pub use error::*;
pub use view::*;

use crate::events::{Event, EventSink};
use crate::model::{AgentId, AgentState};
use crate::resource::Resource;
use crate::think::ThinkSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// One seat at the table.
pub struct Agent {
    id: AgentId,
    primary: Arc<Resource>,
    secondary: Arc<Resource>,
    eat_for: Duration,
    view: Arc<AgentView>,
    events: EventSink,
}

impl Agent {
    /// Creates an agent in the `Thinking` state.
    ///
    /// # Errors
    /// [`AgentError::Unordered`] unless `primary` ranks strictly below `secondary`.
    pub fn new(
        id: AgentId,
        primary: Arc<Resource>,
        secondary: Arc<Resource>,
        eat_for: Duration,
        events: EventSink,
    ) -> Result<Self, AgentError> {
        if primary.id() >= secondary.id() {
            return Err(AgentError::Unordered {
                agent: id,
                primary: primary.id(),
                secondary: secondary.id(),
            });
        }
        Ok(Self {
            id,
            primary,
            secondary,
            eat_for,
            view: Arc::new(AgentView::new(id)),
            events,
        })
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn primary(&self) -> &Arc<Resource> {
        &self.primary
    }

    pub fn secondary(&self) -> &Arc<Resource> {
        &self.secondary
    }

    /// Shared read-only view for reporting.
    pub fn view(&self) -> Arc<AgentView> {
        Arc::clone(&self.view)
    }

    /// Runs the think/eat loop until `stop` turns `true` (or its sender goes away).
    ///
    /// Returns the number of completed meals on a clean stop.
    pub async fn run(
        self,
        mut think: Box<dyn ThinkSource>,
        mut stop: watch::Receiver<bool>,
    ) -> Result<u64, AgentError> {
        info!(
            agent = %self.id,
            primary = %self.primary.id(),
            secondary = %self.secondary.id(),
            "Agent started"
        );

        loop {
            let pause = think.next_think();
            tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                _ = pause_for(pause) => {}
            }

            self.transition(AgentState::Hungry);
            tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                meal = self.dine() => {
                    if let Err(e) = meal {
                        error!(
                            agent = %self.id,
                            error = %e,
                            "Invariant violated, leaving the table"
                        );
                        self.transition(AgentState::Thinking);
                        return Err(e);
                    }
                }
            }
        }

        self.transition(AgentState::Thinking);
        let times_eaten = self.view.times_eaten();
        info!(agent = %self.id, times_eaten, "Agent stopped");
        Ok(times_eaten)
    }

    /// Hungry → Eating → Thinking. Guards release on every early return.
    async fn dine(&self) -> Result<(), AgentError> {
        let first = self.primary.acquire(self.id).await?;
        let second = self.secondary.acquire(self.id).await?;

        self.transition(AgentState::Eating);
        if !self.eat_for.is_zero() {
            tokio::time::sleep(self.eat_for).await;
        }
        let times_eaten = self.view.record_meal();
        debug!(agent = %self.id, times_eaten, "Ate");

        second.release()?;
        first.release()?;
        self.transition(AgentState::Thinking);
        Ok(())
    }

    fn transition(&self, to: AgentState) {
        let from = self.view.swap_state(to);
        if from != to {
            debug!(agent = %self.id, %from, %to, "Transition");
            self.events.emit(Event::Transition {
                agent: self.id,
                from,
                to,
            });
        }
    }
}

/// Resolves once the stop flag is set or the sender is gone.
pub(crate) async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stop| *stop).await;
}

async fn pause_for(duration: Duration) {
    if duration.is_zero() {
        // Still give neighbours on this worker a turn.
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(duration).await;
    }
}
