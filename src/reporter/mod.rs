//! # Reporter
//!
//! Samples every agent's meal count on a fixed interval and hands the [`Snapshot`] to a
//! [`ReportSink`]. It only reads: counters may be up to one interval stale, and nothing
//! the reporter does can slow an agent down.
//!
//! The default [`LogReportSink`] writes the snapshot through `tracing`:
//!
//! ```text
//! INFO # of times each philosopher has eaten
//! p1 = 3
//! p2 = 2
//! ...
//! ```

use crate::agent::stopped;
use crate::model::AgentState;
use crate::table::Roster;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// One agent's line in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub name: String,
    pub times_eaten: u64,
    pub state: AgentState,
}

/// Meal counts of the whole table at one instant (per agent, not globally atomic).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture(roster: &Roster) -> Self {
        Self {
            entries: roster
                .iter()
                .map(|view| SnapshotEntry {
                    name: view.name().to_string(),
                    times_eaten: view.times_eaten(),
                    state: view.state(),
                })
                .collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.times_eaten).sum()
    }

    /// Smallest individual count; `None` for an empty snapshot.
    pub fn least(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.times_eaten).min()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# of times each philosopher has eaten")?;
        for entry in &self.entries {
            writeln!(f, "{} = {}", entry.name, entry.times_eaten)?;
        }
        Ok(())
    }
}

/// Where snapshots go.
#[async_trait]
pub trait ReportSink: Send + Sync + 'static {
    async fn render(&self, snapshot: &Snapshot);
}

/// Logs each snapshot at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn render(&self, snapshot: &Snapshot) {
        info!(
            total = snapshot.total(),
            least = snapshot.least().unwrap_or_default(),
            "{}",
            snapshot
        );
    }
}

/// Periodic sampler over a [`Roster`].
pub struct Reporter<S: ReportSink> {
    roster: Roster,
    every: Duration,
    sink: S,
}

impl<S: ReportSink> Reporter<S> {
    pub fn new(roster: Roster, every: Duration, sink: S) -> Self {
        Self {
            roster,
            every,
            sink,
        }
    }

    /// Renders a snapshot immediately and then at a fixed rate, until `stop` turns
    /// `true` or its sender is dropped. Returns the number of snapshots rendered.
    pub async fn run(self, mut stop: watch::Receiver<bool>) -> usize {
        // Fixed rate: ticks missed behind a slow sink fire back to back.
        let mut ticker = tokio::time::interval(self.every);
        let mut rendered = 0;

        loop {
            tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                _ = ticker.tick() => {
                    let snapshot = Snapshot::capture(&self.roster);
                    self.sink.render(&snapshot).await;
                    rendered += 1;
                }
            }
        }

        debug!(rendered, "Reporter stopped");
        rendered
    }
}
