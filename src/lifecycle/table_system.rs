use super::{SystemError, TableConfig};
use crate::agent::AgentError;
use crate::events::EventSink;
use crate::model::AgentId;
use crate::reporter::{LogReportSink, ReportSink, Reporter};
use crate::table::{Roster, Table};
use std::fmt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How one agent's task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// Stopped by the shutdown signal.
    Stopped,
    /// Left the table early on a broken invariant.
    Failed(AgentError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub agent: AgentId,
    pub times_eaten: u64,
    pub outcome: AgentOutcome,
}

/// What [`TableSystem::shutdown`] found when everything had stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownSummary {
    pub agents: Vec<AgentSummary>,
    /// Snapshots the reporter rendered over the run.
    pub snapshots: usize,
}

impl ShutdownSummary {
    pub fn total_eaten(&self) -> u64 {
        self.agents.iter().map(|agent| agent.times_eaten).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AgentSummary> {
        self.agents
            .iter()
            .filter(|agent| matches!(agent.outcome, AgentOutcome::Failed(_)))
    }
}

impl fmt::Display for ShutdownSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.agents {
            match &summary.outcome {
                AgentOutcome::Stopped => {
                    writeln!(f, "{} = {}", summary.agent, summary.times_eaten)?
                }
                AgentOutcome::Failed(e) => writeln!(
                    f,
                    "{} = {} (failed: {})",
                    summary.agent, summary.times_eaten, e
                )?,
            }
        }
        Ok(())
    }
}

/// The running table: one task per agent plus the reporter.
///
/// `TableSystem` is responsible for:
/// - **Wiring**: building the [`Table`] from a [`TableConfig`]
/// - **Startup**: spawning every agent and the reporter on the current runtime
/// - **Shutdown**: raising the stop signal and collecting each task's outcome
///
/// # Example
///
/// ```ignore
/// let system = TableSystem::start(&TableConfig::default(), EventSink::disabled())?;
/// tokio::time::sleep(Duration::from_secs(5)).await;
/// let summary = system.shutdown().await?;
/// println!("{summary}");
/// ```
pub struct TableSystem {
    table: Table,
    stop: watch::Sender<bool>,
    agents: Vec<(AgentId, JoinHandle<Result<u64, AgentError>>)>,
    reporter: JoinHandle<usize>,
}

impl TableSystem {
    /// Starts the table with snapshots logged through `tracing`.
    pub fn start(config: &TableConfig, events: EventSink) -> Result<Self, SystemError> {
        Self::start_with_sink(config, events, LogReportSink)
    }

    /// Starts the table with a custom snapshot sink.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_with_sink(
        config: &TableConfig,
        events: EventSink,
        sink: impl ReportSink,
    ) -> Result<Self, SystemError> {
        config.validate()?;

        let (table, seated) = Table::set(config.agents, config.eat_for(), events)?;
        let (stop, stop_rx) = watch::channel(false);

        let agents = seated
            .into_iter()
            .map(|agent| {
                let id = agent.id();
                let think = config.think.source(id, config.seed);
                (id, tokio::spawn(agent.run(think, stop_rx.clone())))
            })
            .collect();

        let reporter = Reporter::new(table.roster().clone(), config.report_interval(), sink);
        let reporter = tokio::spawn(reporter.run(stop_rx));

        info!(agents = config.agents, "Table started");
        Ok(Self {
            table,
            stop,
            agents,
            reporter,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn roster(&self) -> &Roster {
        self.table.roster()
    }

    /// Stops every agent and the reporter and waits for them.
    ///
    /// Agents that failed on an invariant are reported in the summary, not as an error;
    /// only a panicked task makes this return `Err`.
    pub async fn shutdown(self) -> Result<ShutdownSummary, SystemError> {
        info!("Shutting down table...");
        self.stop.send_replace(true);

        let mut agents = Vec::with_capacity(self.agents.len());
        for (agent, handle) in self.agents {
            let outcome = match handle.await {
                Ok(Ok(_)) => AgentOutcome::Stopped,
                Ok(Err(e)) => {
                    warn!(%agent, error = %e, "Agent had already failed");
                    AgentOutcome::Failed(e)
                }
                Err(e) => {
                    error!(%agent, error = %e, "Agent task failed");
                    return Err(SystemError::TaskFailed(e));
                }
            };
            let times_eaten = self
                .table
                .roster()
                .get(agent.index())
                .map(|view| view.times_eaten())
                .unwrap_or_default();
            agents.push(AgentSummary {
                agent,
                times_eaten,
                outcome,
            });
        }

        let snapshots = self.reporter.await?;

        let summary = ShutdownSummary { agents, snapshots };
        info!(total_eaten = summary.total_eaten(), "Table shutdown complete.");
        Ok(summary)
    }
}
