use async_trait::async_trait;
use dining_table::events::{Event, EventRecorder, EventSink};
use dining_table::lifecycle::{AgentOutcome, TableConfig, TableSystem, ThinkConfig};
use dining_table::model::AgentState;
use dining_table::reporter::{ReportSink, Snapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Zero think time: every agent is hungry again the moment it finishes eating.
fn max_contention(agents: usize) -> TableConfig {
    TableConfig {
        agents,
        think: ThinkConfig::Fixed { millis: 0 },
        eat_millis: 0,
        report_interval_millis: 60_000,
        seed: None,
    }
}

/// Every agent keeps eating in each of several consecutive windows. A deadlock would
/// freeze all counters; a starving agent would freeze one.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_deadlock_under_max_contention() {
    let system = TableSystem::start(&max_contention(5), EventSink::disabled())
        .expect("Failed to start table");

    let mut previous = system.roster().times_eaten();
    for window in 0..5 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let current = system.roster().times_eaten();
        for (agent, (before, after)) in previous.iter().zip(&current).enumerate() {
            assert!(
                after > before,
                "window {window}: agent {agent} stuck at {after}"
            );
        }
        previous = current;
    }

    let summary = system.shutdown().await.expect("Failed to shut down");
    assert_eq!(summary.failures().count(), 0);
}

/// Over a fixed run every agent clears a minimum, not just one or two of them.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_agent_gets_a_fair_share() {
    let system = TableSystem::start(&max_contention(5), EventSink::disabled())
        .expect("Failed to start table");

    tokio::time::sleep(Duration::from_secs(1)).await;
    let summary = system.shutdown().await.expect("Failed to shut down");

    let least = summary
        .agents
        .iter()
        .map(|agent| agent.times_eaten)
        .min()
        .unwrap();
    assert!(least >= 50, "an agent only ate {least} times:\n{summary}");
}

/// Five agents, zero think time, five seconds: nobody goes hungry.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_five_seat_scenario() {
    let system = TableSystem::start(&max_contention(5), EventSink::disabled())
        .expect("Failed to start table");

    tokio::time::sleep(Duration::from_secs(5)).await;
    let summary = system.shutdown().await.expect("Failed to shut down");

    assert_eq!(summary.agents.len(), 5);
    assert!(summary.total_eaten() > 0);
    for agent in &summary.agents {
        assert_eq!(agent.outcome, AgentOutcome::Stopped);
        assert!(agent.times_eaten > 0, "{} never ate", agent.agent);
    }
}

/// Replaying every acquire/release of a busy run never shows two holders at once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_holds_never_overlap_across_the_ring() {
    let (events, receiver) = EventSink::channel();
    let mut recorder = EventRecorder::new(receiver);
    let system = TableSystem::start(&max_contention(5), events).expect("Failed to start table");

    tokio::time::sleep(Duration::from_millis(300)).await;
    let summary = system.shutdown().await.expect("Failed to shut down");

    recorder.drain();
    let holds = recorder
        .check_exclusion()
        .expect("mutual exclusion violated");
    assert_eq!(holds.len(), 5, "every resource should have been used");

    // Each meal is two holds; an agent cancelled mid-acquisition adds at most one more.
    let total_holds = holds.values().sum::<usize>() as u64;
    let meals = summary.total_eaten();
    assert!(total_holds >= 2 * meals, "{total_holds} holds for {meals} meals");
    assert!(total_holds <= 2 * meals + 5, "{total_holds} holds for {meals} meals");

    // A seat is only taken with both resources in hand; at most one meal per agent is cut short.
    let seated = recorder
        .events()
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Transition {
                    to: AgentState::Eating,
                    ..
                }
            )
        })
        .count() as u64;
    assert!(seated >= meals, "{seated} seatings for {meals} meals");
    assert!(seated <= meals + 5, "{seated} seatings for {meals} meals");
}

/// Larger and smaller rings behave the same way.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_other_ring_sizes_make_progress() {
    for agents in [2, 3, 8] {
        let system = TableSystem::start(&max_contention(agents), EventSink::disabled())
            .expect("Failed to start table");
        tokio::time::sleep(Duration::from_millis(300)).await;
        let summary = system.shutdown().await.expect("Failed to shut down");
        for agent in &summary.agents {
            assert!(agent.times_eaten > 0, "N={agents}: {} never ate", agent.agent);
        }
    }
}

#[derive(Clone, Default)]
struct CountingSink {
    rendered: Arc<AtomicUsize>,
    last_total: Arc<AtomicUsize>,
}

#[async_trait]
impl ReportSink for CountingSink {
    async fn render(&self, snapshot: &Snapshot) {
        self.rendered.fetch_add(1, Ordering::SeqCst);
        self.last_total
            .store(snapshot.total() as usize, Ordering::SeqCst);
    }
}

/// The reporter samples on its own timer while agents run.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reporter_samples_running_table() {
    let config = TableConfig {
        report_interval_millis: 50,
        ..max_contention(5)
    };
    let sink = CountingSink::default();
    let system = TableSystem::start_with_sink(&config, EventSink::disabled(), sink.clone())
        .expect("Failed to start table");

    tokio::time::sleep(Duration::from_millis(400)).await;
    let summary = system.shutdown().await.expect("Failed to shut down");

    assert_eq!(summary.snapshots, sink.rendered.load(Ordering::SeqCst));
    assert!(summary.snapshots >= 3, "only {} snapshots", summary.snapshots);
    assert!(sink.last_total.load(Ordering::SeqCst) as u64 <= summary.total_eaten());
}

#[tokio::test]
async fn test_start_rejects_single_agent() {
    let result = TableSystem::start(&max_contention(1), EventSink::disabled());
    assert!(result.is_err());
}
