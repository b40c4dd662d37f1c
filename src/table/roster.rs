use crate::agent::AgentView;
use std::sync::Arc;

/// Immutable list of agent views, in seating order.
///
/// Built once with the table and shared by cloning the `Arc`; no lock guards the list
/// itself because it never changes. Counters inside each view are atomics.
#[derive(Debug, Clone)]
pub struct Roster(Arc<[Arc<AgentView>]>);

impl Roster {
    pub fn new(views: Vec<Arc<AgentView>>) -> Self {
        Self(views.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<AgentView>> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AgentView>> {
        self.0.iter()
    }

    /// Current meal counts, in seating order.
    pub fn times_eaten(&self) -> Vec<u64> {
        self.iter().map(|view| view.times_eaten()).collect()
    }
}
