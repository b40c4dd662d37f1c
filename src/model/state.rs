use std::fmt;

/// Where an agent is in its Thinking → Hungry → Eating cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Initial state, re-entered after every meal.
    Thinking,
    /// Waiting on one or both resources.
    Hungry,
    /// Holding both resources.
    Eating,
}

impl AgentState {
    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            AgentState::Thinking => 0,
            AgentState::Hungry => 1,
            AgentState::Eating => 2,
        }
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => AgentState::Hungry,
            2 => AgentState::Eating,
            _ => AgentState::Thinking,
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentState::Thinking => "thinking",
            AgentState::Hungry => "hungry",
            AgentState::Eating => "eating",
        };
        f.write_str(label)
    }
}
