//! # Table Configuration
//!
//! [`TableConfig`] is read with the `config` crate from an optional TOML file, then
//! overridden by `DINING_*` environment variables (nested keys use `__`):
//!
//! ```toml
//! agents = 5
//! eat_millis = 0
//! report_interval_millis = 1000
//! seed = 7
//!
//! [think]
//! kind = "random"
//! min_millis = 1000
//! max_millis = 11000
//! ```
//!
//! ```bash
//! DINING_AGENTS=8 DINING_THINK__KIND=fixed DINING_THINK__MILLIS=0 cargo run
//! ```

use super::SystemError;
use crate::model::AgentId;
use crate::think::{FixedThink, RandomThink, ThinkSource};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// How agents pick their think durations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThinkConfig {
    Fixed { millis: u64 },
    Random { min_millis: u64, max_millis: u64 },
}

impl Default for ThinkConfig {
    fn default() -> Self {
        ThinkConfig::Random {
            min_millis: 1_000,
            max_millis: 11_000,
        }
    }
}

impl ThinkConfig {
    /// A fresh source for `agent`. A base `seed` is offset per agent so neighbours don't
    /// think in lockstep.
    pub fn source(&self, agent: AgentId, seed: Option<u64>) -> Box<dyn ThinkSource> {
        match *self {
            ThinkConfig::Fixed { millis } => Box::new(FixedThink(Duration::from_millis(millis))),
            ThinkConfig::Random {
                min_millis,
                max_millis,
            } => Box::new(RandomThink::new(
                min_millis,
                max_millis,
                seed.map(|seed| seed.wrapping_add(agent.index() as u64)),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Seats around the table (at least 2).
    pub agents: usize,
    pub think: ThinkConfig,
    /// How long a meal lasts once both resources are held.
    pub eat_millis: u64,
    pub report_interval_millis: u64,
    /// Seed for random think durations; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            agents: 5,
            think: ThinkConfig::default(),
            eat_millis: 0,
            report_interval_millis: 1_000,
            seed: None,
        }
    }
}

/// `DINING_AGENTS=8`, `DINING_THINK__KIND=fixed`, ...
fn environment() -> Environment {
    Environment::with_prefix("DINING")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl TableConfig {
    /// Loads defaults, then `path` (if given), then `DINING_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, SystemError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, SystemError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: TableConfig = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SystemError> {
        if self.agents < 2 {
            return Err(SystemError::InvalidConfig(format!(
                "agents must be at least 2, got {}",
                self.agents
            )));
        }
        if self.report_interval_millis == 0 {
            return Err(SystemError::InvalidConfig(
                "report_interval_millis must be positive".to_string(),
            ));
        }
        if let ThinkConfig::Random {
            min_millis,
            max_millis,
        } = self.think
        {
            if min_millis > max_millis {
                return Err(SystemError::InvalidConfig(format!(
                    "think range {min_millis}..={max_millis} is empty"
                )));
            }
        }
        Ok(())
    }

    pub fn eat_for(&self) -> Duration {
        Duration::from_millis(self.eat_millis)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_millis)
    }
}
