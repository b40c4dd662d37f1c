//! # Table Lifecycle
//!
//! Everything around the core protocol that a running program needs:
//!
//! - [`TableConfig`]: agent count, think/eat timing, reporting interval
//! - [`TableSystem`]: starts agents and the reporter, shuts them down on a stop signal
//! - [`setup_tracing`]: logging
//!
//! ## Shutdown
//!
//! Every task holds a receiver of the same `watch` channel. [`TableSystem::shutdown`]
//! flips it to `true`; agents blocked thinking or waiting on a resource wake up, drop
//! their in-flight acquisition (and with it any resource already held), and return their
//! meal count. The reporter stops at its next wake-up.

pub mod config;
pub mod error;
pub mod table_system;
pub mod tracing;

pub use self::config::*;
pub use self::error::*;
pub use self::table_system::*;
pub use self::tracing::*;
