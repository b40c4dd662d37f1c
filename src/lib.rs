#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Dining Table
//!
//! > **N agents, N shared resources, one ring, and no deadlock.**
//!
//! Each agent sits between two neighbours and shares one exclusive resource with each of
//! them. To do a unit of work ("eat") it needs both. The crate implements the protocol
//! that gets them there safely, on Tokio.
//!
//! ## 🏗️ Design
//!
//! ### Why not "left, then right"?
//! If every agent picks up its left resource and then its right one, all of them can hold
//! their left and wait forever on their right: a circular wait. Instead every resource has
//! a rank (its index) and every agent takes the **lower-ranked resource first**. No cycle of
//! "holds X, waits for Y" can close, whatever the timing. See [`table::wiring`].
//!
//! ### Why a Tokio mutex?
//! Deadlock-freedom comes from the ordering; starvation-freedom comes from the lock.
//! [`tokio::sync::Mutex`] serves waiters first-in first-out, so an agent queued on a
//! resource gets it before a neighbour that releases and immediately asks again.
//! See [`resource`].
//!
//! ### Scoped release
//! Acquiring returns a guard that releases on drop. Cancel an agent while it holds one
//! resource and waits for the other, and the held one is given back as the future unwinds.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Protocol ([`resource`], [`agent`], [`table`])
//! - [`Resource`](resource::Resource): fair exclusive lock with a recorded holder.
//! - [`Agent`](agent::Agent): the Thinking → Hungry → Eating loop.
//! - [`Table`](table::Table): builds the ring and assigns each agent its acquisition order.
//!
//! ### 2. The Collaborators ([`think`], [`events`], [`reporter`])
//! - [`ThinkSource`](think::ThinkSource): how long to think between meals.
//! - [`EventSink`](events::EventSink): non-blocking stream of acquire/release/transition events.
//! - [`Reporter`](reporter::Reporter): periodic read-only scoreboard of meal counts.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - [`TableConfig`](lifecycle::TableConfig): configuration from file and environment.
//! - [`TableSystem`](lifecycle::TableSystem): starts everything and shuts it down cleanly.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Five agents, random thinking, scoreboard every second
//! RUST_LOG=info cargo run
//!
//! # Maximum contention for ten seconds
//! DINING_THINK__KIND=fixed DINING_THINK__MILLIS=0 RUST_LOG=info cargo run -- --run-for-secs 10
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod agent;
pub mod events;
pub mod lifecycle;
pub mod model;
pub mod reporter;
pub mod resource;
pub mod table;
pub mod think;
