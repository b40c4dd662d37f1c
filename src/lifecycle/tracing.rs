//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): table set, agents started/stopped, shutdown summary
//! - **Snapshots** (`info`): the reporter's periodic scoreboard
//! - **Protocol** (`debug`): every acquire, release and state transition
//! - **Invariant violations** (`error`): with resource and agent identity
//!
//! ```bash
//! RUST_LOG=info cargo run                       # scoreboard and lifecycle
//! RUST_LOG=dining_table::resource=debug cargo run   # every acquire/release
//! ```
//!
//! With `RUST_LOG=debug` a single meal reads:
//!
//! ```text
//! DEBUG Transition agent=p5 from=thinking to=hungry
//! DEBUG Acquired resource=c1 agent=p5
//! DEBUG Acquired resource=c5 agent=p5
//! DEBUG Transition agent=p5 from=hungry to=eating
//! DEBUG Ate agent=p5 times_eaten=4
//! DEBUG Released resource=c5 agent=p5
//! DEBUG Released resource=c1 agent=p5
//! DEBUG Transition agent=p5 from=eating to=thinking
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
