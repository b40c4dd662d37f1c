//! Plain identity and state types shared by every layer of the table.

pub mod ids;
pub mod state;

pub use ids::*;
pub use state::*;
