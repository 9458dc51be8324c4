//! Core data models for the campus briefing.

mod campus;
mod language;
mod menu;
mod transit;
mod weather;

pub use campus::*;
pub use language::*;
pub use menu::*;
pub use transit::*;
pub use weather::*;
