//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! campaign state was modified.

pub mod settlement_phase_events;
pub mod showdown_events;

pub use settlement_phase_events::*;
pub use showdown_events::*;
