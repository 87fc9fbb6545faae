//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Parses itself from the stored document through [`Schema`](crate::schema::Schema)
//! - Serializes back to exactly the shape it parses
//! - Guards its lifecycle through methods that return domain errors or events
//!
//! The settlement and survivor sheets expose their values directly since
//! every edit is re-validated before it is stored. Embark sessions and the
//! campaign root keep their fields private so their state machines cannot
//! be bypassed.

mod party;

pub mod campaign;
pub mod hunt;
pub mod settlement;
pub mod settlement_phase;
pub mod showdown;
pub mod survivor;

pub use campaign::{Campaign, EmbarkState, CAMPAIGN_VERSION};
pub use hunt::Hunt;
pub use party::{MAX_PARTY_SIZE, MIN_PARTY_SIZE};
pub use settlement::Settlement;
pub use settlement_phase::SettlementPhase;
pub use showdown::{opening_turn, Showdown};
pub use survivor::{Gender, Survivor, SurvivorKnowledge};
