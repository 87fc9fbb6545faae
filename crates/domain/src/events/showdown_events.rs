//! Showdown-related domain events
//!
//! Returned by showdown mutations so callers can log or react to what
//! changed without diffing the aggregate.

use crate::ids::{SettlementId, SurvivorId};
use crate::value_objects::TurnType;

/// Outcome of ending the current showdown turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnChange {
    pub from: TurnType,
    pub to: TurnType,
    /// The pending ambush was consumed by this transition.
    pub ambush_cleared: bool,
}

impl TurnChange {
    /// Survivors' action flags were reset by this transition.
    pub fn survivors_reset(&self) -> bool {
        self.to == TurnType::Survivors
    }
}

/// Outcome of folding a finished showdown back into the settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowdownConcluded {
    pub settlement_id: SettlementId,
    /// Living participants who gained hunt experience.
    pub experienced: Vec<SurvivorId>,
    /// Participants who could not gain more hunt experience.
    pub at_cap: Vec<SurvivorId>,
}
