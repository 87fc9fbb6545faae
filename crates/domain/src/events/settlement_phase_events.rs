//! Settlement phase events

use crate::value_objects::SettlementPhaseStep;

/// Outcome of advancing the settlement phase to its next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAdvance {
    Moved {
        from: SettlementPhaseStep,
        to: SettlementPhaseStep,
    },
    /// Already at the final step; nothing changed.
    AlreadyFinal,
}

/// Outcome of selecting a step directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseJump {
    Moved {
        from: SettlementPhaseStep,
        to: SettlementPhaseStep,
    },
    Unchanged {
        step: SettlementPhaseStep,
    },
}
