//! SettlementPhase aggregate - progress through the settlement phase board
//!
//! Steps follow the canonical order when advanced, but any step may be
//! selected directly; the board does not enforce linear progression.

use serde::Serialize;
use serde_json::Value;

use crate::error::DomainError;
use crate::events::{PhaseAdvance, PhaseJump};
use crate::ids::{SettlementId, SurvivorId};
use crate::schema::{Bounds, Choice, Fields, Schema, SchemaContext};
use crate::value_objects::SettlementPhaseStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPhase {
    settlement_id: SettlementId,
    step: SettlementPhaseStep,
    returning_survivors: Vec<SurvivorId>,
    endeavors: u32,
}

impl SettlementPhase {
    /// Phase opened by survivors coming home from a showdown.
    pub fn after_showdown(settlement_id: SettlementId, returning_survivors: Vec<SurvivorId>) -> Self {
        Self {
            settlement_id,
            step: SettlementPhaseStep::SurvivorsReturn,
            returning_survivors,
            endeavors: 0,
        }
    }

    /// Phase opened without a showdown, such as the first lantern year.
    pub fn starting(settlement_id: SettlementId) -> Self {
        Self {
            settlement_id,
            step: SettlementPhaseStep::SetUpSettlement,
            returning_survivors: Vec::new(),
            endeavors: 0,
        }
    }

    pub fn settlement_id(&self) -> SettlementId {
        self.settlement_id
    }

    pub fn step(&self) -> SettlementPhaseStep {
        self.step
    }

    pub fn returning_survivors(&self) -> &[SurvivorId] {
        &self.returning_survivors
    }

    pub fn endeavors(&self) -> u32 {
        self.endeavors
    }

    pub fn is_complete(&self) -> bool {
        self.step.is_final()
    }

    /// Moves to the next step in canonical order.
    pub fn advance(&mut self) -> PhaseAdvance {
        match self.step.next() {
            Some(to) => {
                let from = std::mem::replace(&mut self.step, to);
                PhaseAdvance::Moved { from, to }
            }
            None => PhaseAdvance::AlreadyFinal,
        }
    }

    /// Selects any step directly.
    pub fn jump_to(&mut self, step: SettlementPhaseStep) -> PhaseJump {
        if step == self.step {
            return PhaseJump::Unchanged { step };
        }
        let from = std::mem::replace(&mut self.step, step);
        PhaseJump::Moved { from, to: step }
    }

    /// Selects the step at a board position.
    pub fn jump_to_position(&mut self, position: usize) -> Result<PhaseJump, DomainError> {
        let step = SettlementPhaseStep::from_position(position).ok_or_else(|| {
            DomainError::validation(format!(
                "Settlement phase position must be between 0 and {}.",
                SettlementPhaseStep::ALL.len() - 1
            ))
        })?;
        Ok(self.jump_to(step))
    }

    pub fn gain_endeavors(&mut self, amount: u32) {
        self.endeavors = self.endeavors.saturating_add(amount);
    }

    pub fn spend_endeavors(&mut self, amount: u32) -> Result<u32, DomainError> {
        let available = self.endeavors;
        let remaining = available.checked_sub(amount).ok_or_else(|| {
            DomainError::constraint(format!(
                "Cannot spend {amount} endeavors; only {available} available."
            ))
        })?;
        self.endeavors = remaining;
        Ok(remaining)
    }
}

impl Schema for SettlementPhase {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Settlement phase", cx);
        Self {
            settlement_id: SettlementId::new(f.count(
                cx,
                "settlementId",
                "Settlement id",
                Bounds::non_negative(),
            )),
            step: f.choice(cx, "step", "Settlement phase step", SettlementPhaseStep::SetUpSettlement),
            returning_survivors: f
                .numbers(cx, "returningSurvivors", "Returning survivors")
                .into_iter()
                .map(SurvivorId::new)
                .collect(),
            endeavors: f.count(cx, "endeavors", "Endeavors", Bounds::non_negative()),
        }
    }
}
