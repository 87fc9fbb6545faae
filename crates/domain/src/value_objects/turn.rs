//! Showdown turn bookkeeping.

use serde::Serialize;
use serde_json::Value;

use crate::choice_enum;
use crate::ids::SurvivorId;
use crate::schema::{Bounds, Fields, Schema, SchemaContext};

choice_enum! {
    /// Side currently acting in a showdown.
    pub enum TurnType {
        Monster => "Monster",
        Survivors => "Survivors",
    }
}

impl TurnType {
    pub fn other(&self) -> Self {
        match self {
            Self::Monster => Self::Survivors,
            Self::Survivors => Self::Monster,
        }
    }
}

impl Default for TurnType {
    fn default() -> Self {
        Self::Monster
    }
}

choice_enum! {
    /// Which side, if any, ambushed the other at the start of the showdown.
    pub enum AmbushType {
        None => "None",
        Monster => "Monster",
        Survivors => "Survivors",
    }
}

impl AmbushType {
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Default for AmbushType {
    fn default() -> Self {
        Self::None
    }
}

choice_enum! {
    pub enum ShowdownType {
        Regular => "Regular",
        Special => "Special",
    }
}

impl Default for ShowdownType {
    fn default() -> Self {
        Self::Regular
    }
}

/// Per-survivor action flags for the current survivors' turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorTurnState {
    pub id: SurvivorId,
    pub movement_used: bool,
    pub activation_used: bool,
}

impl SurvivorTurnState {
    pub fn fresh(id: SurvivorId) -> Self {
        Self {
            id,
            movement_used: false,
            activation_used: false,
        }
    }
}

impl Schema for SurvivorTurnState {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Survivor turn state", cx);
        Self {
            id: SurvivorId::new(f.count(cx, "id", "Survivor id", Bounds::non_negative())),
            movement_used: f.boolean(cx, "movementUsed", "Movement used", false),
            activation_used: f.boolean(cx, "activationUsed", "Activation used", false),
        }
    }
}

/// Monster action flags for the current monster turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterTurnState {
    pub ai_card_drawn: bool,
}

impl Schema for MonsterTurnState {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Monster turn state", cx);
        Self {
            ai_card_drawn: f.boolean(cx, "aiCardDrawn", "AI card drawn", false),
        }
    }
}

/// Whose turn it is and what each participant has done this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownTurn {
    pub current_turn: TurnType,
    pub survivor_states: Vec<SurvivorTurnState>,
    pub monster_state: MonsterTurnState,
}

impl ShowdownTurn {
    /// Turn opening on `current_turn` with every flag cleared.
    pub fn opening(current_turn: TurnType, survivors: &[SurvivorId]) -> Self {
        Self {
            current_turn,
            survivor_states: survivors.iter().copied().map(SurvivorTurnState::fresh).collect(),
            monster_state: MonsterTurnState::default(),
        }
    }

    pub fn survivor_state(&self, id: SurvivorId) -> Option<&SurvivorTurnState> {
        self.survivor_states.iter().find(|state| state.id == id)
    }

    pub(crate) fn survivor_state_mut(&mut self, id: SurvivorId) -> Option<&mut SurvivorTurnState> {
        self.survivor_states.iter_mut().find(|state| state.id == id)
    }
}

impl Schema for ShowdownTurn {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Turn", cx);
        Self {
            current_turn: f.choice(cx, "currentTurn", "Current turn", TurnType::Monster),
            survivor_states: f.list(cx, "survivorStates", "Survivor turn states"),
            monster_state: f.nested(cx, "monsterState"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_turn_defaults_to_monster_with_no_flags() {
        let turn = ShowdownTurn::safe_parse(&json!({})).unwrap();
        assert_eq!(turn.current_turn, TurnType::Monster);
        assert!(turn.survivor_states.is_empty());
        assert!(!turn.monster_state.ai_card_drawn);
    }

    #[test]
    fn unknown_turn_value_is_reported() {
        let issues = ShowdownTurn::safe_parse(&json!({ "currentTurn": "Villagers" })).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.path, "currentTurn");
        assert_eq!(issue.message, "Current turn must be one of Monster, Survivors.");
    }

    #[test]
    fn opening_turn_has_a_fresh_state_per_survivor() {
        let ids = [SurvivorId::new(1), SurvivorId::new(4)];
        let turn = ShowdownTurn::opening(TurnType::Survivors, &ids);
        assert_eq!(turn.survivor_states.len(), 2);
        assert_eq!(
            turn.survivor_state(SurvivorId::new(4)),
            Some(&SurvivorTurnState::fresh(SurvivorId::new(4)))
        );
    }

    #[test]
    fn other_alternates_sides() {
        assert_eq!(TurnType::Monster.other(), TurnType::Survivors);
        assert_eq!(TurnType::Survivors.other(), TurnType::Monster);
    }
}
