//! Showdown aggregate - the fight against the monster and its turn machine
//!
//! Control alternates between the monster and the survivors. Ending a turn
//! while an ambush is pending always hands control to the monster and
//! consumes the ambush; otherwise the turn simply passes to the other side.
//! Entering the survivors' turn clears every survivor's movement and
//! activation flags, entering the monster's turn clears its AI card flag.
//!
//! # Invariants
//!
//! - 1 to 4 distinct survivors, each with exactly one details entry
//! - the survivor turn states parallel `survivors`
//! - at least one monster snapshot

use serde::Serialize;
use serde_json::Value;

use super::hunt::Party;
use super::party::{check_details, check_monsters, check_party, read_party, read_scout};
use crate::entities::{MonsterSnapshot, SurvivorShowdownDetails};
use crate::error::DomainError;
use crate::events::TurnChange;
use crate::ids::{SettlementId, SurvivorId};
use crate::schema::{Bounds, Fields, Schema, SchemaContext};
use crate::value_objects::{
    AmbushType, ShowdownTurn, ShowdownType, SurvivorTurnState, TurnType,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Showdown {
    settlement_id: SettlementId,
    survivors: Vec<SurvivorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scout: Option<SurvivorId>,
    survivor_details: Vec<SurvivorShowdownDetails>,
    monsters: Vec<MonsterSnapshot>,
    ambush: AmbushType,
    showdown_type: ShowdownType,
    turn: ShowdownTurn,
}

/// Side that acts first for a given ambush.
pub fn opening_turn(ambush: AmbushType) -> TurnType {
    match ambush {
        AmbushType::Survivors => TurnType::Survivors,
        AmbushType::None | AmbushType::Monster => TurnType::Monster,
    }
}

impl Showdown {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Begins a showdown without a preceding hunt (e.g. a special showdown).
    pub fn begin(
        settlement_id: SettlementId,
        survivors: Vec<SurvivorId>,
        monsters: Vec<MonsterSnapshot>,
        ambush: AmbushType,
        showdown_type: ShowdownType,
    ) -> Result<Self, DomainError> {
        check_party(&survivors, "showdown")?;
        if monsters.is_empty() {
            return Err(DomainError::validation("A showdown needs at least one monster."));
        }
        Ok(Self {
            settlement_id,
            survivor_details: survivors.iter().copied().map(SurvivorShowdownDetails::fresh).collect(),
            turn: ShowdownTurn::opening(opening_turn(ambush), &survivors),
            survivors,
            scout: None,
            monsters,
            ambush,
            showdown_type,
        })
    }

    /// Begins the showdown that follows a hunt, carrying the party over.
    pub(crate) fn from_party(party: Party, ambush: AmbushType, showdown_type: ShowdownType) -> Self {
        Self {
            settlement_id: party.settlement_id,
            survivor_details: party
                .survivor_details
                .iter()
                .map(SurvivorShowdownDetails::from)
                .collect(),
            turn: ShowdownTurn::opening(opening_turn(ambush), &party.survivors),
            survivors: party.survivors,
            scout: party.scout,
            monsters: party.monsters,
            ambush,
            showdown_type,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn settlement_id(&self) -> SettlementId {
        self.settlement_id
    }

    pub fn survivors(&self) -> &[SurvivorId] {
        &self.survivors
    }

    pub fn scout(&self) -> Option<SurvivorId> {
        self.scout
    }

    pub fn survivor_details(&self) -> &[SurvivorShowdownDetails] {
        &self.survivor_details
    }

    pub fn details(&self, id: SurvivorId) -> Option<&SurvivorShowdownDetails> {
        self.survivor_details.iter().find(|details| details.id == id)
    }

    pub fn monsters(&self) -> &[MonsterSnapshot] {
        &self.monsters
    }

    pub fn ambush(&self) -> AmbushType {
        self.ambush
    }

    pub fn showdown_type(&self) -> ShowdownType {
        self.showdown_type
    }

    pub fn turn(&self) -> &ShowdownTurn {
        &self.turn
    }

    pub fn current_turn(&self) -> TurnType {
        self.turn.current_turn
    }

    pub fn includes(&self, id: SurvivorId) -> bool {
        self.survivors.contains(&id)
    }

    // =========================================================================
    // Turn machine
    // =========================================================================

    /// Ends the current turn and hands control to the next side.
    pub fn end_turn(&mut self) -> TurnChange {
        let from = self.turn.current_turn;
        let ambush_cleared = self.ambush.is_pending();
        let to = if ambush_cleared {
            self.ambush = AmbushType::None;
            TurnType::Monster
        } else {
            from.other()
        };

        self.turn.current_turn = to;
        match to {
            TurnType::Survivors => self.reset_survivor_states(),
            TurnType::Monster => self.turn.monster_state.ai_card_drawn = false,
        }

        TurnChange {
            from,
            to,
            ambush_cleared,
        }
    }

    pub fn set_movement_used(&mut self, id: SurvivorId, used: bool) -> Result<(), DomainError> {
        self.survivor_state_mut(id)?.movement_used = used;
        Ok(())
    }

    pub fn set_activation_used(&mut self, id: SurvivorId, used: bool) -> Result<(), DomainError> {
        self.survivor_state_mut(id)?.activation_used = used;
        Ok(())
    }

    pub fn set_ai_card_drawn(&mut self, drawn: bool) {
        self.turn.monster_state.ai_card_drawn = drawn;
    }

    // =========================================================================
    // Survivor details
    // =========================================================================

    pub fn set_knocked_down(&mut self, id: SurvivorId, knocked_down: bool) -> Result<(), DomainError> {
        self.details_mut(id)?.knocked_down = knocked_down;
        Ok(())
    }

    pub fn set_priority_target(&mut self, id: SurvivorId, target: bool) -> Result<(), DomainError> {
        self.details_mut(id)?.priority_target = target;
        Ok(())
    }

    pub fn details_mut(
        &mut self,
        id: SurvivorId,
    ) -> Result<&mut SurvivorShowdownDetails, DomainError> {
        self.survivor_details
            .iter_mut()
            .find(|details| details.id == id)
            .ok_or_else(|| DomainError::not_found("Survivor", id))
    }

    pub fn monster_mut(&mut self, index: usize) -> Result<&mut MonsterSnapshot, DomainError> {
        self.monsters
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("Monster", index))
    }

    fn survivor_state_mut(&mut self, id: SurvivorId) -> Result<&mut SurvivorTurnState, DomainError> {
        self.turn
            .survivor_state_mut(id)
            .ok_or_else(|| DomainError::not_found("Survivor", id))
    }

    fn reset_survivor_states(&mut self) {
        self.turn.survivor_states = self
            .survivors
            .iter()
            .copied()
            .map(SurvivorTurnState::fresh)
            .collect();
    }
}

impl Schema for Showdown {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Showdown", cx);
        let settlement_id = SettlementId::new(f.count(
            cx,
            "settlementId",
            "Settlement id",
            Bounds::non_negative(),
        ));
        let survivors = read_party(&f, cx, "showdown");
        let scout = read_scout(&f, cx, &survivors);
        let survivor_details: Vec<SurvivorShowdownDetails> =
            f.list(cx, "survivorDetails", "Survivor details");
        let detail_ids: Vec<SurvivorId> = survivor_details.iter().map(|details| details.id).collect();
        check_details(&survivors, &detail_ids, cx);
        let monsters: Vec<MonsterSnapshot> = f.list(cx, "monsters", "Monsters");
        check_monsters(monsters.len(), "showdown", cx);
        let ambush = f.choice(cx, "ambush", "Ambush", AmbushType::None);
        let showdown_type = f.choice(cx, "showdownType", "Showdown type", ShowdownType::Regular);

        let turn = match f.optional::<ShowdownTurn>(cx, "turn") {
            Some(turn) => cx.at("turn", |cx| aligned_turn(turn, &survivors, cx)),
            None => ShowdownTurn::opening(opening_turn(ambush), &survivors),
        };

        Self {
            settlement_id,
            survivors,
            scout,
            survivor_details,
            monsters,
            ambush,
            showdown_type,
            turn,
        }
    }
}

/// Orders turn states like the party, filling in members without one.
fn aligned_turn(mut turn: ShowdownTurn, survivors: &[SurvivorId], cx: &mut SchemaContext) -> ShowdownTurn {
    cx.at("survivorStates", |cx| {
        for (index, state) in turn.survivor_states.iter().enumerate() {
            if !survivors.contains(&state.id) {
                cx.at(index, |cx| {
                    cx.report_at("id", format!("Survivor {} is not part of the showdown.", state.id))
                });
            }
        }
    });
    let states = survivors
        .iter()
        .map(|id| {
            turn.survivor_state(*id)
                .copied()
                .unwrap_or_else(|| SurvivorTurnState::fresh(*id))
        })
        .collect();
    turn.survivor_states = states;
    turn
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(raw: &[u32]) -> Vec<SurvivorId> {
        raw.iter().copied().map(SurvivorId::new).collect()
    }

    fn monster() -> MonsterSnapshot {
        MonsterSnapshot::safe_parse(&json!({ "name": "White Lion", "level": 1 })).unwrap()
    }

    fn showdown(ambush: AmbushType) -> Showdown {
        Showdown::begin(
            SettlementId::new(1),
            ids(&[1, 2, 3]),
            vec![monster()],
            ambush,
            ShowdownType::Regular,
        )
        .unwrap()
    }

    fn showdown_doc(survivors: Value) -> Value {
        let details: Vec<Value> = survivors
            .as_array()
            .unwrap()
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();
        json!({
            "settlementId": 1,
            "survivors": survivors,
            "survivorDetails": details,
            "monsters": [{ "name": "White Lion", "level": 1 }],
        })
    }

    mod opening {
        use super::*;

        #[test]
        fn monster_opens_unless_survivors_ambush() {
            assert_eq!(showdown(AmbushType::None).current_turn(), TurnType::Monster);
            assert_eq!(showdown(AmbushType::Monster).current_turn(), TurnType::Monster);
            assert_eq!(showdown(AmbushType::Survivors).current_turn(), TurnType::Survivors);
        }

        #[test]
        fn begin_rejects_empty_and_oversized_parties() {
            for party in [ids(&[]), ids(&[1, 2, 3, 4, 5])] {
                let result = Showdown::begin(
                    SettlementId::new(1),
                    party,
                    vec![monster()],
                    AmbushType::None,
                    ShowdownType::Regular,
                );
                assert!(matches!(result, Err(DomainError::Validation(_))));
            }
        }

        #[test]
        fn begin_requires_a_monster() {
            let result = Showdown::begin(
                SettlementId::new(1),
                ids(&[1]),
                Vec::new(),
                AmbushType::None,
                ShowdownType::Special,
            );
            assert!(result.is_err());
        }
    }

    mod end_turn {
        use super::*;

        #[test]
        fn monster_turn_passes_to_survivors_and_resets_flags() {
            let mut showdown = showdown(AmbushType::None);
            showdown.set_movement_used(SurvivorId::new(1), true).unwrap();
            showdown.set_activation_used(SurvivorId::new(2), true).unwrap();

            let change = showdown.end_turn();

            assert_eq!(
                change,
                TurnChange {
                    from: TurnType::Monster,
                    to: TurnType::Survivors,
                    ambush_cleared: false,
                }
            );
            assert!(change.survivors_reset());
            assert_eq!(showdown.current_turn(), TurnType::Survivors);
            for state in &showdown.turn().survivor_states {
                assert!(!state.movement_used);
                assert!(!state.activation_used);
            }
        }

        #[test]
        fn monster_ambush_keeps_the_monster_turn_and_clears_ambush() {
            let mut showdown = showdown(AmbushType::Monster);
            let change = showdown.end_turn();

            assert_eq!(change.to, TurnType::Monster);
            assert!(change.ambush_cleared);
            assert_eq!(showdown.ambush(), AmbushType::None);

            // The ambush only applies once.
            assert_eq!(showdown.end_turn().to, TurnType::Survivors);
        }

        #[test]
        fn survivor_ambush_hands_control_to_the_monster() {
            let mut showdown = showdown(AmbushType::Survivors);
            let change = showdown.end_turn();
            assert_eq!(change.from, TurnType::Survivors);
            assert_eq!(change.to, TurnType::Monster);
            assert!(change.ambush_cleared);
        }

        #[test]
        fn entering_the_monster_turn_clears_the_ai_card() {
            let mut showdown = showdown(AmbushType::None);
            showdown.end_turn();
            showdown.set_ai_card_drawn(true);
            showdown.end_turn();
            assert_eq!(showdown.current_turn(), TurnType::Monster);
            assert!(!showdown.turn().monster_state.ai_card_drawn);
        }

        #[test]
        fn turns_cycle_without_end() {
            let mut showdown = showdown(AmbushType::None);
            let sides: Vec<TurnType> = (0..4).map(|_| showdown.end_turn().to).collect();
            assert_eq!(
                sides,
                vec![
                    TurnType::Survivors,
                    TurnType::Monster,
                    TurnType::Survivors,
                    TurnType::Monster,
                ]
            );
        }
    }

    mod toggles {
        use super::*;

        #[test]
        fn flags_persist_until_the_next_reset() {
            let mut showdown = showdown(AmbushType::Survivors);
            showdown.set_movement_used(SurvivorId::new(3), true).unwrap();
            let state = showdown.turn().survivor_state(SurvivorId::new(3)).unwrap();
            assert!(state.movement_used);
            assert!(!state.activation_used);
        }

        #[test]
        fn unknown_survivor_is_not_found() {
            let mut showdown = showdown(AmbushType::None);
            let err = showdown.set_activation_used(SurvivorId::new(9), true).unwrap_err();
            assert!(err.is_not_found());
            assert!(showdown.set_knocked_down(SurvivorId::new(9), true).is_err());
        }

        #[test]
        fn knock_down_and_priority_target_are_per_survivor() {
            let mut showdown = showdown(AmbushType::None);
            showdown.set_knocked_down(SurvivorId::new(2), true).unwrap();
            showdown.set_priority_target(SurvivorId::new(1), true).unwrap();
            assert!(showdown.details(SurvivorId::new(2)).unwrap().knocked_down);
            assert!(showdown.details(SurvivorId::new(1)).unwrap().priority_target);
            assert!(!showdown.details(SurvivorId::new(1)).unwrap().knocked_down);
        }
    }

    mod schema {
        use super::*;

        #[test]
        fn survivor_count_must_be_one_to_four() {
            assert!(Showdown::safe_parse(&showdown_doc(json!([]))).is_err());
            assert!(Showdown::safe_parse(&showdown_doc(json!([1, 2, 3, 4]))).is_ok());
            assert!(Showdown::safe_parse(&showdown_doc(json!([1, 2, 3, 4, 5]))).is_err());
        }

        #[test]
        fn empty_party_reports_on_survivors() {
            let issues = Showdown::safe_parse(&showdown_doc(json!([]))).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().to_string(),
                "survivors: A showdown needs at least 1 survivor."
            );
        }

        #[test]
        fn missing_turn_is_derived_from_ambush() {
            let mut doc = showdown_doc(json!([1, 2]));
            doc["ambush"] = json!("Survivors");
            let showdown = Showdown::safe_parse(&doc).unwrap();
            assert_eq!(showdown.current_turn(), TurnType::Survivors);
            assert_eq!(showdown.turn().survivor_states.len(), 2);
        }

        #[test]
        fn turn_states_are_aligned_with_the_party() {
            let mut doc = showdown_doc(json!([1, 2]));
            doc["turn"] = json!({
                "currentTurn": "Survivors",
                "survivorStates": [{ "id": 2, "movementUsed": true }],
            });
            let showdown = Showdown::safe_parse(&doc).unwrap();
            let states = &showdown.turn().survivor_states;
            assert_eq!(states[0], SurvivorTurnState::fresh(SurvivorId::new(1)));
            assert!(states[1].movement_used);

            doc["turn"]["survivorStates"] = json!([{ "id": 7 }]);
            let issues = Showdown::safe_parse(&doc).unwrap_err();
            assert_eq!(issues.iter().next().unwrap().path, "turn.survivorStates[0].id");
        }

        #[test]
        fn unknown_ambush_is_rejected() {
            let mut doc = showdown_doc(json!([1]));
            doc["ambush"] = json!("Both");
            let issues = Showdown::safe_parse(&doc).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().message,
                "Ambush must be one of None, Monster, Survivors."
            );
        }

        #[test]
        fn round_trips_after_turns() {
            let mut showdown = showdown(AmbushType::Monster);
            showdown.end_turn();
            showdown.end_turn();
            showdown.set_movement_used(SurvivorId::new(2), true).unwrap();
            let json = serde_json::to_value(&showdown).unwrap();
            assert_eq!(json["turn"]["currentTurn"], "Survivors");
            assert_eq!(Showdown::safe_parse(&json).unwrap(), showdown);
        }
    }
}
