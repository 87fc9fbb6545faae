//! Hunt and showdown patches.
//!
//! Older sessions tracked a single monster and kept no per-survivor details.

use serde_json::{json, Map, Value};

use super::default_to;
use crate::aggregates::opening_turn;
use crate::ids::SurvivorId;
use crate::schema::Choice;
use crate::value_objects::{AmbushType, ShowdownTurn};

pub(super) fn patch_hunt(hunt: &mut Map<String, Value>) {
    patch_party(hunt);
}

pub(super) fn patch_showdown(showdown: &mut Map<String, Value>) {
    patch_party(showdown);
    default_to(showdown, "ambush", || AmbushType::None.as_str().into());

    if showdown.contains_key("turn") {
        return;
    }
    let Some(survivors) = party(showdown) else {
        return;
    };
    let ambush = showdown
        .get("ambush")
        .and_then(Value::as_str)
        .and_then(AmbushType::from_stored)
        .unwrap_or(AmbushType::None);
    let turn = ShowdownTurn::opening(opening_turn(ambush), &survivors);
    if let Ok(turn) = serde_json::to_value(turn) {
        showdown.insert("turn".to_string(), turn);
    }
}

fn patch_party(session: &mut Map<String, Value>) {
    if let Some(monster) = session.remove("monster") {
        if !monster.is_null() && !session.contains_key("monsters") {
            session.insert("monsters".to_string(), Value::Array(vec![monster]));
        }
    }
    if session.contains_key("survivorDetails") {
        return;
    }
    if let Some(survivors) = party(session) {
        let details = survivors.iter().map(|id| json!({ "id": id })).collect();
        session.insert("survivorDetails".to_string(), Value::Array(details));
    }
}

/// Survivor ids of the party, when the list is readable at all.
fn party(session: &Map<String, Value>) -> Option<Vec<SurvivorId>> {
    let ids = session.get("survivors")?.as_array()?;
    Some(
        ids.iter()
            .filter_map(Value::as_u64)
            .filter_map(|id| u32::try_from(id).ok())
            .map(SurvivorId::new)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn single_monster_becomes_a_list() {
        let mut hunt = object(json!({ "survivors": [1, 2], "monster": { "name": "White Lion" } }));
        patch_hunt(&mut hunt);
        assert_eq!(hunt["monsters"], json!([{ "name": "White Lion" }]));
        assert!(!hunt.contains_key("monster"));
        assert_eq!(hunt["survivorDetails"], json!([{ "id": 1 }, { "id": 2 }]));
    }

    #[test]
    fn showdown_gains_ambush_and_opening_turn() {
        let mut showdown = object(json!({ "survivors": [3] }));
        patch_showdown(&mut showdown);
        assert_eq!(showdown["ambush"], "None");
        assert_eq!(
            showdown["turn"],
            json!({
                "currentTurn": "Monster",
                "survivorStates": [{ "id": 3, "movementUsed": false, "activationUsed": false }],
                "monsterState": { "aiCardDrawn": false },
            })
        );
    }

    #[test]
    fn survivor_ambush_opens_on_the_survivors_turn() {
        let mut showdown = object(json!({ "survivors": [3], "ambush": "Survivors" }));
        patch_showdown(&mut showdown);
        assert_eq!(showdown["turn"]["currentTurn"], "Survivors");
    }

    #[test]
    fn existing_details_and_turn_are_kept() {
        let mut showdown = object(json!({
            "survivors": [3],
            "survivorDetails": [],
            "turn": { "currentTurn": "Survivors" },
        }));
        patch_showdown(&mut showdown);
        assert_eq!(showdown["survivorDetails"], json!([]));
        assert_eq!(showdown["turn"], json!({ "currentTurn": "Survivors" }));
    }
}
