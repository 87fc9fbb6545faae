//! Survivor sheet patches.

use serde_json::{Map, Value};

use super::{rename, scalar_to_list};
use crate::aggregates::survivor::MAX_KNOWLEDGE_SLOTS;

const LIST_FIELDS: [&str; 3] = ["fightingArts", "secretFightingArts", "disorders"];

pub(super) fn patch(survivor: &mut Map<String, Value>) {
    rename(survivor, "huntXp", "huntXP");
    for key in LIST_FIELDS {
        scalar_to_list(survivor, key);
    }
    patch_knowledges(survivor);
}

/// Knowledges were once two numbered slots with a rank beside each.
fn patch_knowledges(survivor: &mut Map<String, Value>) {
    let mut knowledges = Vec::new();
    for slot in 1..=MAX_KNOWLEDGE_SLOTS {
        let name = survivor.remove(&format!("knowledge{slot}"));
        let rank = survivor.remove(&format!("knowledge{slot}ObservationRank"));
        let rank_up = survivor.remove(&format!("knowledge{slot}RankUp"));

        let Some(Value::String(name)) = name else {
            continue;
        };
        if name.trim().is_empty() {
            continue;
        }
        let mut knowledge = Map::new();
        knowledge.insert("name".to_string(), Value::String(name));
        knowledge.insert(
            "observationRank".to_string(),
            rank.filter(|rank| !rank.is_null()).unwrap_or(Value::from(0)),
        );
        if let Some(rank_up) = rank_up.filter(|rank_up| !rank_up.is_null()) {
            knowledge.insert("rankUp".to_string(), rank_up);
        }
        knowledges.push(Value::Object(knowledge));
    }
    if !knowledges.is_empty() && !survivor.contains_key("knowledges") {
        survivor.insert("knowledges".to_string(), Value::Array(knowledges));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patched(survivor: Value) -> Value {
        let mut object = survivor.as_object().cloned().unwrap();
        patch(&mut object);
        Value::Object(object)
    }

    #[test]
    fn renames_hunt_xp() {
        let survivor = patched(json!({ "huntXp": 4 }));
        assert_eq!(survivor, json!({ "huntXP": 4 }));
    }

    #[test]
    fn single_arts_and_disorders_become_lists() {
        let survivor = patched(json!({
            "fightingArts": "Tough",
            "secretFightingArts": null,
            "disorders": ["Anxiety"],
        }));
        assert_eq!(survivor, json!({ "fightingArts": ["Tough"], "disorders": ["Anxiety"] }));
    }

    #[test]
    fn numbered_knowledge_slots_become_a_list() {
        let survivor = patched(json!({
            "knowledge1": "Lantern Oil",
            "knowledge1ObservationRank": 3,
            "knowledge1RankUp": 5,
            "knowledge2": "",
            "knowledge2ObservationRank": 1,
        }));
        assert_eq!(
            survivor,
            json!({
                "knowledges": [{ "name": "Lantern Oil", "observationRank": 3, "rankUp": 5 }],
            })
        );
    }

    #[test]
    fn existing_knowledges_win_over_legacy_slots() {
        let survivor = patched(json!({
            "knowledge1": "Stale",
            "knowledges": [{ "name": "Fresh", "observationRank": 0 }],
        }));
        assert_eq!(survivor["knowledges"][0]["name"], "Fresh");
        assert!(survivor.get("knowledge1").is_none());
    }
}
