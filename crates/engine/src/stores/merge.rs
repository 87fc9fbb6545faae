//! Key-by-key merging of partial updates into stored entities.

use serde_json::Value;

/// Merges `patch` into `target`.
///
/// Objects merge recursively, a `null` removes the key, and anything else
/// (lists included) replaces the target value outright.
pub fn merge(target: &mut Value, patch: &Value) {
    let Value::Object(changes) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Value::Object(fields) = target else {
        return;
    };
    for (key, change) in changes {
        if change.is_null() {
            fields.remove(key);
            continue;
        }
        let nested = change.is_object() && fields.get(key).is_some_and(Value::is_object);
        match fields.get_mut(key) {
            Some(existing) if nested => merge(existing, change),
            _ => {
                fields.insert(key.clone(), change.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_lists_are_replaced() {
        let mut target = json!({
            "name": "Allister",
            "severeInjuries": { "brokenArm": 1, "blind": 0 },
            "fightingArts": ["Tough", "Berserker"],
        });
        merge(
            &mut target,
            &json!({ "severeInjuries": { "blind": 1 }, "fightingArts": ["Crazed"] }),
        );
        assert_eq!(
            target,
            json!({
                "name": "Allister",
                "severeInjuries": { "brokenArm": 1, "blind": 1 },
                "fightingArts": ["Crazed"],
            })
        );
    }

    #[test]
    fn null_removes_a_key() {
        let mut target = json!({ "philosophy": "Ammonia", "name": "Zachary" });
        merge(&mut target, &json!({ "philosophy": null }));
        assert_eq!(target, json!({ "name": "Zachary" }));
    }

    #[test]
    fn scalars_replace_objects() {
        let mut target = json!({ "turn": { "currentTurn": "Monster" } });
        merge(&mut target, &json!({ "turn": 3 }));
        assert_eq!(target, json!({ "turn": 3 }));
    }
}
