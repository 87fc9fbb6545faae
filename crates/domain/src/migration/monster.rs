//! Custom monster patches.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::default_to;
use crate::entities::{HuntBoard, MonsterKind, MAX_MONSTER_LEVEL, MIN_MONSTER_LEVEL};
use crate::schema::Choice;

/// Re-keys a legacy monster list by id and patches each monster.
pub(super) fn patch_collection(campaign: &mut Map<String, Value>) {
    let Some(monsters) = campaign.get_mut("customMonsters") else {
        return;
    };
    if let Value::Array(list) = monsters {
        let mut used = HashSet::new();
        let mut keyed = Map::new();
        for (index, mut monster) in std::mem::take(list).into_iter().enumerate() {
            let key = monster
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.trim().is_empty() && !used.contains(*id))
                .map(str::to_owned)
                .unwrap_or_else(|| fallback_key(index, &used));
            if let Some(object) = monster.as_object_mut() {
                default_to(object, "id", || Value::String(key.clone()));
            }
            used.insert(key.clone());
            keyed.insert(key, monster);
        }
        *monsters = Value::Object(keyed);
    }
    if let Some(keyed) = monsters.as_object_mut() {
        for (key, monster) in keyed.iter_mut() {
            if let Some(object) = monster.as_object_mut() {
                default_to(object, "id", || Value::String(key.clone()));
                patch(object);
            }
        }
    }
}

/// `legacy-<index+1>`, bumped past keys already taken.
fn fallback_key(index: usize, used: &HashSet<String>) -> String {
    let mut suffix = index + 1;
    loop {
        let key = format!("legacy-{suffix}");
        if !used.contains(&key) {
            return key;
        }
        suffix += 1;
    }
}

fn patch(monster: &mut Map<String, Value>) {
    default_to(monster, "type", || MonsterKind::Quarry.as_str().into());
    patch_levels(monster);
    if monster.get("type").and_then(Value::as_str) == Some(MonsterKind::Quarry.as_str()) {
        default_to(monster, "huntBoard", || {
            serde_json::to_value(HuntBoard::default()).unwrap_or_default()
        });
    }
}

/// Level blocks were once stored as `level1` through `level4`.
fn patch_levels(monster: &mut Map<String, Value>) {
    let mut levels = Vec::new();
    for level in MIN_MONSTER_LEVEL..=MAX_MONSTER_LEVEL {
        if let Some(Value::Object(mut block)) = monster.remove(&format!("level{level}")) {
            block.entry("level").or_insert_with(|| Value::from(level));
            levels.push(Value::Object(block));
        }
    }
    if !levels.is_empty() && !monster.contains_key("levels") {
        monster.insert("levels".to_string(), Value::Array(levels));
    }
}
