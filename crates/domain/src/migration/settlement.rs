//! Settlement sheet patches.

use serde_json::{Map, Value};

use super::{default_to, rename};
use crate::entities::{CC_LEVEL2_VICTORIES, CC_LEVEL3_VICTORIES};
use crate::schema::Choice;
use crate::value_objects::{CampaignType, SurvivorType};

pub(super) fn patch(settlement: &mut Map<String, Value>) {
    rename(settlement, "lostSettlementCount", "lostSettlements");
    rename(settlement, "collectiveCognition", "ccValue");

    default_to(settlement, "survivorType", || SurvivorType::Core.as_str().into());
    default_to(settlement, "campaignType", || {
        CampaignType::PeopleOfTheLantern.as_str().into()
    });
    let squires = settlement.get("campaignType").and_then(Value::as_str)
        == Some(CampaignType::SquiresOfTheCitadel.as_str());
    if squires {
        default_to(settlement, "suspicions", || Value::Array(Vec::new()));
    }

    if let Some(years) = settlement.get_mut("timeline").and_then(Value::as_array_mut) {
        years.iter_mut().for_each(patch_year);
    }
    if let Some(resources) = settlement.get_mut("resources").and_then(Value::as_array_mut) {
        for resource in resources.iter_mut().filter_map(Value::as_object_mut) {
            patch_resource(resource);
        }
    }
    if let Some(quarries) = settlement.get_mut("quarries").and_then(Value::as_array_mut) {
        for quarry in quarries.iter_mut().filter_map(Value::as_object_mut) {
            expand_flags(quarry, "ccLevel2", CC_LEVEL2_VICTORIES);
            expand_flags(quarry, "ccLevel3", CC_LEVEL3_VICTORIES);
        }
    }
}

/// Years were once bare entry lists, and entries once a single string.
fn patch_year(year: &mut Value) {
    match year {
        Value::Array(_) | Value::String(_) => {
            let entries = match std::mem::take(year) {
                Value::String(entry) => vec![Value::String(entry)],
                Value::Array(entries) => entries,
                _ => Vec::new(),
            };
            let mut patched = Map::new();
            patched.insert("completed".to_string(), Value::Bool(false));
            patched.insert("entries".to_string(), Value::Array(entries));
            *year = Value::Object(patched);
        }
        Value::Object(fields) => {
            if let Some(Value::String(_)) = fields.get("entries") {
                if let Some(entry) = fields.remove("entries") {
                    fields.insert("entries".to_string(), Value::Array(vec![entry]));
                }
            }
        }
        _ => {}
    }
}

/// Resources carried one `type` before they could have several.
fn patch_resource(resource: &mut Map<String, Value>) {
    let Some(legacy) = resource.remove("type") else {
        return;
    };
    if resource.contains_key("types") {
        return;
    }
    let types = match legacy {
        Value::Array(types) => types,
        Value::Null => return,
        single => vec![single],
    };
    resource.insert("types".to_string(), Value::Array(types));
}

/// A single checkbox becomes the first of `len` victory boxes.
fn expand_flags(quarry: &mut Map<String, Value>, key: &str, len: usize) {
    if let Some(&Value::Bool(checked)) = quarry.get(key) {
        let mut flags = vec![Value::Bool(false); len];
        if let Some(first) = flags.first_mut() {
            *first = Value::Bool(checked);
        }
        quarry.insert(key.to_string(), Value::Array(flags));
    }
}
