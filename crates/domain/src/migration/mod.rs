//! Upgrades stored campaign documents to the current shape
//!
//! [`migrate`] runs before every validation, including on documents that are
//! already current, so each patch only touches fields that are still in an
//! old shape and `migrate(migrate(doc)) == migrate(doc)` holds for any input.
//! Migration never fails: whatever it cannot repair is left for the campaign
//! schema to report.

mod embark;
mod monster;
mod settlement;
mod survivor;

use serde_json::{Map, Value};

use crate::aggregates::CAMPAIGN_VERSION;

/// Optional campaign sections that older saves stored as `null`.
const OPTIONAL_SECTIONS: [&str; 4] = ["customMonsters", "hunt", "showdown", "settlementPhase"];

/// Brings a campaign document up to [`CAMPAIGN_VERSION`].
pub fn migrate(mut document: Value) -> Value {
    let Some(campaign) = document.as_object_mut() else {
        return document;
    };

    for key in OPTIONAL_SECTIONS {
        if campaign.get(key).is_some_and(Value::is_null) {
            campaign.remove(key);
        }
    }
    for key in ["settlements", "survivors"] {
        if !campaign.contains_key(key) || campaign.get(key).is_some_and(Value::is_null) {
            campaign.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }

    for_each_object(campaign.get_mut("settlements"), settlement::patch);
    for_each_object(campaign.get_mut("survivors"), survivor::patch);
    monster::patch_collection(campaign);
    if let Some(hunt) = campaign.get_mut("hunt").and_then(Value::as_object_mut) {
        embark::patch_hunt(hunt);
    }
    if let Some(showdown) = campaign.get_mut("showdown").and_then(Value::as_object_mut) {
        embark::patch_showdown(showdown);
    }

    let outdated = match campaign.get("version") {
        None => true,
        Some(version) => version.as_u64().is_some_and(|v| v < u64::from(CAMPAIGN_VERSION)),
    };
    if outdated {
        campaign.insert("version".to_string(), Value::from(CAMPAIGN_VERSION));
    }
    document
}

/// Applies `patch` to every object in a list; other values are left alone.
fn for_each_object(list: Option<&mut Value>, patch: fn(&mut Map<String, Value>)) {
    if let Some(items) = list.and_then(Value::as_array_mut) {
        items.iter_mut().filter_map(Value::as_object_mut).for_each(patch);
    }
}

/// Moves `from` to `to` unless `to` is already set; `from` is always dropped.
fn rename(object: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = object.remove(from) {
        if !object.contains_key(to) {
            object.insert(to.to_string(), value);
        }
    }
}

/// Inserts `value` under `key` when the key is missing or `null`.
fn default_to(object: &mut Map<String, Value>, key: &str, value: impl FnOnce() -> Value) {
    if object.get(key).map_or(true, Value::is_null) {
        object.insert(key.to_string(), value());
    }
}

/// Wraps a scalar in a one-element list and drops `null`.
fn scalar_to_list(object: &mut Map<String, Value>, key: &str) {
    match object.get(key) {
        Some(Value::Null) => {
            object.remove(key);
        }
        Some(Value::Array(_)) | None => {}
        Some(_) => {
            if let Some(scalar) = object.remove(key) {
                object.insert(key.to_string(), Value::Array(vec![scalar]));
            }
        }
    }
}
