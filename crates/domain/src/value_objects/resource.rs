//! Settlement storage resources.

use serde::Serialize;
use serde_json::Value;

use crate::choice_enum;
use crate::schema::{Bounds, Fields, Schema, SchemaContext};

choice_enum! {
    /// Deck a resource card comes from.
    pub enum ResourceCategory {
        Basic => "Basic",
        Monster => "Monster",
        Strange => "Strange",
        Vermin => "Vermin",
    }
}

choice_enum! {
    /// Keyword printed on a resource card.
    pub enum ResourceType {
        Bone => "Bone",
        Consumable => "Consumable",
        Hide => "Hide",
        Herb => "Herb",
        Iron => "Iron",
        Organ => "Organ",
        Scrap => "Scrap",
    }
}

/// A stack of identical resources in settlement storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    pub category: ResourceCategory,
    /// At least one keyword.
    pub types: Vec<ResourceType>,
    pub amount: u32,
}

impl Schema for Resource {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Resource", cx);
        let name = f.required_text(cx, "name", "Resource name");
        let category = f.choice(cx, "category", "Resource category", ResourceCategory::Basic);
        let types = parse_types(&f, cx);
        let amount = f.count(cx, "amount", "Resource amount", Bounds::non_negative());
        Self {
            name,
            category,
            types,
            amount,
        }
    }
}

fn parse_types(f: &Fields<'_>, cx: &mut SchemaContext) -> Vec<ResourceType> {
    let names = f.strings(cx, "types", "Resource types", None);
    cx.at("types", |cx| {
        if names.is_empty() {
            cx.report("Resource types must include at least one type.");
        }
        names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let parsed = name.parse::<ResourceType>().ok();
                if parsed.is_none() {
                    cx.at(index, |cx| {
                        cx.report(format!(
                            "Resource type must be one of {}.",
                            <ResourceType as crate::schema::Choice>::listing()
                        ))
                    });
                }
                parsed
            })
            .collect()
    })
}
