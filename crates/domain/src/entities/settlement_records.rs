//! Small records kept on a settlement sheet.
//!
//! Each record is its own schema so a single row can be validated when it
//! is edited, and again as part of the whole settlement.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{Bounds, Fields, Schema, SchemaContext};

/// One lantern year on the settlement timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineYear {
    pub completed: bool,
    pub entries: Vec<String>,
}

impl Schema for TimelineYear {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Timeline year", cx);
        Self {
            completed: f.boolean(cx, "completed", "Year completed", false),
            entries: f.strings(cx, "entries", "Timeline entries", None),
        }
    }
}

/// A milestone story event and whether it has triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    pub event: String,
    pub complete: bool,
}

impl Schema for Milestone {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Milestone", cx);
        Self {
            name: f.required_text(cx, "name", "Milestone name"),
            event: f.text(cx, "event", "Milestone event"),
            complete: f.boolean(cx, "complete", "Milestone complete", false),
        }
    }
}

/// A settlement principle with its two mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principle {
    pub name: String,
    pub option1_name: String,
    pub option1_selected: bool,
    pub option2_name: String,
    pub option2_selected: bool,
}

impl Principle {
    /// Name of the chosen option, if one has been chosen.
    pub fn selection(&self) -> Option<&str> {
        match (self.option1_selected, self.option2_selected) {
            (true, false) => Some(&self.option1_name),
            (false, true) => Some(&self.option2_name),
            _ => None,
        }
    }
}

impl Schema for Principle {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Principle", cx);
        let principle = Self {
            name: f.required_text(cx, "name", "Principle name"),
            option1_name: f.required_text(cx, "option1Name", "First option name"),
            option1_selected: f.boolean(cx, "option1Selected", "First option selected", false),
            option2_name: f.required_text(cx, "option2Name", "Second option name"),
            option2_selected: f.boolean(cx, "option2Selected", "Second option selected", false),
        };
        if principle.option1_selected && principle.option2_selected {
            cx.report_at(
                "option2Selected",
                "Only one option of a principle may be selected.",
            );
        }
        principle
    }
}

/// A settlement location and whether it has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLocation {
    pub name: String,
    pub unlocked: bool,
}

impl Schema for SettlementLocation {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Location", cx);
        Self {
            name: f.required_text(cx, "name", "Location name"),
            unlocked: f.boolean(cx, "unlocked", "Location unlocked", false),
        }
    }
}

/// Arc: a knowledge the settlement has discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementKnowledge {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
}

impl Schema for SettlementKnowledge {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Knowledge", cx);
        Self {
            name: f.required_text(cx, "name", "Knowledge name"),
            philosophy: f.optional_text(cx, "philosophy", "Knowledge philosophy"),
        }
    }
}

/// Arc: reward unlocked once collective cognition reaches `cc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveCognitionReward {
    pub cc: u32,
    pub name: String,
    pub unlocked: bool,
}

impl Schema for CollectiveCognitionReward {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Collective cognition reward", cx);
        Self {
            cc: f.count(cx, "cc", "Collective cognition target", Bounds::non_negative()),
            name: f.required_text(cx, "name", "Reward name"),
            unlocked: f.boolean(cx, "unlocked", "Reward unlocked", false),
        }
    }
}

/// Squires of the Citadel: suspicion levels gathered against one squire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suspicion {
    pub name: String,
    pub level1: bool,
    pub level2: bool,
    pub level3: bool,
    pub level4: bool,
}

impl Suspicion {
    /// Highest suspicion level reached, 0 when none.
    pub fn level(&self) -> u8 {
        [self.level1, self.level2, self.level3, self.level4]
            .iter()
            .rposition(|reached| *reached)
            .map_or(0, |index| index as u8 + 1)
    }
}

impl Schema for Suspicion {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Suspicion", cx);
        Self {
            name: f.required_text(cx, "name", "Suspicion name"),
            level1: f.boolean(cx, "level1", "Suspicion level 1", false),
            level2: f.boolean(cx, "level2", "Suspicion level 2", false),
            level3: f.boolean(cx, "level3", "Suspicion level 3", false),
            level4: f.boolean(cx, "level4", "Suspicion level 4", false),
        }
    }
}
