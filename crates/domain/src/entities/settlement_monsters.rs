//! Quarry and nemesis rosters tracked by a settlement.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{Fields, Schema, SchemaContext};

pub const CC_LEVEL2_VICTORIES: usize = 2;
pub const CC_LEVEL3_VICTORIES: usize = 3;

/// A quarry on the settlement roster with its collective cognition victories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementQuarry {
    pub name: String,
    pub node: String,
    pub unlocked: bool,
    pub cc_prologue: bool,
    pub cc_level1: bool,
    /// Exactly two victory boxes.
    pub cc_level2: Vec<bool>,
    /// Exactly three victory boxes.
    pub cc_level3: Vec<bool>,
}

impl SettlementQuarry {
    /// Number of collective cognition victories checked.
    pub fn victories(&self) -> usize {
        [self.cc_prologue, self.cc_level1]
            .iter()
            .chain(self.cc_level2.iter())
            .chain(self.cc_level3.iter())
            .filter(|won| **won)
            .count()
    }
}

impl Schema for SettlementQuarry {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Quarry", cx);
        Self {
            name: f.required_text(cx, "name", "Quarry name"),
            node: f.text(cx, "node", "Quarry node"),
            unlocked: f.boolean(cx, "unlocked", "Quarry unlocked", false),
            cc_prologue: f.boolean(cx, "ccPrologue", "Prologue victory", false),
            cc_level1: f.boolean(cx, "ccLevel1", "Level 1 victory", false),
            cc_level2: f.flags(cx, "ccLevel2", "Level 2 victories", CC_LEVEL2_VICTORIES),
            cc_level3: f.flags(cx, "ccLevel3", "Level 3 victories", CC_LEVEL3_VICTORIES),
        }
    }
}

/// A nemesis on the settlement roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementNemesis {
    pub name: String,
    pub unlocked: bool,
    pub level1: bool,
    pub level2: bool,
    pub level3: bool,
    pub cc_level1: bool,
    pub cc_level2: bool,
    pub cc_level3: bool,
}

impl Schema for SettlementNemesis {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Nemesis", cx);
        Self {
            name: f.required_text(cx, "name", "Nemesis name"),
            unlocked: f.boolean(cx, "unlocked", "Nemesis unlocked", false),
            level1: f.boolean(cx, "level1", "Level 1 encounter", false),
            level2: f.boolean(cx, "level2", "Level 2 encounter", false),
            level3: f.boolean(cx, "level3", "Level 3 encounter", false),
            cc_level1: f.boolean(cx, "ccLevel1", "Level 1 victory", false),
            cc_level2: f.boolean(cx, "ccLevel2", "Level 2 victory", false),
            cc_level3: f.boolean(cx, "ccLevel3", "Level 3 victory", false),
        }
    }
}
