//! User-defined quarry and nemesis monsters.
//!
//! Quarries and nemeses share their level blocks and timeline; only a
//! quarry has a hunt board, locations and collective cognition rewards.
//! The variant is stored under the `type` key.

use serde::Serialize;
use serde_json::Value;

use crate::choice_enum;
use crate::entities::settlement_records::CollectiveCognitionReward;
use crate::ids::MonsterId;
use crate::schema::{Bounds, Choice, Fields, Schema, SchemaContext};

pub const MIN_MONSTER_LEVEL: u32 = 1;
pub const MAX_MONSTER_LEVEL: u32 = 4;
pub const HUNT_BOARD_SIZE: usize = 13;
/// Starting space, mid-board overwhelming darkness and the monster's space.
pub const RESERVED_HUNT_POSITIONS: [usize; 3] = [0, 6, 12];

choice_enum! {
    pub enum MonsterKind {
        Quarry => "Quarry",
        Nemesis => "Nemesis",
    }
}

choice_enum! {
    /// Event drawn when a hunt party lands on a hunt board space.
    pub enum HuntEventType {
        Basic => "Basic",
        Monster => "Monster",
    }
}

/// AI deck composition for one monster level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDeck {
    pub basic: u32,
    pub advanced: u32,
    pub legendary: u32,
    pub overtone: u32,
}

impl AiDeck {
    /// Cards in the deck, or `None` if the counts do not fit in a `u32`.
    pub fn checked_total(&self) -> Option<u32> {
        self.basic
            .checked_add(self.advanced)?
            .checked_add(self.legendary)?
            .checked_add(self.overtone)
    }

    pub fn total(&self) -> u32 {
        self.checked_total().unwrap_or(u32::MAX)
    }
}

impl Schema for AiDeck {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "AI deck", cx);
        let deck = Self {
            basic: f.count(cx, "basic", "Basic AI cards", Bounds::non_negative()),
            advanced: f.count(cx, "advanced", "Advanced AI cards", Bounds::non_negative()),
            legendary: f.count(cx, "legendary", "Legendary AI cards", Bounds::non_negative()),
            overtone: f.count(cx, "overtone", "Overtone AI cards", Bounds::non_negative()),
        };
        if deck.checked_total().is_none() {
            cx.report(format!("AI deck may not hold more than {} cards.", u32::MAX));
        }
        deck
    }
}

/// Stat block for one level of a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterLevel {
    pub level: u32,
    pub accuracy: i32,
    pub accuracy_tokens: u32,
    pub damage: i32,
    pub damage_tokens: u32,
    pub evasion: i32,
    pub evasion_tokens: u32,
    pub luck: i32,
    pub luck_tokens: u32,
    pub movement: u32,
    pub movement_tokens: u32,
    pub speed: i32,
    pub speed_tokens: u32,
    pub strength: i32,
    pub strength_tokens: u32,
    pub toughness: u32,
    /// Nemesis life points; quarries are defeated by wounding the AI deck.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life: Option<u32>,
    pub moods: Vec<String>,
    pub traits: Vec<String>,
    pub ai_deck: AiDeck,
}

impl Schema for MonsterLevel {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Monster level", cx);
        let tokens = |cx: &mut SchemaContext, key: &str, label: &str| {
            f.count(cx, key, label, Bounds::non_negative())
        };
        Self {
            level: f.count(
                cx,
                "level",
                "Monster level",
                Bounds::range(MIN_MONSTER_LEVEL, MAX_MONSTER_LEVEL),
            ),
            accuracy: f.signed(cx, "accuracy", "Accuracy"),
            accuracy_tokens: tokens(cx, "accuracyTokens", "Accuracy tokens"),
            damage: f.signed(cx, "damage", "Damage"),
            damage_tokens: tokens(cx, "damageTokens", "Damage tokens"),
            evasion: f.signed(cx, "evasion", "Evasion"),
            evasion_tokens: tokens(cx, "evasionTokens", "Evasion tokens"),
            luck: f.signed(cx, "luck", "Luck"),
            luck_tokens: tokens(cx, "luckTokens", "Luck tokens"),
            movement: f.count(cx, "movement", "Movement", Bounds::at_least(1)),
            movement_tokens: tokens(cx, "movementTokens", "Movement tokens"),
            speed: f.signed(cx, "speed", "Speed"),
            speed_tokens: tokens(cx, "speedTokens", "Speed tokens"),
            strength: f.signed(cx, "strength", "Strength"),
            strength_tokens: tokens(cx, "strengthTokens", "Strength tokens"),
            toughness: f.count(cx, "toughness", "Toughness", Bounds::non_negative()),
            life: f.optional_count(cx, "life", "Life", Bounds::non_negative()),
            moods: f.strings(cx, "moods", "Moods", None),
            traits: f.strings(cx, "traits", "Traits", None),
            ai_deck: f.nested(cx, "aiDeck"),
        }
    }
}

/// Thirteen hunt board spaces; reserved spaces never hold an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HuntBoard(Vec<Option<HuntEventType>>);

impl HuntBoard {
    pub fn is_reserved(position: usize) -> bool {
        RESERVED_HUNT_POSITIONS.contains(&position)
    }

    pub fn event_at(&self, position: usize) -> Option<HuntEventType> {
        self.0.get(position).copied().flatten()
    }
}

impl Default for HuntBoard {
    fn default() -> Self {
        Self(
            (0..HUNT_BOARD_SIZE)
                .map(|position| (!Self::is_reserved(position)).then_some(HuntEventType::Basic))
                .collect(),
        )
    }
}

impl Schema for HuntBoard {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let Some(spaces) = value.as_array() else {
            cx.report(format!("Hunt board must be a list of {HUNT_BOARD_SIZE} spaces."));
            return Self::default();
        };
        if spaces.len() != HUNT_BOARD_SIZE {
            cx.report(format!("Hunt board must have exactly {HUNT_BOARD_SIZE} spaces."));
        }
        let mut board = Self(vec![None; HUNT_BOARD_SIZE]);
        for (position, space) in spaces.iter().enumerate().take(HUNT_BOARD_SIZE) {
            if space.is_null() {
                continue;
            }
            cx.at(position, |cx| {
                if Self::is_reserved(position) {
                    cx.report(format!("Hunt board position {position} is reserved."));
                    return;
                }
                match space.as_str().and_then(HuntEventType::from_stored) {
                    Some(event) => board.0[position] = Some(event),
                    None => cx.report(format!(
                        "Hunt board spaces must be empty or one of {}.",
                        HuntEventType::listing()
                    )),
                }
            });
        }
        board
    }
}

/// A lantern year event the monster adds to the settlement timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterTimelineEntry {
    pub year: u32,
    pub event: String,
}

impl Schema for MonsterTimelineEntry {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Timeline entry", cx);
        Self {
            year: f.count(cx, "year", "Timeline year", Bounds::non_negative()),
            event: f.required_text(cx, "event", "Timeline event"),
        }
    }
}

/// Quarry-only parts of a custom monster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarryDetails {
    pub hunt_board: HuntBoard,
    pub locations: Vec<String>,
    pub cc_rewards: Vec<CollectiveCognitionReward>,
}

/// Quarry or nemesis, stored under the `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MonsterVariant {
    Quarry(QuarryDetails),
    Nemesis,
}

impl MonsterVariant {
    pub fn kind(&self) -> MonsterKind {
        match self {
            Self::Quarry(_) => MonsterKind::Quarry,
            Self::Nemesis => MonsterKind::Nemesis,
        }
    }
}

/// A monster defined by the user, keyed by a generated id in the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMonster {
    pub id: MonsterId,
    pub name: String,
    pub node: String,
    #[serde(flatten)]
    pub variant: MonsterVariant,
    pub levels: Vec<MonsterLevel>,
    pub timeline: Vec<MonsterTimelineEntry>,
}

impl CustomMonster {
    pub fn kind(&self) -> MonsterKind {
        self.variant.kind()
    }

    pub fn level(&self, level: u32) -> Option<&MonsterLevel> {
        self.levels.iter().find(|block| block.level == level)
    }

    pub fn quarry(&self) -> Option<&QuarryDetails> {
        match &self.variant {
            MonsterVariant::Quarry(details) => Some(details),
            MonsterVariant::Nemesis => None,
        }
    }
}

const QUARRY_ONLY_KEYS: [(&str, &str); 3] = [
    ("huntBoard", "hunt board"),
    ("locations", "locations"),
    ("ccRewards", "collective cognition rewards"),
];

impl Schema for CustomMonster {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Monster", cx);
        let id = MonsterId::from(f.required_text(cx, "id", "Monster id"));
        let name = f.required_text(cx, "name", "Monster name");
        let node = f.text(cx, "node", "Monster node");
        let kind = f.choice(cx, "type", "Monster type", MonsterKind::Quarry);

        let variant = match kind {
            MonsterKind::Quarry => MonsterVariant::Quarry(QuarryDetails {
                hunt_board: match f.get("huntBoard") {
                    Some(board) => cx.at("huntBoard", |cx| HuntBoard::parse(board, cx)),
                    None => HuntBoard::default(),
                },
                locations: f.strings(cx, "locations", "Monster locations", None),
                cc_rewards: f.list(cx, "ccRewards", "Collective cognition rewards"),
            }),
            MonsterKind::Nemesis => {
                for (key, label) in QUARRY_ONLY_KEYS {
                    if f.has(key) {
                        cx.report_at(key, format!("Only quarries have {label}."));
                    }
                }
                MonsterVariant::Nemesis
            }
        };

        let levels: Vec<MonsterLevel> = f.list(cx, "levels", "Monster levels");
        cx.at("levels", |cx| check_levels(&levels, cx));

        Self {
            id,
            name,
            node,
            variant,
            levels,
            timeline: f.list(cx, "timeline", "Monster timeline"),
        }
    }
}

fn check_levels(levels: &[MonsterLevel], cx: &mut SchemaContext) {
    if levels.is_empty() {
        cx.report("Monster must define at least one level.");
    }
    if levels.len() > MAX_MONSTER_LEVEL as usize {
        cx.report(format!(
            "Monster may not define more than {MAX_MONSTER_LEVEL} levels."
        ));
    }
    for (index, block) in levels.iter().enumerate() {
        if levels[..index].iter().any(|earlier| earlier.level == block.level) {
            cx.at(index, |cx| {
                cx.report_at("level", format!("Level {} is defined twice.", block.level))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quarry() -> Value {
        json!({
            "id": "0b8f6a56-4d0c-4f6b-9b43-1f7f4d1f9d11",
            "name": "Gorm",
            "node": "NQ2",
            "type": "Quarry",
            "levels": [
                { "level": 1, "movement": 6, "toughness": 9, "aiDeck": { "basic": 7, "advanced": 3 } },
                { "level": 2, "movement": 6, "toughness": 12, "aiDeck": { "basic": 8, "advanced": 5 } },
            ],
            "timeline": [{ "year": 1, "event": "Gorm's Landing" }],
        })
    }

    #[test]
    fn quarry_gets_default_hunt_board() {
        let monster = CustomMonster::safe_parse(&quarry()).unwrap();
        let board = &monster.quarry().unwrap().hunt_board;
        assert_eq!(board.event_at(0), None);
        assert_eq!(board.event_at(1), Some(HuntEventType::Basic));
        assert_eq!(board.event_at(6), None);
        assert_eq!(board.event_at(12), None);
        assert_eq!(monster.level(2).unwrap().ai_deck.total(), 13);
    }

    #[test]
    fn reserved_hunt_board_positions_must_stay_empty() {
        let mut doc = quarry();
        let mut board = vec![Value::Null; HUNT_BOARD_SIZE];
        board[6] = json!("Monster");
        doc["huntBoard"] = Value::Array(board);

        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.path, "huntBoard[6]");
        assert_eq!(issue.message, "Hunt board position 6 is reserved.");
    }

    #[test]
    fn nemesis_may_not_carry_quarry_fields() {
        let mut doc = quarry();
        doc["type"] = json!("Nemesis");
        doc["locations"] = json!(["Gorm Climate"]);

        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        assert_eq!(
            issues.iter().next().unwrap().to_string(),
            "locations: Only quarries have locations."
        );
    }

    #[test]
    fn levels_must_be_present_distinct_and_in_range() {
        let mut doc = quarry();
        doc["levels"] = json!([]);
        assert!(CustomMonster::safe_parse(&doc).unwrap_err().touches("levels"));

        doc["levels"] = json!([{ "level": 2 }, { "level": 2 }]);
        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        assert_eq!(issues.iter().next().unwrap().path, "levels[1].level");

        doc["levels"] = json!([{ "level": 5 }]);
        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        assert_eq!(
            issues.iter().next().unwrap().message,
            "Monster level may not exceed 4."
        );
    }

    #[test]
    fn ai_deck_counts_may_not_be_negative() {
        let mut doc = quarry();
        doc["levels"][0]["aiDeck"]["legendary"] = json!(-2);
        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        assert_eq!(issues.iter().next().unwrap().path, "levels[0].aiDeck.legendary");
    }

    #[test]
    fn ai_deck_total_must_fit_in_a_count() {
        let mut doc = quarry();
        doc["levels"][0]["aiDeck"] = json!({ "basic": u32::MAX, "advanced": 1 });
        let issues = CustomMonster::safe_parse(&doc).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.path, "levels[0].aiDeck");
        assert_eq!(issue.message, "AI deck may not hold more than 4294967295 cards.");

        let deck = AiDeck {
            basic: u32::MAX,
            advanced: 1,
            ..AiDeck::default()
        };
        assert_eq!(deck.checked_total(), None);
        assert_eq!(deck.total(), u32::MAX);
    }

    #[test]
    fn serializes_variant_under_type_key() {
        let monster = CustomMonster::safe_parse(&quarry()).unwrap();
        let json = serde_json::to_value(&monster).unwrap();
        assert_eq!(json["type"], "Quarry");
        assert_eq!(json["huntBoard"].as_array().unwrap().len(), HUNT_BOARD_SIZE);
        assert_eq!(CustomMonster::safe_parse(&json).unwrap(), monster);
    }
}
