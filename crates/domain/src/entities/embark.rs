//! Snapshots carried by a hunt or showdown.
//!
//! When survivors depart, the participating monsters and per-survivor token
//! overlays are copied into the embark session. They are discarded when the
//! session concludes.

use serde::Serialize;
use serde_json::Value;

use crate::entities::custom_monster::{CustomMonster, MonsterKind, MAX_MONSTER_LEVEL, MIN_MONSTER_LEVEL};
use crate::ids::SurvivorId;
use crate::schema::{Bounds, Fields, Schema, SchemaContext};

/// A monster as it stands in the current hunt or showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MonsterKind,
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
    pub wounds: u32,
    pub ai_deck_remaining: u32,
    pub traits: Vec<String>,
    pub moods: Vec<String>,
    pub knocked_down: bool,
    pub notes: String,
}

impl MonsterSnapshot {
    /// A fresh snapshot of one level of a custom monster.
    pub fn from_custom(monster: &CustomMonster, level: u32) -> Option<Self> {
        let block = monster.level(level)?;
        Some(Self {
            name: monster.name.clone(),
            kind: monster.kind(),
            level,
            accuracy: block.accuracy,
            accuracy_tokens: block.accuracy_tokens,
            damage: block.damage,
            damage_tokens: block.damage_tokens,
            evasion: block.evasion,
            evasion_tokens: block.evasion_tokens,
            luck: block.luck,
            luck_tokens: block.luck_tokens,
            movement: block.movement,
            movement_tokens: block.movement_tokens,
            speed: block.speed,
            speed_tokens: block.speed_tokens,
            strength: block.strength,
            strength_tokens: block.strength_tokens,
            toughness: block.toughness,
            wounds: 0,
            ai_deck_remaining: block.ai_deck.total(),
            traits: block.traits.clone(),
            moods: block.moods.clone(),
            knocked_down: false,
            notes: String::new(),
        })
    }
}

impl Schema for MonsterSnapshot {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Monster", cx);
        let tokens = |cx: &mut SchemaContext, key: &str, label: &str| {
            f.count(cx, key, label, Bounds::non_negative())
        };
        Self {
            name: f.required_text(cx, "name", "Monster name"),
            kind: f.choice(cx, "type", "Monster type", MonsterKind::Quarry),
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
            wounds: f.count(cx, "wounds", "Wounds", Bounds::non_negative()),
            ai_deck_remaining: tokens(cx, "aiDeckRemaining", "Remaining AI cards"),
            traits: f.strings(cx, "traits", "Traits", None),
            moods: f.strings(cx, "moods", "Moods", None),
            knocked_down: f.boolean(cx, "knockedDown", "Knocked down", false),
            notes: f.text(cx, "notes", "Notes"),
        }
    }
}

/// Token overlays shared by hunt and showdown survivor details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorTokens {
    pub accuracy_tokens: u32,
    pub evasion_tokens: u32,
    pub insanity_tokens: u32,
    pub luck_tokens: u32,
    pub movement_tokens: u32,
    pub speed_tokens: u32,
    pub strength_tokens: u32,
    pub survival_tokens: u32,
}

impl SurvivorTokens {
    fn read(f: &Fields<'_>, cx: &mut SchemaContext) -> Self {
        let mut tokens = |key: &str, label: &str| f.count(cx, key, label, Bounds::non_negative());
        Self {
            accuracy_tokens: tokens("accuracyTokens", "Accuracy tokens"),
            evasion_tokens: tokens("evasionTokens", "Evasion tokens"),
            insanity_tokens: tokens("insanityTokens", "Insanity tokens"),
            luck_tokens: tokens("luckTokens", "Luck tokens"),
            movement_tokens: tokens("movementTokens", "Movement tokens"),
            speed_tokens: tokens("speedTokens", "Speed tokens"),
            strength_tokens: tokens("strengthTokens", "Strength tokens"),
            survival_tokens: tokens("survivalTokens", "Survival tokens"),
        }
    }
}

/// Per-survivor overlay during a hunt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorHuntDetails {
    pub id: SurvivorId,
    #[serde(flatten)]
    pub tokens: SurvivorTokens,
    pub notes: String,
}

impl SurvivorHuntDetails {
    pub fn fresh(id: SurvivorId) -> Self {
        Self {
            id,
            tokens: SurvivorTokens::default(),
            notes: String::new(),
        }
    }
}

impl Schema for SurvivorHuntDetails {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Survivor details", cx);
        Self {
            id: SurvivorId::new(f.count(cx, "id", "Survivor id", Bounds::non_negative())),
            tokens: SurvivorTokens::read(&f, cx),
            notes: f.text(cx, "notes", "Notes"),
        }
    }
}

/// Per-survivor overlay during a showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorShowdownDetails {
    pub id: SurvivorId,
    #[serde(flatten)]
    pub tokens: SurvivorTokens,
    pub bleeding_tokens: u32,
    pub block_tokens: u32,
    pub deflect_tokens: u32,
    pub knocked_down: bool,
    pub priority_target: bool,
    pub notes: String,
}

impl SurvivorShowdownDetails {
    pub fn fresh(id: SurvivorId) -> Self {
        Self {
            id,
            tokens: SurvivorTokens::default(),
            bleeding_tokens: 0,
            block_tokens: 0,
            deflect_tokens: 0,
            knocked_down: false,
            priority_target: false,
            notes: String::new(),
        }
    }
}

impl From<&SurvivorHuntDetails> for SurvivorShowdownDetails {
    /// Tokens and notes gathered on the hunt carry into the showdown.
    fn from(hunt: &SurvivorHuntDetails) -> Self {
        Self {
            tokens: hunt.tokens,
            notes: hunt.notes.clone(),
            ..Self::fresh(hunt.id)
        }
    }
}

impl Schema for SurvivorShowdownDetails {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Survivor details", cx);
        Self {
            id: SurvivorId::new(f.count(cx, "id", "Survivor id", Bounds::non_negative())),
            tokens: SurvivorTokens::read(&f, cx),
            bleeding_tokens: f.count(cx, "bleedingTokens", "Bleeding tokens", Bounds::non_negative()),
            block_tokens: f.count(cx, "blockTokens", "Block tokens", Bounds::non_negative()),
            deflect_tokens: f.count(cx, "deflectTokens", "Deflect tokens", Bounds::non_negative()),
            knocked_down: f.boolean(cx, "knockedDown", "Knocked down", false),
            priority_target: f.boolean(cx, "priorityTarget", "Priority target", false),
            notes: f.text(cx, "notes", "Notes"),
        }
    }
}
