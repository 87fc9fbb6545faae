//! Survivor aggregate - one survivor sheet
//!
//! The survivor schema depends on the owning settlement's survivor type:
//! Arc survivors may hold one fighting art and one secret fighting art,
//! Core survivors up to three combined. [`Schema::parse`] applies the Core
//! rules; the campaign parses each survivor with [`Survivor::parse_with`].

use serde::Serialize;
use serde_json::Value;

use crate::choice_enum;
use crate::entities::SevereInjuries;
use crate::error::DomainError;
use crate::ids::{SettlementId, SurvivorId};
use crate::schema::{Bounds, Fields, Schema, SchemaContext};
use crate::value_objects::SurvivorType;

pub const MAX_HUNT_XP: u32 = 16;
pub const MAX_COURAGE: u32 = 9;
pub const MAX_UNDERSTANDING: u32 = 9;
pub const MAX_WEAPON_PROFICIENCY: u32 = 8;
pub const MAX_DISORDERS: usize = 3;
pub const MAX_CORE_FIGHTING_ARTS: usize = 3;
pub const MAX_ARC_FIGHTING_ARTS: usize = 1;
pub const MAX_PHILOSOPHY_RANK: u32 = 9;
pub const MAX_KNOWLEDGE_SLOTS: usize = 2;

choice_enum! {
    pub enum Gender {
        Male => "M",
        Female => "F",
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::Male
    }
}

/// Arc: a knowledge held by a survivor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorKnowledge {
    pub name: String,
    pub observation_rank: u32,
    /// Observation rank at which the knowledge ranks up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_up: Option<u32>,
}

impl Schema for SurvivorKnowledge {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Knowledge", cx);
        Self {
            name: f.required_text(cx, "name", "Knowledge name"),
            observation_rank: f.count(cx, "observationRank", "Observation rank", Bounds::range(0, 9)),
            rank_up: f.optional_count(cx, "rankUp", "Rank up milestone", Bounds::range(1, 9)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Survivor {
    pub id: SurvivorId,
    pub settlement_id: SettlementId,
    pub name: String,
    pub gender: Gender,

    #[serde(rename = "huntXP")]
    pub hunt_xp: u32,
    pub survival: u32,
    pub insanity: u32,
    pub movement: u32,
    pub accuracy: i32,
    pub strength: i32,
    pub evasion: i32,
    pub luck: i32,
    pub speed: i32,

    pub head_armor: u32,
    pub head_heavy_damage: bool,
    pub arm_armor: u32,
    pub arm_light_damage: bool,
    pub arm_heavy_damage: bool,
    pub body_armor: u32,
    pub body_light_damage: bool,
    pub body_heavy_damage: bool,
    pub waist_armor: u32,
    pub waist_light_damage: bool,
    pub waist_heavy_damage: bool,
    pub leg_armor: u32,
    pub leg_light_damage: bool,
    pub leg_heavy_damage: bool,

    pub courage: u32,
    pub understanding: u32,
    pub weapon_proficiency: u32,
    pub weapon_proficiency_type: String,

    #[serde(flatten)]
    pub severe_injuries: SevereInjuries,

    pub can_dodge: bool,
    pub can_encourage: bool,
    pub can_surge: bool,
    pub can_dash: bool,
    pub can_fist_pump: bool,
    pub can_spend_survival: bool,
    pub can_endure: bool,
    pub cannot_use_fighting_arts: bool,
    pub skip_next_hunt: bool,
    pub retired: bool,
    pub dead: bool,

    pub fighting_arts: Vec<String>,
    pub secret_fighting_arts: Vec<String>,
    pub disorders: Vec<String>,
    pub abilities_and_impairments: Vec<String>,
    pub once_per_lifetime: Vec<String>,
    pub next_departure: Vec<String>,
    pub notes: String,

    // Arc
    pub lumi: u32,
    pub torment: u32,
    pub systemic_pressure: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
    pub philosophy_rank: u32,
    pub neurosis: String,
    pub tenet_knowledge: String,
    pub knowledges: Vec<SurvivorKnowledge>,
}

impl Survivor {
    /// A newborn survivor with every sheet value at its default.
    pub fn new(
        id: SurvivorId,
        settlement_id: SettlementId,
        name: impl Into<String>,
        gender: Gender,
    ) -> Self {
        let mut cx = SchemaContext::new();
        let mut survivor =
            Self::parse_with(&Value::Object(Default::default()), SurvivorType::Core, &mut cx);
        survivor.id = id;
        survivor.settlement_id = settlement_id;
        survivor.name = name.into();
        survivor.gender = gender;
        survivor
    }

    /// Parses a survivor under the rules of `survivor_type`.
    pub fn parse_with(value: &Value, survivor_type: SurvivorType, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Survivor", cx);
        let count = |cx: &mut SchemaContext, key: &str, label: &str| {
            f.count(cx, key, label, Bounds::non_negative())
        };
        let available = |cx: &mut SchemaContext, key: &str, label: &str| f.boolean(cx, key, label, true);
        let flag = |cx: &mut SchemaContext, key: &str, label: &str| f.boolean(cx, key, label, false);

        let survivor = Self {
            id: SurvivorId::new(count(cx, "id", "Survivor id")),
            settlement_id: SettlementId::new(count(cx, "settlementId", "Settlement id")),
            name: f.text(cx, "name", "Survivor name"),
            gender: f.choice(cx, "gender", "Gender", Gender::Male),

            hunt_xp: f.count(cx, "huntXP", "Hunt XP", Bounds::range(0, MAX_HUNT_XP)),
            survival: f.count(cx, "survival", "Survival", Bounds::non_negative().or(1)),
            insanity: count(cx, "insanity", "Insanity"),
            movement: f.count(cx, "movement", "Movement", Bounds::at_least(1)),
            accuracy: f.signed(cx, "accuracy", "Accuracy"),
            strength: f.signed(cx, "strength", "Strength"),
            evasion: f.signed(cx, "evasion", "Evasion"),
            luck: f.signed(cx, "luck", "Luck"),
            speed: f.signed(cx, "speed", "Speed"),

            head_armor: count(cx, "headArmor", "Head armor"),
            head_heavy_damage: flag(cx, "headHeavyDamage", "Head heavy damage"),
            arm_armor: count(cx, "armArmor", "Arm armor"),
            arm_light_damage: flag(cx, "armLightDamage", "Arm light damage"),
            arm_heavy_damage: flag(cx, "armHeavyDamage", "Arm heavy damage"),
            body_armor: count(cx, "bodyArmor", "Body armor"),
            body_light_damage: flag(cx, "bodyLightDamage", "Body light damage"),
            body_heavy_damage: flag(cx, "bodyHeavyDamage", "Body heavy damage"),
            waist_armor: count(cx, "waistArmor", "Waist armor"),
            waist_light_damage: flag(cx, "waistLightDamage", "Waist light damage"),
            waist_heavy_damage: flag(cx, "waistHeavyDamage", "Waist heavy damage"),
            leg_armor: count(cx, "legArmor", "Leg armor"),
            leg_light_damage: flag(cx, "legLightDamage", "Leg light damage"),
            leg_heavy_damage: flag(cx, "legHeavyDamage", "Leg heavy damage"),

            courage: f.count(cx, "courage", "Courage", Bounds::range(0, MAX_COURAGE)),
            understanding: f.count(
                cx,
                "understanding",
                "Understanding",
                Bounds::range(0, MAX_UNDERSTANDING),
            ),
            weapon_proficiency: f.count(
                cx,
                "weaponProficiency",
                "Weapon proficiency",
                Bounds::range(0, MAX_WEAPON_PROFICIENCY),
            ),
            weapon_proficiency_type: f.text(cx, "weaponProficiencyType", "Weapon proficiency type"),

            // Injury counters sit on the survivor document itself.
            severe_injuries: SevereInjuries::read(&f, cx),

            can_dodge: available(cx, "canDodge", "Can dodge"),
            can_encourage: available(cx, "canEncourage", "Can encourage"),
            can_surge: available(cx, "canSurge", "Can surge"),
            can_dash: available(cx, "canDash", "Can dash"),
            can_fist_pump: available(cx, "canFistPump", "Can fist pump"),
            can_spend_survival: available(cx, "canSpendSurvival", "Can spend survival"),
            can_endure: available(cx, "canEndure", "Can endure"),
            cannot_use_fighting_arts: flag(cx, "cannotUseFightingArts", "Cannot use fighting arts"),
            skip_next_hunt: flag(cx, "skipNextHunt", "Skip next hunt"),
            retired: flag(cx, "retired", "Retired"),
            dead: flag(cx, "dead", "Dead"),

            fighting_arts: f.strings(cx, "fightingArts", "Fighting arts", None),
            secret_fighting_arts: f.strings(cx, "secretFightingArts", "Secret fighting arts", None),
            disorders: f.strings(cx, "disorders", "Disorders", Some(MAX_DISORDERS)),
            abilities_and_impairments: f.strings(
                cx,
                "abilitiesAndImpairments",
                "Abilities and impairments",
                None,
            ),
            once_per_lifetime: f.strings(cx, "oncePerLifetime", "Once per lifetime", None),
            next_departure: f.strings(cx, "nextDeparture", "Next departure", None),
            notes: f.text(cx, "notes", "Notes"),

            lumi: count(cx, "lumi", "Lumi"),
            torment: count(cx, "torment", "Torment"),
            systemic_pressure: count(cx, "systemicPressure", "Systemic pressure"),
            philosophy: f.optional_text(cx, "philosophy", "Philosophy"),
            philosophy_rank: f.count(
                cx,
                "philosophyRank",
                "Philosophy rank",
                Bounds::range(0, MAX_PHILOSOPHY_RANK),
            ),
            neurosis: f.text(cx, "neurosis", "Neurosis"),
            tenet_knowledge: f.text(cx, "tenetKnowledge", "Tenet knowledge"),
            knowledges: f.list(cx, "knowledges", "Knowledges"),
        };

        check_fighting_arts(&survivor, survivor_type, cx);
        if survivor.knowledges.len() > MAX_KNOWLEDGE_SLOTS {
            cx.report_at(
                "knowledges",
                format!("A survivor may not hold more than {MAX_KNOWLEDGE_SLOTS} knowledges."),
            );
        }
        survivor
    }

    /// Alive and not retired, so able to depart.
    pub fn is_available(&self) -> bool {
        !self.dead && !self.retired
    }

    pub fn fighting_art_count(&self) -> usize {
        self.fighting_arts.len() + self.secret_fighting_arts.len()
    }

    /// Adds hunt experience up to the cap; returns whether any was gained.
    pub fn gain_hunt_xp(&mut self, amount: u32) -> bool {
        let gained = self.hunt_xp.saturating_add(amount).min(MAX_HUNT_XP);
        let changed = gained != self.hunt_xp;
        self.hunt_xp = gained;
        changed
    }

    /// Learns a fighting art if the survivor type's limit allows it.
    pub fn learn_fighting_art(
        &mut self,
        name: impl Into<String>,
        survivor_type: SurvivorType,
    ) -> Result<(), DomainError> {
        let allowed = match survivor_type {
            SurvivorType::Core => self.fighting_art_count() < MAX_CORE_FIGHTING_ARTS,
            SurvivorType::Arc => self.fighting_arts.len() < MAX_ARC_FIGHTING_ARTS,
        };
        if !allowed {
            return Err(DomainError::constraint(format!(
                "{} cannot learn another fighting art.",
                self.display_name()
            )));
        }
        self.fighting_arts.push(name.into());
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unnamed survivor"
        } else {
            &self.name
        }
    }
}

impl Schema for Survivor {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        Self::parse_with(value, SurvivorType::Core, cx)
    }
}

fn check_fighting_arts(survivor: &Survivor, survivor_type: SurvivorType, cx: &mut SchemaContext) {
    match survivor_type {
        SurvivorType::Core => {
            if survivor.fighting_art_count() > MAX_CORE_FIGHTING_ARTS {
                cx.report_at(
                    "fightingArts",
                    format!(
                        "A survivor may not have more than {MAX_CORE_FIGHTING_ARTS} fighting arts and secret fighting arts combined."
                    ),
                );
            }
        }
        SurvivorType::Arc => {
            if survivor.fighting_arts.len() > MAX_ARC_FIGHTING_ARTS {
                cx.report_at(
                    "fightingArts",
                    format!("Arc survivors may not have more than {MAX_ARC_FIGHTING_ARTS} fighting art."),
                );
            }
            if survivor.secret_fighting_arts.len() > MAX_ARC_FIGHTING_ARTS {
                cx.report_at(
                    "secretFightingArts",
                    format!(
                        "Arc survivors may not have more than {MAX_ARC_FIGHTING_ARTS} secret fighting art."
                    ),
                );
            }
        }
    }
}
