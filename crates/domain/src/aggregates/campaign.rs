//! Campaign aggregate - the root of the persisted campaign document
//!
//! The campaign owns every settlement, survivor and custom monster, plus at
//! most one embark session: a hunt, a showdown, or the settlement phase that
//! follows a showdown. Lifecycle transitions between those sessions go
//! through the methods here so the "one session at a time" rule holds.
//!
//! # Invariants
//!
//! - settlement ids and survivor ids are unique
//! - every survivor references an existing settlement
//! - custom monsters are keyed by their own id
//! - sessions reference existing settlements and survivors
//! - at most one of hunt, showdown and settlement phase is present

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{Hunt, Settlement, SettlementPhase, Showdown, Survivor};
use crate::entities::{CustomMonster, MonsterSnapshot};
use crate::error::DomainError;
use crate::events::ShowdownConcluded;
use crate::ids::{MonsterId, SettlementId, SurvivorId};
use crate::schema::{whole_number, Bounds, Fields, Schema, SchemaContext};
use crate::value_objects::{AmbushType, CampaignType, ShowdownType, SurvivorType};

use super::survivor::Gender;

/// Current shape of the campaign document.
pub const CAMPAIGN_VERSION: u32 = 2;

/// Which embark session, if any, is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbarkState {
    Settled,
    Hunting,
    InShowdown,
    InSettlementPhase,
}

impl fmt::Display for EmbarkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Settled => "settled",
            Self::Hunting => "hunt",
            Self::InShowdown => "showdown",
            Self::InSettlementPhase => "settlement phase",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    version: u32,
    settlements: Vec<Settlement>,
    survivors: Vec<Survivor>,
    custom_monsters: BTreeMap<MonsterId, CustomMonster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hunt: Option<Hunt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    showdown: Option<Showdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settlement_phase: Option<SettlementPhase>,
}

impl Default for Campaign {
    fn default() -> Self {
        Self {
            version: CAMPAIGN_VERSION,
            settlements: Vec::new(),
            survivors: Vec::new(),
            custom_monsters: BTreeMap::new(),
            hunt: None,
            showdown: None,
            settlement_phase: None,
        }
    }
}

impl Campaign {
    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.iter().find(|settlement| settlement.id == id)
    }

    pub fn survivors(&self) -> &[Survivor] {
        &self.survivors
    }

    pub fn survivor(&self, id: SurvivorId) -> Option<&Survivor> {
        self.survivors.iter().find(|survivor| survivor.id == id)
    }

    pub fn survivors_of(&self, settlement_id: SettlementId) -> impl Iterator<Item = &Survivor> {
        self.survivors
            .iter()
            .filter(move |survivor| survivor.settlement_id == settlement_id)
    }

    pub fn custom_monsters(&self) -> &BTreeMap<MonsterId, CustomMonster> {
        &self.custom_monsters
    }

    pub fn custom_monster(&self, id: &MonsterId) -> Option<&CustomMonster> {
        self.custom_monsters.get(id)
    }

    pub fn hunt(&self) -> Option<&Hunt> {
        self.hunt.as_ref()
    }

    pub fn showdown(&self) -> Option<&Showdown> {
        self.showdown.as_ref()
    }

    pub fn settlement_phase(&self) -> Option<&SettlementPhase> {
        self.settlement_phase.as_ref()
    }

    pub fn embark_state(&self) -> EmbarkState {
        if self.hunt.is_some() {
            EmbarkState::Hunting
        } else if self.showdown.is_some() {
            EmbarkState::InShowdown
        } else if self.settlement_phase.is_some() {
            EmbarkState::InSettlementPhase
        } else {
            EmbarkState::Settled
        }
    }

    // =========================================================================
    // Mutable access for session state machines
    // =========================================================================

    pub fn hunt_mut(&mut self) -> Result<&mut Hunt, DomainError> {
        self.hunt
            .as_mut()
            .ok_or_else(|| DomainError::invalid_state_transition("No hunt is in progress."))
    }

    pub fn showdown_mut(&mut self) -> Result<&mut Showdown, DomainError> {
        self.showdown
            .as_mut()
            .ok_or_else(|| DomainError::invalid_state_transition("No showdown is in progress."))
    }

    pub fn settlement_phase_mut(&mut self) -> Result<&mut SettlementPhase, DomainError> {
        self.settlement_phase.as_mut().ok_or_else(|| {
            DomainError::invalid_state_transition("No settlement phase is in progress.")
        })
    }

    pub fn survivor_mut(&mut self, id: SurvivorId) -> Result<&mut Survivor, DomainError> {
        self.survivors
            .iter_mut()
            .find(|survivor| survivor.id == id)
            .ok_or_else(|| DomainError::not_found("Survivor", id))
    }

    pub fn settlement_mut(&mut self, id: SettlementId) -> Result<&mut Settlement, DomainError> {
        self.settlements
            .iter_mut()
            .find(|settlement| settlement.id == id)
            .ok_or_else(|| DomainError::not_found("Settlement", id))
    }

    // =========================================================================
    // Roster
    // =========================================================================

    pub fn add_settlement(
        &mut self,
        name: impl Into<String>,
        campaign_type: CampaignType,
        survivor_type: SurvivorType,
    ) -> Result<SettlementId, DomainError> {
        let id = self
            .settlements
            .iter()
            .map(|settlement| settlement.id)
            .max()
            .map_or(SettlementId::new(1), SettlementId::next);
        self.settlements
            .push(Settlement::new(id, name, campaign_type, survivor_type)?);
        Ok(id)
    }

    /// Removes a settlement together with its survivors.
    pub fn remove_settlement(&mut self, id: SettlementId) -> Result<Settlement, DomainError> {
        if self.session_settlement() == Some(id) {
            return Err(DomainError::invalid_state_transition(format!(
                "Settlement {id} cannot be removed during its {}.",
                self.embark_state()
            )));
        }
        let index = self
            .settlements
            .iter()
            .position(|settlement| settlement.id == id)
            .ok_or_else(|| DomainError::not_found("Settlement", id))?;
        self.survivors.retain(|survivor| survivor.settlement_id != id);
        Ok(self.settlements.remove(index))
    }

    /// Adds a newborn survivor and grows the settlement's population.
    pub fn add_survivor(
        &mut self,
        settlement_id: SettlementId,
        name: impl Into<String>,
        gender: Gender,
    ) -> Result<SurvivorId, DomainError> {
        let id = self
            .survivors
            .iter()
            .map(|survivor| survivor.id)
            .max()
            .map_or(SurvivorId::new(1), SurvivorId::next);
        let settlement = self.settlement_mut(settlement_id)?;
        settlement.population = settlement.population.saturating_add(1);
        self.survivors
            .push(Survivor::new(id, settlement_id, name, gender));
        Ok(id)
    }

    pub fn remove_survivor(&mut self, id: SurvivorId) -> Result<Survivor, DomainError> {
        if self.is_embarked(id) {
            return Err(DomainError::invalid_state_transition(format!(
                "Survivor {id} cannot be removed during the {}.",
                self.embark_state()
            )));
        }
        let index = self
            .survivors
            .iter()
            .position(|survivor| survivor.id == id)
            .ok_or_else(|| DomainError::not_found("Survivor", id))?;
        Ok(self.survivors.remove(index))
    }

    pub fn add_custom_monster(&mut self, monster: CustomMonster) -> Result<MonsterId, DomainError> {
        if self.custom_monsters.contains_key(&monster.id) {
            return Err(DomainError::constraint(format!(
                "A custom monster with id {} already exists.",
                monster.id
            )));
        }
        let id = monster.id.clone();
        self.custom_monsters.insert(id.clone(), monster);
        Ok(id)
    }

    pub fn remove_custom_monster(&mut self, id: &MonsterId) -> Result<CustomMonster, DomainError> {
        self.custom_monsters
            .remove(id)
            .ok_or_else(|| DomainError::not_found("Custom monster", id))
    }

    // =========================================================================
    // Embark lifecycle
    // =========================================================================

    /// Sends survivors out on a hunt.
    pub fn depart(
        &mut self,
        settlement_id: SettlementId,
        survivors: Vec<SurvivorId>,
        monster: MonsterSnapshot,
    ) -> Result<&Hunt, DomainError> {
        self.ensure_settled("Survivors cannot depart")?;
        if self.settlement(settlement_id).is_none() {
            return Err(DomainError::not_found("Settlement", settlement_id));
        }
        for id in &survivors {
            let survivor = self
                .survivor(*id)
                .ok_or_else(|| DomainError::not_found("Survivor", id))?;
            if survivor.settlement_id != settlement_id {
                return Err(DomainError::constraint(format!(
                    "{} does not belong to settlement {settlement_id}.",
                    survivor.display_name()
                )));
            }
            if !survivor.is_available() {
                return Err(DomainError::constraint(format!(
                    "{} cannot depart while dead or retired.",
                    survivor.display_name()
                )));
            }
        }
        let hunt = Hunt::new(settlement_id, survivors, monster)?;
        Ok(&*self.hunt.insert(hunt))
    }

    /// Gives up the active hunt without a showdown.
    pub fn abandon_hunt(&mut self) -> Result<Hunt, DomainError> {
        self.hunt
            .take()
            .ok_or_else(|| DomainError::invalid_state_transition("No hunt is in progress."))
    }

    /// Turns the active hunt into a showdown with the same party.
    pub fn begin_showdown(
        &mut self,
        ambush: AmbushType,
        showdown_type: ShowdownType,
    ) -> Result<&Showdown, DomainError> {
        let hunt = self.hunt.take().ok_or_else(|| {
            DomainError::invalid_state_transition("A showdown can only begin from a hunt.")
        })?;
        let showdown = Showdown::from_party(hunt.into_party(), ambush, showdown_type);
        Ok(&*self.showdown.insert(showdown))
    }

    /// Folds the showdown back into the settlement and opens the settlement phase.
    ///
    /// Every living participant gains one hunt XP, up to the cap.
    pub fn conclude_showdown(&mut self) -> Result<ShowdownConcluded, DomainError> {
        let showdown = self
            .showdown
            .take()
            .ok_or_else(|| DomainError::invalid_state_transition("No showdown is in progress."))?;

        let mut experienced = Vec::new();
        let mut at_cap = Vec::new();
        let mut returning = Vec::new();
        for id in showdown.survivors() {
            let Some(survivor) = self.survivors.iter_mut().find(|survivor| survivor.id == *id) else {
                continue;
            };
            if survivor.dead {
                continue;
            }
            returning.push(*id);
            if survivor.gain_hunt_xp(1) {
                experienced.push(*id);
            } else {
                at_cap.push(*id);
            }
        }

        let settlement_id = showdown.settlement_id();
        self.settlement_phase = Some(SettlementPhase::after_showdown(settlement_id, returning));
        Ok(ShowdownConcluded {
            settlement_id,
            experienced,
            at_cap,
        })
    }

    /// Opens a settlement phase without a preceding showdown.
    pub fn begin_settlement_phase(
        &mut self,
        settlement_id: SettlementId,
    ) -> Result<&SettlementPhase, DomainError> {
        self.ensure_settled("A settlement phase cannot begin")?;
        if self.settlement(settlement_id).is_none() {
            return Err(DomainError::not_found("Settlement", settlement_id));
        }
        Ok(&*self
            .settlement_phase
            .insert(SettlementPhase::starting(settlement_id)))
    }

    /// Closes the settlement phase; unspent endeavors are lost with it.
    pub fn end_settlement_phase(&mut self) -> Result<SettlementPhase, DomainError> {
        self.settlement_phase.take().ok_or_else(|| {
            DomainError::invalid_state_transition("No settlement phase is in progress.")
        })
    }

    fn ensure_settled(&self, action: &str) -> Result<(), DomainError> {
        match self.embark_state() {
            EmbarkState::Settled => Ok(()),
            active => Err(DomainError::invalid_state_transition(format!(
                "{action} while a {active} is in progress."
            ))),
        }
    }

    fn session_settlement(&self) -> Option<SettlementId> {
        self.hunt
            .as_ref()
            .map(Hunt::settlement_id)
            .or_else(|| self.showdown.as_ref().map(Showdown::settlement_id))
            .or_else(|| self.settlement_phase.as_ref().map(SettlementPhase::settlement_id))
    }

    fn is_embarked(&self, id: SurvivorId) -> bool {
        self.hunt.as_ref().is_some_and(|hunt| hunt.includes(id))
            || self.showdown.as_ref().is_some_and(|showdown| showdown.includes(id))
    }

    // =========================================================================
    // Cross-entity checks
    // =========================================================================

    fn check_references(&self, cx: &mut SchemaContext) {
        cx.at("settlements", |cx| {
            for (index, settlement) in self.settlements.iter().enumerate() {
                if self.settlements[..index].iter().any(|other| other.id == settlement.id) {
                    cx.at(index, |cx| {
                        cx.report_at("id", format!("Settlement id {} is used more than once.", settlement.id))
                    });
                }
            }
        });

        cx.at("survivors", |cx| {
            for (index, survivor) in self.survivors.iter().enumerate() {
                if self.survivors[..index].iter().any(|other| other.id == survivor.id) {
                    cx.at(index, |cx| {
                        cx.report_at("id", format!("Survivor id {} is used more than once.", survivor.id))
                    });
                }
                if self.settlement(survivor.settlement_id).is_none() {
                    cx.at(index, |cx| {
                        cx.report_at(
                            "settlementId",
                            format!("Settlement {} does not exist.", survivor.settlement_id),
                        )
                    });
                }
            }
        });

        if let Some(hunt) = &self.hunt {
            cx.at("hunt", |cx| {
                self.check_session(hunt.settlement_id(), hunt.survivors(), "survivors", cx)
            });
        }
        if let Some(showdown) = &self.showdown {
            cx.at("showdown", |cx| {
                self.check_session(showdown.settlement_id(), showdown.survivors(), "survivors", cx)
            });
        }
        if let Some(phase) = &self.settlement_phase {
            cx.at("settlementPhase", |cx| {
                self.check_session(
                    phase.settlement_id(),
                    phase.returning_survivors(),
                    "returningSurvivors",
                    cx,
                )
            });
        }

        let active: Vec<&str> = [
            self.hunt.as_ref().map(|_| "hunt"),
            self.showdown.as_ref().map(|_| "showdown"),
            self.settlement_phase.as_ref().map(|_| "settlementPhase"),
        ]
        .into_iter()
        .flatten()
        .collect();
        for key in active.iter().skip(1) {
            cx.report_at(
                key,
                "Only one of hunt, showdown and settlement phase may be in progress.",
            );
        }
    }

    fn check_session(
        &self,
        settlement_id: SettlementId,
        survivors: &[SurvivorId],
        survivors_key: &str,
        cx: &mut SchemaContext,
    ) {
        if self.settlement(settlement_id).is_none() {
            cx.report_at("settlementId", format!("Settlement {settlement_id} does not exist."));
        }
        cx.at(survivors_key, |cx| {
            for (index, id) in survivors.iter().enumerate() {
                match self.survivor(*id) {
                    None => cx.at(index, |cx| cx.report(format!("Survivor {id} does not exist."))),
                    Some(survivor) if survivor.settlement_id != settlement_id => cx.at(index, |cx| {
                        cx.report(format!(
                            "Survivor {id} does not belong to settlement {settlement_id}."
                        ))
                    }),
                    Some(_) => {}
                }
            }
        });
    }
}

impl Schema for Campaign {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Campaign", cx);
        let version = f.count(
            cx,
            "version",
            "Campaign version",
            Bounds::range(1, CAMPAIGN_VERSION).or(CAMPAIGN_VERSION),
        );
        let settlements: Vec<Settlement> = f.list(cx, "settlements", "Settlements");
        let survivors = parse_survivors(&f, &settlements, cx);
        let custom_monsters = parse_custom_monsters(&f, cx);

        let campaign = Self {
            version,
            settlements,
            survivors,
            custom_monsters,
            hunt: f.optional(cx, "hunt"),
            showdown: f.optional(cx, "showdown"),
            settlement_phase: f.optional(cx, "settlementPhase"),
        };
        campaign.check_references(cx);
        campaign
    }
}

/// Survivors are held to their own settlement's survivor rules.
fn parse_survivors(f: &Fields<'_>, settlements: &[Settlement], cx: &mut SchemaContext) -> Vec<Survivor> {
    let Some(raw) = f.get("survivors") else {
        return Vec::new();
    };
    cx.at("survivors", |cx| {
        let Some(items) = raw.as_array() else {
            cx.report("Survivors must be a list.");
            return Vec::new();
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let survivor_type = item
                    .get("settlementId")
                    .and_then(whole_number)
                    .and_then(|id| u32::try_from(id).ok())
                    .and_then(|id| {
                        settlements
                            .iter()
                            .find(|settlement| settlement.id.get() == id)
                    })
                    .map_or(SurvivorType::Core, |settlement| settlement.survivor_type);
                cx.at(index, |cx| Survivor::parse_with(item, survivor_type, cx))
            })
            .collect()
    })
}

fn parse_custom_monsters(f: &Fields<'_>, cx: &mut SchemaContext) -> BTreeMap<MonsterId, CustomMonster> {
    let Some(raw) = f.get("customMonsters") else {
        return BTreeMap::new();
    };
    cx.at("customMonsters", |cx| {
        let Some(entries) = raw.as_object() else {
            cx.report("Custom monsters must be an object keyed by monster id.");
            return BTreeMap::new();
        };
        entries
            .iter()
            .map(|(key, item)| {
                cx.at(key.as_str(), |cx| {
                    let monster = CustomMonster::parse(item, cx);
                    if monster.id.as_str() != key {
                        cx.report_at("id", format!("Monster id must match its key {key}."));
                    }
                    (MonsterId::from(key.as_str()), monster)
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn white_lion() -> MonsterSnapshot {
        MonsterSnapshot::safe_parse(&json!({ "name": "White Lion", "level": 1 })).unwrap()
    }

    /// A settlement with three survivors, the third of them dead.
    fn campaign() -> Campaign {
        let mut campaign = Campaign::default();
        let settlement = campaign
            .add_settlement("Lanternhold", CampaignType::PeopleOfTheLantern, SurvivorType::Core)
            .unwrap();
        for name in ["Allister", "Erza", "Lucy"] {
            campaign.add_survivor(settlement, name, Gender::Female).unwrap();
        }
        campaign.survivor_mut(SurvivorId::new(3)).unwrap().dead = true;
        campaign
    }

    fn ids(raw: &[u32]) -> Vec<SurvivorId> {
        raw.iter().copied().map(SurvivorId::new).collect()
    }

    mod roster {
        use super::*;

        #[test]
        fn default_campaign_is_empty_and_current() {
            let campaign = Campaign::default();
            assert_eq!(campaign.version(), CAMPAIGN_VERSION);
            assert!(campaign.settlements().is_empty());
            assert_eq!(campaign.embark_state(), EmbarkState::Settled);
        }

        #[test]
        fn ids_are_allocated_after_the_highest() {
            let mut campaign = campaign();
            let second = campaign
                .add_settlement("Citadel", CampaignType::SquiresOfTheCitadel, SurvivorType::Core)
                .unwrap();
            assert_eq!(second, SettlementId::new(2));
            campaign.remove_survivor(SurvivorId::new(1)).unwrap();
            let next = campaign.add_survivor(second, "Zachary", Gender::Male).unwrap();
            assert_eq!(next, SurvivorId::new(4));
        }

        #[test]
        fn add_survivor_grows_population() {
            let campaign = campaign();
            assert_eq!(campaign.settlement(SettlementId::new(1)).unwrap().population, 3);
            assert_eq!(campaign.survivors_of(SettlementId::new(1)).count(), 3);
        }

        #[test]
        fn add_survivor_needs_an_existing_settlement() {
            let mut campaign = campaign();
            let err = campaign
                .add_survivor(SettlementId::new(9), "Nobody", Gender::Male)
                .unwrap_err();
            assert!(err.is_not_found());
        }

        #[test]
        fn removing_a_settlement_removes_its_survivors() {
            let mut campaign = campaign();
            campaign.remove_settlement(SettlementId::new(1)).unwrap();
            assert!(campaign.survivors().is_empty());
        }

        #[test]
        fn custom_monster_ids_are_unique() {
            let monster = CustomMonster::safe_parse(&json!({
                "id": "gorm",
                "name": "Gorm",
                "levels": [{ "level": 1 }],
            }))
            .unwrap();
            let mut campaign = Campaign::default();
            let id = campaign.add_custom_monster(monster.clone()).unwrap();
            assert!(campaign.add_custom_monster(monster).is_err());
            assert_eq!(campaign.remove_custom_monster(&id).unwrap().name, "Gorm");
            assert!(campaign.remove_custom_monster(&id).unwrap_err().is_not_found());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn full_lantern_year_cycle() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1, 2]), white_lion())
                .unwrap();
            assert_eq!(campaign.embark_state(), EmbarkState::Hunting);

            let showdown = campaign
                .begin_showdown(AmbushType::None, ShowdownType::Regular)
                .unwrap();
            assert_eq!(showdown.survivors(), ids(&[1, 2]).as_slice());
            assert!(campaign.hunt().is_none());

            campaign.survivor_mut(SurvivorId::new(2)).unwrap().hunt_xp = 16;
            let concluded = campaign.conclude_showdown().unwrap();
            assert_eq!(concluded.experienced, ids(&[1]));
            assert_eq!(concluded.at_cap, ids(&[2]));
            assert_eq!(campaign.survivor(SurvivorId::new(1)).unwrap().hunt_xp, 1);

            let phase = campaign.settlement_phase().unwrap();
            assert_eq!(phase.step(), crate::value_objects::SettlementPhaseStep::SurvivorsReturn);
            assert_eq!(phase.returning_survivors(), ids(&[1, 2]).as_slice());

            campaign.end_settlement_phase().unwrap();
            assert_eq!(campaign.embark_state(), EmbarkState::Settled);
        }

        #[test]
        fn dead_participants_gain_nothing_and_do_not_return() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1, 2]), white_lion())
                .unwrap();
            campaign.begin_showdown(AmbushType::Monster, ShowdownType::Regular).unwrap();
            campaign.survivor_mut(SurvivorId::new(1)).unwrap().dead = true;

            let concluded = campaign.conclude_showdown().unwrap();
            assert_eq!(concluded.experienced, ids(&[2]));
            assert_eq!(campaign.survivor(SurvivorId::new(1)).unwrap().hunt_xp, 0);
            assert_eq!(
                campaign.settlement_phase().unwrap().returning_survivors(),
                ids(&[2]).as_slice()
            );
        }

        #[test]
        fn only_one_session_at_a_time() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1]), white_lion())
                .unwrap();
            let err = campaign
                .depart(SettlementId::new(1), ids(&[2]), white_lion())
                .unwrap_err();
            assert_eq!(
                err,
                DomainError::invalid_state_transition(
                    "Survivors cannot depart while a hunt is in progress."
                )
            );
            assert!(campaign.begin_settlement_phase(SettlementId::new(1)).is_err());
        }

        #[test]
        fn dead_survivors_cannot_depart() {
            let mut campaign = campaign();
            let err = campaign
                .depart(SettlementId::new(1), ids(&[1, 3]), white_lion())
                .unwrap_err();
            assert!(matches!(err, DomainError::Constraint(_)));
            assert!(campaign.hunt().is_none());
        }

        #[test]
        fn showdown_needs_a_hunt_and_conclusion_needs_a_showdown() {
            let mut campaign = campaign();
            assert!(campaign
                .begin_showdown(AmbushType::None, ShowdownType::Regular)
                .is_err());
            assert!(campaign.conclude_showdown().is_err());
            assert!(campaign.end_settlement_phase().is_err());
        }

        #[test]
        fn embarked_survivors_cannot_be_removed() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1]), white_lion())
                .unwrap();
            assert!(campaign.remove_survivor(SurvivorId::new(1)).is_err());
            assert!(campaign.remove_settlement(SettlementId::new(1)).is_err());
            campaign.abandon_hunt().unwrap();
            assert!(campaign.remove_survivor(SurvivorId::new(1)).is_ok());
        }
    }

    mod schema {
        use super::*;

        #[test]
        fn survivors_must_reference_settlements() {
            let issues = Campaign::safe_parse(&json!({
                "settlements": [{ "id": 1, "name": "Lanternhold" }],
                "survivors": [{ "id": 1, "settlementId": 2 }],
            }))
            .unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().to_string(),
                "survivors[0].settlementId: Settlement 2 does not exist."
            );
        }

        #[test]
        fn duplicate_ids_are_reported() {
            let issues = Campaign::safe_parse(&json!({
                "settlements": [
                    { "id": 1, "name": "Lanternhold" },
                    { "id": 1, "name": "Second Light" },
                ],
            }))
            .unwrap_err();
            assert_eq!(issues.iter().next().unwrap().path, "settlements[1].id");
        }

        #[test]
        fn arc_settlement_applies_arc_rules_to_its_survivors() {
            let doc = json!({
                "settlements": [{ "id": 1, "name": "Dreamers", "survivorType": "Arc" }],
                "survivors": [{ "id": 1, "settlementId": 1, "fightingArts": ["Tough", "Leader"] }],
            });
            let issues = Campaign::safe_parse(&doc).unwrap_err();
            assert_eq!(issues.iter().next().unwrap().path, "survivors[0].fightingArts");
        }

        #[test]
        fn arc_rules_apply_to_float_settlement_ids() {
            let doc = json!({
                "settlements": [{ "id": 1, "name": "Dreamers", "survivorType": "Arc" }],
                "survivors": [{ "id": 1, "settlementId": 1.0, "fightingArts": ["Tough", "Leader"] }],
            });
            let issues = Campaign::safe_parse(&doc).unwrap_err();
            assert!(issues.touches("survivors[0].fightingArts"));
        }

        #[test]
        fn custom_monster_key_must_match_id() {
            let issues = Campaign::safe_parse(&json!({
                "customMonsters": {
                    "abc": { "id": "xyz", "name": "Gorm", "levels": [{ "level": 1 }] },
                },
            }))
            .unwrap_err();
            assert_eq!(issues.iter().next().unwrap().path, "customMonsters.abc.id");
        }

        #[test]
        fn two_sessions_are_rejected() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1]), white_lion())
                .unwrap();
            let mut doc = serde_json::to_value(&campaign).unwrap();
            doc["settlementPhase"] = json!({ "settlementId": 1, "step": "Develop" });
            let issues = Campaign::safe_parse(&doc).unwrap_err();
            assert!(issues.touches("settlementPhase"));
        }

        #[test]
        fn session_survivors_must_exist() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1]), white_lion())
                .unwrap();
            let mut doc = serde_json::to_value(&campaign).unwrap();
            doc["hunt"]["survivors"] = json!([1, 8]);
            doc["hunt"]["survivorDetails"] = json!([{ "id": 1 }, { "id": 8 }]);
            let issues = Campaign::safe_parse(&doc).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().to_string(),
                "hunt.survivors[1]: Survivor 8 does not exist."
            );
        }

        #[test]
        fn newer_version_is_rejected() {
            let issues = Campaign::safe_parse(&json!({ "version": CAMPAIGN_VERSION + 1 })).unwrap_err();
            assert!(issues.touches("version"));
        }

        #[test]
        fn serialized_campaign_parses_back_to_itself() {
            let mut campaign = campaign();
            campaign
                .depart(SettlementId::new(1), ids(&[1, 2]), white_lion())
                .unwrap();
            campaign.begin_showdown(AmbushType::Survivors, ShowdownType::Regular).unwrap();
            campaign.showdown_mut().unwrap().end_turn();

            let json = serde_json::to_value(&campaign).unwrap();
            assert_eq!(Campaign::safe_parse(&json).unwrap(), campaign);
        }
    }
}
