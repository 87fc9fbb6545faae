//! Hunt aggregate - survivors tracking a quarry across the hunt board
//!
//! # Invariants
//!
//! - 1 to 4 distinct survivors, each with exactly one details entry
//! - the scout, if any, is one of the survivors
//! - at least one monster snapshot
//! - both board positions lie on the 13-space hunt board

use serde::Serialize;
use serde_json::Value;

use super::party::{check_details, check_monsters, check_party, read_party, read_scout};
use crate::entities::{MonsterSnapshot, SurvivorHuntDetails, HUNT_BOARD_SIZE};
use crate::error::DomainError;
use crate::ids::{SettlementId, SurvivorId};
use crate::schema::{Bounds, Fields, Schema, SchemaContext};

const LAST_BOARD_POSITION: u32 = HUNT_BOARD_SIZE as u32 - 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunt {
    settlement_id: SettlementId,
    survivors: Vec<SurvivorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scout: Option<SurvivorId>,
    survivor_details: Vec<SurvivorHuntDetails>,
    monsters: Vec<MonsterSnapshot>,
    survivor_position: u32,
    monster_position: u32,
}

impl Hunt {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Starts a hunt with the party on the first space and the quarry on the last.
    pub fn new(
        settlement_id: SettlementId,
        survivors: Vec<SurvivorId>,
        monster: MonsterSnapshot,
    ) -> Result<Self, DomainError> {
        check_party(&survivors, "hunt")?;
        Ok(Self {
            settlement_id,
            survivor_details: survivors.iter().copied().map(SurvivorHuntDetails::fresh).collect(),
            survivors,
            scout: None,
            monsters: vec![monster],
            survivor_position: 0,
            monster_position: LAST_BOARD_POSITION,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn settlement_id(&self) -> SettlementId {
        self.settlement_id
    }

    pub fn survivors(&self) -> &[SurvivorId] {
        &self.survivors
    }

    pub fn scout(&self) -> Option<SurvivorId> {
        self.scout
    }

    pub fn survivor_details(&self) -> &[SurvivorHuntDetails] {
        &self.survivor_details
    }

    pub fn details(&self, id: SurvivorId) -> Option<&SurvivorHuntDetails> {
        self.survivor_details.iter().find(|details| details.id == id)
    }

    pub fn monsters(&self) -> &[MonsterSnapshot] {
        &self.monsters
    }

    pub fn survivor_position(&self) -> u32 {
        self.survivor_position
    }

    pub fn monster_position(&self) -> u32 {
        self.monster_position
    }

    pub fn includes(&self, id: SurvivorId) -> bool {
        self.survivors.contains(&id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_scout(&mut self, scout: Option<SurvivorId>) -> Result<(), DomainError> {
        if let Some(id) = scout {
            if !self.includes(id) {
                return Err(DomainError::not_found("Survivor", id));
            }
        }
        self.scout = scout;
        Ok(())
    }

    pub fn move_survivors(&mut self, position: u32) -> Result<(), DomainError> {
        self.survivor_position = check_position(position)?;
        Ok(())
    }

    pub fn move_monster(&mut self, position: u32) -> Result<(), DomainError> {
        self.monster_position = check_position(position)?;
        Ok(())
    }

    pub fn details_mut(&mut self, id: SurvivorId) -> Result<&mut SurvivorHuntDetails, DomainError> {
        self.survivor_details
            .iter_mut()
            .find(|details| details.id == id)
            .ok_or_else(|| DomainError::not_found("Survivor", id))
    }

    /// The party has caught up with the quarry.
    pub fn quarry_reached(&self) -> bool {
        self.survivor_position >= self.monster_position
    }

    /// Splits the hunt into the parts a showdown carries over.
    pub(crate) fn into_party(self) -> Party {
        Party {
            settlement_id: self.settlement_id,
            survivors: self.survivors,
            scout: self.scout,
            survivor_details: self.survivor_details,
            monsters: self.monsters,
        }
    }
}

/// What a hunt hands over to the showdown that follows it.
pub(crate) struct Party {
    pub settlement_id: SettlementId,
    pub survivors: Vec<SurvivorId>,
    pub scout: Option<SurvivorId>,
    pub survivor_details: Vec<SurvivorHuntDetails>,
    pub monsters: Vec<MonsterSnapshot>,
}

fn check_position(position: u32) -> Result<u32, DomainError> {
    if position > LAST_BOARD_POSITION {
        return Err(DomainError::validation(format!(
            "Hunt board position may not exceed {LAST_BOARD_POSITION}."
        )));
    }
    Ok(position)
}

impl Schema for Hunt {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Hunt", cx);
        let settlement_id = SettlementId::new(f.count(
            cx,
            "settlementId",
            "Settlement id",
            Bounds::non_negative(),
        ));
        let survivors = read_party(&f, cx, "hunt");
        let scout = read_scout(&f, cx, &survivors);
        let survivor_details: Vec<SurvivorHuntDetails> =
            f.list(cx, "survivorDetails", "Survivor details");
        let detail_ids: Vec<SurvivorId> = survivor_details.iter().map(|details| details.id).collect();
        check_details(&survivors, &detail_ids, cx);
        let monsters: Vec<MonsterSnapshot> = f.list(cx, "monsters", "Monsters");
        check_monsters(monsters.len(), "hunt", cx);

        Self {
            settlement_id,
            survivors,
            scout,
            survivor_details,
            monsters,
            survivor_position: f.count(
                cx,
                "survivorPosition",
                "Survivor position",
                Bounds::range(0, LAST_BOARD_POSITION),
            ),
            monster_position: f.count(
                cx,
                "monsterPosition",
                "Monster position",
                Bounds::range(0, LAST_BOARD_POSITION).or(LAST_BOARD_POSITION),
            ),
        }
    }
}
