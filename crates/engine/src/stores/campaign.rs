//! Campaign store - the single read-validate-write path for the document.
//!
//! Every change is applied to a copy of the campaign, validated as a whole
//! document and written to storage before the in-memory campaign is
//! replaced. A rejected or failed save leaves both untouched.

use std::sync::Arc;

use serde_json::Value;

use lanternlog_domain::{
    migrate, AmbushType, Campaign, CampaignType, CustomMonster, DomainError, Gender, Hunt, Issues,
    MonsterId, MonsterSnapshot, PhaseAdvance, PhaseJump, Schema, Settlement, SettlementId,
    SettlementPhase, SettlementPhaseStep, Showdown, ShowdownConcluded, ShowdownType, Survivor,
    SurvivorId, SurvivorType, TurnChange,
};

use super::merge::merge;
use crate::infrastructure::clock::SystemRandom;
use crate::infrastructure::ports::{RandomPort, StorageError, StorageProvider};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The resulting document failed validation.
    #[error("Campaign rejected: {0}")]
    Validation(#[from] Issues),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error("Malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn issues(&self) -> Option<&Issues> {
        match self {
            Self::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

/// Embark sessions addressed by partial saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hunt,
    Showdown,
    SettlementPhase,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Self::Hunt => "hunt",
            Self::Showdown => "showdown",
            Self::SettlementPhase => "settlementPhase",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Hunt => "hunt",
            Self::Showdown => "showdown",
            Self::SettlementPhase => "settlement phase",
        }
    }
}

// =============================================================================
// Store
// =============================================================================

pub struct CampaignStore<S: StorageProvider> {
    storage: S,
    key: String,
    campaign: Campaign,
    ids: Arc<dyn RandomPort>,
}

impl<S: StorageProvider> CampaignStore<S> {
    /// Loads the campaign under `key`, or starts an empty one.
    ///
    /// Nothing is written until the first change.
    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let campaign = read_campaign(&storage, &key)?;
        tracing::debug!(
            key = %key,
            settlements = campaign.settlements().len(),
            survivors = campaign.survivors().len(),
            "Opened campaign store"
        );
        Ok(Self {
            storage,
            key,
            campaign,
            ids: Arc::new(SystemRandom::new()),
        })
    }

    /// Replaces the generator used for custom monster ids.
    pub fn with_id_source(mut self, ids: Arc<dyn RandomPort>) -> Self {
        self.ids = ids;
        self
    }

    pub fn get(&self) -> &Campaign {
        &self.campaign
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Re-reads the stored document, discarding the in-memory copy.
    pub fn reload(&mut self) -> Result<&Campaign, StoreError> {
        self.campaign = read_campaign(&self.storage, &self.key)?;
        Ok(&self.campaign)
    }

    /// Replaces the whole campaign, as an import does.
    pub fn replace(&mut self, campaign: Campaign) -> Result<(), StoreError> {
        self.commit(campaign, "replace")
    }

    // =========================================================================
    // Partial saves
    // =========================================================================

    pub fn save_settlement(&mut self, id: SettlementId, partial: &Value) -> Result<(), StoreError> {
        let mut document = self.document()?;
        let target = find_by_id(&mut document, "settlements", u64::from(id.get()))
            .ok_or_else(|| StoreError::not_found("Settlement", id))?;
        apply_partial(target, partial, "settlements")?;
        target["id"] = Value::from(id.get());
        self.commit_document(document, "save settlement")
    }

    pub fn save_survivor(&mut self, id: SurvivorId, partial: &Value) -> Result<(), StoreError> {
        let mut document = self.document()?;
        let target = find_by_id(&mut document, "survivors", u64::from(id.get()))
            .ok_or_else(|| StoreError::not_found("Survivor", id))?;
        apply_partial(target, partial, "survivors")?;
        target["id"] = Value::from(id.get());
        self.commit_document(document, "save survivor")
    }

    pub fn save_custom_monster(&mut self, id: &MonsterId, partial: &Value) -> Result<(), StoreError> {
        let mut document = self.document()?;
        let target = document
            .get_mut("customMonsters")
            .and_then(|monsters| monsters.get_mut(id.as_str()))
            .ok_or_else(|| StoreError::not_found("Custom monster", id))?;
        apply_partial(target, partial, "customMonsters")?;
        target["id"] = Value::from(id.as_str());
        self.commit_document(document, "save custom monster")
    }

    pub fn save_hunt(&mut self, partial: &Value) -> Result<(), StoreError> {
        self.save_section(Section::Hunt, partial)
    }

    pub fn save_showdown(&mut self, partial: &Value) -> Result<(), StoreError> {
        self.save_section(Section::Showdown, partial)
    }

    pub fn save_settlement_phase(&mut self, partial: &Value) -> Result<(), StoreError> {
        self.save_section(Section::SettlementPhase, partial)
    }

    pub fn save_section(&mut self, section: Section, partial: &Value) -> Result<(), StoreError> {
        let mut document = self.document()?;
        let target = document.get_mut(section.key()).ok_or_else(|| {
            StoreError::Domain(DomainError::invalid_state_transition(format!(
                "No {} is in progress.",
                section.label()
            )))
        })?;
        apply_partial(target, partial, section.key())?;
        self.commit_document(document, "save session")
    }

    // =========================================================================
    // Roster
    // =========================================================================

    pub fn create_settlement(
        &mut self,
        name: &str,
        campaign_type: CampaignType,
        survivor_type: SurvivorType,
    ) -> Result<SettlementId, StoreError> {
        self.apply("create settlement", |campaign| {
            campaign.add_settlement(name, campaign_type, survivor_type)
        })
    }

    pub fn remove_settlement(&mut self, id: SettlementId) -> Result<Settlement, StoreError> {
        self.apply("remove settlement", |campaign| campaign.remove_settlement(id))
    }

    pub fn create_survivor(
        &mut self,
        settlement_id: SettlementId,
        name: &str,
        gender: Gender,
    ) -> Result<SurvivorId, StoreError> {
        self.apply("create survivor", |campaign| {
            campaign.add_survivor(settlement_id, name, gender)
        })
    }

    pub fn remove_survivor(&mut self, id: SurvivorId) -> Result<Survivor, StoreError> {
        self.apply("remove survivor", |campaign| campaign.remove_survivor(id))
    }

    /// Validates a monster definition and stores it under a fresh id.
    pub fn create_custom_monster(&mut self, definition: &Value) -> Result<MonsterId, StoreError> {
        let Value::Object(fields) = definition else {
            return Err(Issues::single("", "Monster definition must be an object.").into());
        };
        let id = MonsterId::from_uuid(self.ids.gen_uuid());
        let mut fields = fields.clone();
        fields.insert("id".to_string(), Value::from(id.as_str()));
        let monster = CustomMonster::safe_parse(&Value::Object(fields)).map_err(|issues| {
            tracing::warn!(issues = issues.len(), "Rejected custom monster");
            StoreError::Validation(issues)
        })?;
        self.apply("create custom monster", |campaign| {
            campaign.add_custom_monster(monster)
        })
    }

    pub fn remove_custom_monster(&mut self, id: &MonsterId) -> Result<CustomMonster, StoreError> {
        self.apply("remove custom monster", |campaign| {
            campaign.remove_custom_monster(id)
        })
    }

    // =========================================================================
    // Hunt
    // =========================================================================

    pub fn depart(
        &mut self,
        settlement_id: SettlementId,
        survivors: Vec<SurvivorId>,
        monster: MonsterSnapshot,
    ) -> Result<Hunt, StoreError> {
        let hunt = self.apply("depart", |campaign| {
            campaign.depart(settlement_id, survivors, monster).cloned()
        })?;
        tracing::info!(
            settlement_id = %settlement_id,
            survivors = hunt.survivors().len(),
            monster = %hunt.monsters().first().map_or("", |monster| monster.name.as_str()),
            "Survivors departed"
        );
        Ok(hunt)
    }

    /// Departs against one level of a stored custom monster.
    pub fn depart_against(
        &mut self,
        settlement_id: SettlementId,
        survivors: Vec<SurvivorId>,
        monster_id: &MonsterId,
        level: u32,
    ) -> Result<Hunt, StoreError> {
        let monster = self
            .campaign
            .custom_monster(monster_id)
            .ok_or_else(|| StoreError::not_found("Custom monster", monster_id))?;
        let snapshot = MonsterSnapshot::from_custom(monster, level).ok_or_else(|| {
            DomainError::validation(format!("{} has no level {level}.", monster.name))
        })?;
        self.depart(settlement_id, survivors, snapshot)
    }

    pub fn move_survivors(&mut self, position: u32) -> Result<(), StoreError> {
        self.apply("move survivors", |campaign| {
            campaign.hunt_mut()?.move_survivors(position)
        })
    }

    pub fn move_monster(&mut self, position: u32) -> Result<(), StoreError> {
        self.apply("move monster", |campaign| {
            campaign.hunt_mut()?.move_monster(position)
        })
    }

    pub fn abandon_hunt(&mut self) -> Result<Hunt, StoreError> {
        let hunt = self.apply("abandon hunt", Campaign::abandon_hunt)?;
        tracing::info!(settlement_id = %hunt.settlement_id(), "Hunt abandoned");
        Ok(hunt)
    }

    // =========================================================================
    // Showdown
    // =========================================================================

    pub fn begin_showdown(
        &mut self,
        ambush: AmbushType,
        showdown_type: ShowdownType,
    ) -> Result<Showdown, StoreError> {
        let showdown = self.apply("begin showdown", |campaign| {
            campaign.begin_showdown(ambush, showdown_type).cloned()
        })?;
        tracing::info!(
            settlement_id = %showdown.settlement_id(),
            ambush = %ambush,
            turn = %showdown.current_turn(),
            "Showdown began"
        );
        Ok(showdown)
    }

    pub fn end_turn(&mut self) -> Result<TurnChange, StoreError> {
        let change = self.apply("end turn", |campaign| Ok(campaign.showdown_mut()?.end_turn()))?;
        tracing::info!(
            from = %change.from,
            to = %change.to,
            ambush_cleared = change.ambush_cleared,
            "Showdown turn ended"
        );
        Ok(change)
    }

    pub fn set_movement_used(&mut self, id: SurvivorId, used: bool) -> Result<(), StoreError> {
        self.apply("set movement used", |campaign| {
            campaign.showdown_mut()?.set_movement_used(id, used)
        })
    }

    pub fn set_activation_used(&mut self, id: SurvivorId, used: bool) -> Result<(), StoreError> {
        self.apply("set activation used", |campaign| {
            campaign.showdown_mut()?.set_activation_used(id, used)
        })
    }

    pub fn set_ai_card_drawn(&mut self, drawn: bool) -> Result<(), StoreError> {
        self.apply("set AI card drawn", |campaign| {
            campaign.showdown_mut()?.set_ai_card_drawn(drawn);
            Ok(())
        })
    }

    pub fn set_knocked_down(&mut self, id: SurvivorId, knocked_down: bool) -> Result<(), StoreError> {
        self.apply("set knocked down", |campaign| {
            campaign.showdown_mut()?.set_knocked_down(id, knocked_down)
        })
    }

    pub fn set_priority_target(&mut self, id: SurvivorId, target: bool) -> Result<(), StoreError> {
        self.apply("set priority target", |campaign| {
            campaign.showdown_mut()?.set_priority_target(id, target)
        })
    }

    pub fn conclude_showdown(&mut self) -> Result<ShowdownConcluded, StoreError> {
        let concluded = self.apply("conclude showdown", Campaign::conclude_showdown)?;
        tracing::info!(
            settlement_id = %concluded.settlement_id,
            experienced = concluded.experienced.len(),
            at_cap = concluded.at_cap.len(),
            "Showdown concluded"
        );
        Ok(concluded)
    }

    // =========================================================================
    // Settlement phase
    // =========================================================================

    pub fn begin_settlement_phase(
        &mut self,
        settlement_id: SettlementId,
    ) -> Result<SettlementPhase, StoreError> {
        let phase = self.apply("begin settlement phase", |campaign| {
            campaign.begin_settlement_phase(settlement_id).cloned()
        })?;
        tracing::info!(settlement_id = %settlement_id, step = %phase.step(), "Settlement phase began");
        Ok(phase)
    }

    pub fn advance_settlement_phase(&mut self) -> Result<PhaseAdvance, StoreError> {
        let advance = self.apply("advance settlement phase", |campaign| {
            Ok(campaign.settlement_phase_mut()?.advance())
        })?;
        if let PhaseAdvance::Moved { from, to } = advance {
            tracing::info!(from = %from, to = %to, "Settlement phase advanced");
        }
        Ok(advance)
    }

    pub fn jump_settlement_phase(&mut self, step: SettlementPhaseStep) -> Result<PhaseJump, StoreError> {
        let jump = self.apply("jump settlement phase", |campaign| {
            Ok(campaign.settlement_phase_mut()?.jump_to(step))
        })?;
        if let PhaseJump::Moved { from, to } = jump {
            tracing::info!(from = %from, to = %to, "Settlement phase step selected");
        }
        Ok(jump)
    }

    /// Moves the phase to the step at a board position.
    pub fn jump_settlement_phase_to_position(&mut self, position: usize) -> Result<PhaseJump, StoreError> {
        let jump = self.apply("jump settlement phase", |campaign| {
            campaign.settlement_phase_mut()?.jump_to_position(position)
        })?;
        if let PhaseJump::Moved { from, to } = jump {
            tracing::info!(from = %from, to = %to, position, "Settlement phase step selected");
        }
        Ok(jump)
    }

    pub fn gain_endeavors(&mut self, amount: u32) -> Result<(), StoreError> {
        self.apply("gain endeavors", |campaign| {
            campaign.settlement_phase_mut()?.gain_endeavors(amount);
            Ok(())
        })
    }

    pub fn spend_endeavors(&mut self, amount: u32) -> Result<u32, StoreError> {
        self.apply("spend endeavors", |campaign| {
            campaign.settlement_phase_mut()?.spend_endeavors(amount)
        })
    }

    pub fn end_settlement_phase(&mut self) -> Result<SettlementPhase, StoreError> {
        let phase = self.apply("end settlement phase", Campaign::end_settlement_phase)?;
        tracing::info!(settlement_id = %phase.settlement_id(), "Settlement phase ended");
        Ok(phase)
    }

    // =========================================================================
    // Commit path
    // =========================================================================

    /// Runs a domain change against a copy and commits it.
    fn apply<R>(
        &mut self,
        action: &'static str,
        change: impl FnOnce(&mut Campaign) -> Result<R, DomainError>,
    ) -> Result<R, StoreError> {
        let mut candidate = self.campaign.clone();
        let outcome = change(&mut candidate).map_err(|err| {
            tracing::warn!(action, error = %err, "Rejected campaign change");
            StoreError::Domain(err)
        })?;
        self.commit(candidate, action)?;
        Ok(outcome)
    }

    fn commit(&mut self, candidate: Campaign, action: &'static str) -> Result<(), StoreError> {
        let document = serde_json::to_value(&candidate)?;
        self.commit_document(document, action)
    }

    fn commit_document(&mut self, document: Value, action: &'static str) -> Result<(), StoreError> {
        let validated = Campaign::safe_parse(&document).map_err(|issues| {
            tracing::warn!(action, issues = issues.len(), "Rejected campaign save");
            StoreError::Validation(issues)
        })?;
        let text = serde_json::to_string(&validated)?;
        self.storage.save(&self.key, &text).map_err(|err| {
            tracing::error!(action, key = %self.key, error = %err, "Failed to write campaign");
            StoreError::Persistence(err)
        })?;
        self.campaign = validated;
        tracing::debug!(action, bytes = text.len(), "Committed campaign");
        Ok(())
    }

    fn document(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(&self.campaign)?)
    }
}

/// Reads, migrates and validates the stored document.
fn read_campaign<S: StorageProvider>(storage: &S, key: &str) -> Result<Campaign, StoreError> {
    let Some(text) = storage.load(key).map_err(|err| {
        tracing::error!(key, error = %err, "Failed to read campaign");
        StoreError::Persistence(err)
    })?
    else {
        return Ok(Campaign::default());
    };
    let raw: Value = serde_json::from_str(&text).map_err(|err| {
        tracing::error!(key, error = %err, "Stored campaign is not JSON");
        StoreError::Persistence(StorageError::corrupted(key, err))
    })?;
    let document = migrate(raw);
    tracing::debug!(key, "Migrated stored campaign");
    Campaign::safe_parse(&document).map_err(|issues| {
        tracing::warn!(key, issues = issues.len(), "Stored campaign failed validation");
        StoreError::Validation(issues)
    })
}

fn find_by_id<'d>(document: &'d mut Value, list: &str, id: u64) -> Option<&'d mut Value> {
    document
        .get_mut(list)?
        .as_array_mut()?
        .iter_mut()
        .find(|entry| entry.get("id").and_then(Value::as_u64) == Some(id))
}

fn apply_partial(target: &mut Value, partial: &Value, path: &str) -> Result<(), StoreError> {
    if !partial.is_object() {
        return Err(Issues::single(path, "Update must be an object.").into());
    }
    merge(target, partial);
    Ok(())
}
