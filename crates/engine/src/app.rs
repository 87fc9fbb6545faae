//! Application state and composition.

use std::sync::Arc;

use serde::Serialize;

use lanternlog_domain::Campaign;

use crate::infrastructure::{
    clock::SystemClock,
    config::TrackerConfig,
    ports::{ClockPort, StorageProvider},
    storage::FileStorage,
};
use crate::stores::{CampaignStore, StoreError};
use crate::use_cases::{self, DebouncedSave, Export, ImportError};

/// Main application state.
///
/// Owns the campaign store and the clock shared by exports and debounced saves.
pub struct App<S: StorageProvider = FileStorage> {
    config: TrackerConfig,
    store: CampaignStore<S>,
    clock: Arc<dyn ClockPort>,
}

impl App<FileStorage> {
    /// Opens the file-backed campaign described by `config`.
    pub fn open(config: TrackerConfig) -> Result<Self, StoreError> {
        let storage = FileStorage::new(config.data_dir.clone());
        Self::with_storage(config, storage, Arc::new(SystemClock::new()))
    }
}

impl<S: StorageProvider> App<S> {
    pub fn with_storage(
        config: TrackerConfig,
        storage: S,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Self, StoreError> {
        let store = CampaignStore::open(storage, config.storage_key.clone())?;
        Ok(Self {
            config,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn campaign(&self) -> &Campaign {
        self.store.get()
    }

    pub fn store(&self) -> &CampaignStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CampaignStore<S> {
        &mut self.store
    }

    /// A debouncer for edits, using the configured delay.
    pub fn debounced_saves(&self) -> DebouncedSave<Arc<dyn ClockPort>> {
        DebouncedSave::new(self.clock.clone(), self.config.debounce)
    }

    pub fn import(&mut self, text: &str) -> Result<&Campaign, ImportError> {
        use_cases::import_campaign(&mut self.store, text)
    }

    pub fn export(&self) -> Result<Export, serde_json::Error> {
        use_cases::export_with(self.store.get(), &self.clock)
    }

    /// Lines describing a failed import, capped by configuration.
    pub fn import_report(&self, error: &ImportError) -> Vec<String> {
        error.report(self.config.max_reported_issues)
    }

    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::of(self.store.get())
    }
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatus {
    pub version: u32,
    pub embark_state: String,
    pub settlements: Vec<SettlementStatus>,
    pub custom_monsters: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementStatus {
    pub id: u32,
    pub name: String,
    pub campaign_type: String,
    pub lantern_year: usize,
    pub population: u32,
    pub living_survivors: usize,
    pub dead_survivors: usize,
}

impl CampaignStatus {
    pub fn of(campaign: &Campaign) -> Self {
        let settlements = campaign
            .settlements()
            .iter()
            .map(|settlement| {
                let (dead, living): (Vec<_>, Vec<_>) = campaign
                    .survivors_of(settlement.id)
                    .partition(|survivor| survivor.dead);
                SettlementStatus {
                    id: settlement.id.get(),
                    name: settlement.name.clone(),
                    campaign_type: settlement.campaign_type.to_string(),
                    lantern_year: settlement.current_year(),
                    population: settlement.population,
                    living_survivors: living.len(),
                    dead_survivors: dead.len(),
                }
            })
            .collect();
        Self {
            version: campaign.version(),
            embark_state: campaign.embark_state().to_string(),
            settlements,
            custom_monsters: campaign.custom_monsters().len(),
        }
    }
}
