//! Campaign import and export.
//!
//! Imports go through the same migration and validation as stored
//! documents and replace the whole campaign only when both succeed.
//! Exports are the current document as indented JSON, untransformed.

use chrono::{DateTime, Utc};

use lanternlog_domain::{migrate, Campaign, Issues, Schema};

use crate::infrastructure::ports::{ClockPort, StorageProvider};
use crate::stores::{CampaignStore, StoreError};

const EXPORT_PREFIX: &str = "lanternlog-campaign";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Imported campaign is invalid: {0}")]
    Validation(#[from] Issues),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Lines to show the user, with validation issues capped at `limit`.
    pub fn report(&self, limit: usize) -> Vec<String> {
        match self {
            Self::Validation(issues) | Self::Store(StoreError::Validation(issues)) => {
                issues.report(limit)
            }
            other => vec![other.to_string()],
        }
    }
}

/// A rendered export ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

/// Parses, migrates and validates an import file without touching any store.
pub fn parse_campaign(text: &str) -> Result<Campaign, ImportError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let document = migrate(raw);
    Ok(Campaign::safe_parse(&document)?)
}

/// Replaces the stored campaign with an import file.
pub fn import_campaign<'s, S: StorageProvider>(
    store: &'s mut CampaignStore<S>,
    text: &str,
) -> Result<&'s Campaign, ImportError> {
    let campaign = parse_campaign(text).map_err(|err| {
        tracing::warn!(error = %err, "Rejected campaign import");
        err
    })?;
    let settlements = campaign.settlements().len();
    let survivors = campaign.survivors().len();
    store.replace(campaign)?;
    tracing::info!(settlements, survivors, "Imported campaign");
    Ok(store.get())
}

/// Renders the campaign as indented JSON.
pub fn export_campaign(campaign: &Campaign) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(campaign)
}

/// Dated download name, e.g. `lanternlog-campaign-2025-03-01.json`.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{EXPORT_PREFIX}-{}.json", at.format("%Y-%m-%d"))
}

pub fn export_with<C: ClockPort>(campaign: &Campaign, clock: &C) -> Result<Export, serde_json::Error> {
    let contents = export_campaign(campaign)?;
    let file_name = export_file_name(clock.now());
    tracing::info!(file_name = %file_name, bytes = contents.len(), "Exported campaign");
    Ok(Export {
        file_name,
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockClockPort;
    use crate::infrastructure::storage::MemoryStorage;
    use chrono::TimeZone;
    use lanternlog_domain::{CampaignType, Gender, SurvivorType, DEFAULT_REPORT_LIMIT};
    use serde_json::json;

    fn store() -> CampaignStore<MemoryStorage> {
        CampaignStore::open(MemoryStorage::new(), "campaign").unwrap()
    }

    fn populated() -> CampaignStore<MemoryStorage> {
        let mut store = store();
        let settlement = store
            .create_settlement("Lanternhold", CampaignType::PeopleOfTheStars, SurvivorType::Core)
            .unwrap();
        store
            .create_survivor(settlement, "Allister", Gender::Male)
            .unwrap();
        store
    }

    mod import {
        use super::*;

        #[test]
        fn legacy_file_is_migrated_and_replaces_the_campaign() {
            let mut store = populated();
            let text = json!({
                "settlements": [{ "id": 4, "name": "Old Town", "collectiveCognition": 2 }],
                "survivors": [],
            })
            .to_string();

            let campaign = import_campaign(&mut store, &text).unwrap();
            assert_eq!(campaign.settlements().len(), 1);
            assert_eq!(campaign.settlements()[0].cc_value, 2);
            assert!(campaign.survivors().is_empty());
        }

        #[test]
        fn malformed_json_is_a_parse_error_and_changes_nothing() {
            let mut store = populated();
            let before = store.get().clone();

            let err = import_campaign(&mut store, "{ \"settlements\": [").unwrap_err();
            assert!(matches!(err, ImportError::Parse(_)));
            assert_eq!(err.report(DEFAULT_REPORT_LIMIT).len(), 1);
            assert_eq!(store.get(), &before);
        }

        #[test]
        fn invalid_file_reports_at_most_ten_issues() {
            let mut store = populated();
            let before = store.get().clone();
            let survivors: Vec<_> = (1..=12)
                .map(|id| json!({ "id": id, "settlementId": 1, "courage": 10 }))
                .collect();
            let text = json!({
                "settlements": [{ "id": 1, "name": "Lanternhold" }],
                "survivors": survivors,
            })
            .to_string();

            let err = import_campaign(&mut store, &text).unwrap_err();
            let report = err.report(DEFAULT_REPORT_LIMIT);
            assert_eq!(report.len(), 11);
            assert_eq!(report[0], "survivors[0].courage: Courage may not exceed 9.");
            assert_eq!(report[10], "...and 2 more");
            assert_eq!(store.get(), &before);
        }
    }

    mod export {
        use super::*;

        #[test]
        fn export_round_trips_through_import() {
            let source = populated();
            let contents = export_campaign(source.get()).unwrap();
            assert!(contents.contains("\n  \"settlements\""));

            let mut target = store();
            let imported = import_campaign(&mut target, &contents).unwrap();
            assert_eq!(imported, source.get());
        }

        #[test]
        fn file_name_uses_the_clock_date() {
            let mut clock = MockClockPort::new();
            clock
                .expect_now()
                .returning(|| Utc.with_ymd_and_hms(2025, 11, 3, 23, 59, 0).unwrap());

            let export = export_with(&Campaign::default(), &clock).unwrap();
            assert_eq!(export.file_name, "lanternlog-campaign-2025-11-03.json");
            assert_eq!(parse_campaign(&export.contents).unwrap(), Campaign::default());
        }
    }
}
