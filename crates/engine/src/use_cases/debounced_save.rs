//! Debounced partial saves.
//!
//! Rapid edits to one target are coalesced into a single partial update and
//! written once the input settles. Editing a different target writes the
//! pending update first, so nothing is lost when focus moves between sheets.

use serde_json::Value;

use lanternlog_domain::{MonsterId, SettlementId, SurvivorId};

use crate::infrastructure::debounce::Debouncer;
use crate::infrastructure::ports::{ClockPort, StorageProvider};
use crate::stores::{CampaignStore, Section, StoreError};

/// Entity a partial update is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Settlement(SettlementId),
    Survivor(SurvivorId),
    CustomMonster(MonsterId),
    Session(Section),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub target: SaveTarget,
    pub partial: Value,
}

pub struct DebouncedSave<C: ClockPort> {
    debouncer: Debouncer<PendingSave, C>,
}

impl<C: ClockPort> DebouncedSave<C> {
    pub fn new(clock: C, delay: std::time::Duration) -> Self {
        Self {
            debouncer: Debouncer::new(clock, delay),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.debouncer.pending()
    }

    /// Queues a partial update and restarts the delay.
    ///
    /// A pending update for another target is written immediately.
    pub fn schedule<S: StorageProvider>(
        &mut self,
        store: &mut CampaignStore<S>,
        target: SaveTarget,
        partial: Value,
    ) -> Result<(), StoreError> {
        let partial = match self.debouncer.flush() {
            Some(mut previous) if previous.target == target => {
                coalesce(&mut previous.partial, partial);
                previous.partial
            }
            Some(previous) => {
                tracing::debug!(target = ?previous.target, "Superseded debounced save");
                self.debouncer.schedule(PendingSave { target, partial });
                return write(store, previous);
            }
            None => partial,
        };
        self.debouncer.schedule(PendingSave { target, partial });
        Ok(())
    }

    /// Writes the pending update once the delay has passed.
    ///
    /// Returns whether a write happened.
    pub fn poll<S: StorageProvider>(
        &mut self,
        store: &mut CampaignStore<S>,
    ) -> Result<bool, StoreError> {
        match self.debouncer.poll() {
            Some(save) => write(store, save).map(|()| true),
            None => Ok(false),
        }
    }

    /// Writes the pending update now, as on blur or unmount.
    pub fn flush<S: StorageProvider>(
        &mut self,
        store: &mut CampaignStore<S>,
    ) -> Result<bool, StoreError> {
        match self.debouncer.flush() {
            Some(save) => write(store, save).map(|()| true),
            None => Ok(false),
        }
    }

    /// Drops the pending update without writing it.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }
}

fn write<S: StorageProvider>(
    store: &mut CampaignStore<S>,
    save: PendingSave,
) -> Result<(), StoreError> {
    let PendingSave { target, partial } = save;
    match target {
        SaveTarget::Settlement(id) => store.save_settlement(id, &partial),
        SaveTarget::Survivor(id) => store.save_survivor(id, &partial),
        SaveTarget::CustomMonster(id) => store.save_custom_monster(&id, &partial),
        SaveTarget::Session(section) => store.save_section(section, &partial),
    }
}

/// Folds a later partial into an earlier one. Unlike a store merge, `null`
/// is kept so the removal still reaches the document.
fn coalesce(earlier: &mut Value, later: Value) {
    match (earlier, later) {
        (Value::Object(fields), Value::Object(changes)) => {
            for (key, change) in changes {
                let nested = change.is_object() && fields.get(&key).is_some_and(Value::is_object);
                match fields.get_mut(&key) {
                    Some(existing) if nested => coalesce(existing, change),
                    _ => {
                        fields.insert(key, change);
                    }
                }
            }
        }
        (earlier, later) => *earlier = later,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::ports::MockStorageProvider;
    use crate::infrastructure::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use lanternlog_domain::{CampaignType, Gender, SurvivorType};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const DELAY: Duration = Duration::from_millis(300);

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::starting_at(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn wait(clock: &ManualClock, millis: i64) {
        clock.advance(chrono::Duration::milliseconds(millis));
    }

    fn settled() -> (CampaignStore<MemoryStorage>, SettlementId, SurvivorId) {
        let mut store = CampaignStore::open(MemoryStorage::new(), "campaign").unwrap();
        let settlement = store
            .create_settlement("Lanternhold", CampaignType::PeopleOfTheLantern, SurvivorType::Core)
            .unwrap();
        let survivor = store
            .create_survivor(settlement, "Allister", Gender::Male)
            .unwrap();
        (store, settlement, survivor)
    }

    mod coalescing {
        use super::*;

        #[test]
        fn keystrokes_collapse_into_one_write_after_the_delay() {
            let clock = clock();
            let (mut store, settlement, _) = settled();
            let mut saves = DebouncedSave::new(clock.clone(), DELAY);

            for limit in [1, 12, 3] {
                saves
                    .schedule(&mut store, SaveTarget::Settlement(settlement), json!({ "survivalLimit": limit }))
                    .unwrap();
                wait(&clock, 100);
            }
            assert_eq!(store.get().settlement(settlement).unwrap().survival_limit, 1);

            wait(&clock, 150);
            assert!(!saves.poll(&mut store).unwrap());
            wait(&clock, 50);
            assert!(saves.poll(&mut store).unwrap());
            assert_eq!(store.get().settlement(settlement).unwrap().survival_limit, 3);
            assert!(!saves.is_pending());
        }

        #[test]
        fn fields_from_separate_edits_are_combined() {
            let clock = clock();
            let (mut store, _, survivor) = settled();
            let mut saves = DebouncedSave::new(clock, DELAY);
            let target = SaveTarget::Survivor(survivor);

            saves.schedule(&mut store, target.clone(), json!({ "courage": 2 })).unwrap();
            saves.schedule(&mut store, target.clone(), json!({ "understanding": 1 })).unwrap();
            assert_eq!(
                saves.pending().unwrap().partial,
                json!({ "courage": 2, "understanding": 1 })
            );

            assert!(saves.flush(&mut store).unwrap());
            let saved = store.get().survivor(survivor).unwrap();
            assert_eq!((saved.courage, saved.understanding), (2, 1));
        }

        #[test]
        fn a_later_null_survives_coalescing() {
            let mut earlier = json!({ "notes": "Lost a finger", "tokens": { "luck": 1 } });
            coalesce(&mut earlier, json!({ "notes": null, "tokens": { "speed": 2 } }));
            assert_eq!(
                earlier,
                json!({ "notes": null, "tokens": { "luck": 1, "speed": 2 } })
            );
        }
    }

    mod targets {
        use super::*;

        #[test]
        fn switching_target_writes_the_pending_update_first() {
            let clock = clock();
            let (mut store, settlement, survivor) = settled();
            let mut saves = DebouncedSave::new(clock, DELAY);

            saves
                .schedule(&mut store, SaveTarget::Survivor(survivor), json!({ "insanity": 4 }))
                .unwrap();
            saves
                .schedule(&mut store, SaveTarget::Settlement(settlement), json!({ "notes": "Year 2" }))
                .unwrap();

            assert_eq!(store.get().survivor(survivor).unwrap().insanity, 4);
            assert_eq!(
                saves.pending().map(|save| &save.target),
                Some(&SaveTarget::Settlement(settlement))
            );
        }

        #[test]
        fn cancel_discards_without_writing() {
            let clock = clock();
            let (mut store, settlement, _) = settled();
            let mut saves = DebouncedSave::new(clock.clone(), DELAY);

            saves
                .schedule(&mut store, SaveTarget::Settlement(settlement), json!({ "survivalLimit": 5 }))
                .unwrap();
            assert!(saves.cancel());
            wait(&clock, 1_000);
            assert!(!saves.poll(&mut store).unwrap());
            assert_eq!(store.get().settlement(settlement).unwrap().survival_limit, 1);
        }

        #[test]
        fn invalid_update_is_reported_when_written() {
            let clock = clock();
            let (mut store, _, survivor) = settled();
            let mut saves = DebouncedSave::new(clock, DELAY);

            saves
                .schedule(&mut store, SaveTarget::Survivor(survivor), json!({ "courage": 12 }))
                .unwrap();
            let err = saves.flush(&mut store).unwrap_err();
            assert!(err.issues().unwrap().touches("survivors[0].courage"));
            assert!(!saves.is_pending());
        }
    }

    mod storage_writes {
        use super::*;

        #[test]
        fn one_write_per_settled_burst() {
            let mut storage = MockStorageProvider::new();
            storage.expect_load().returning(|_| Ok(None));
            // One for the settlement itself, one for the coalesced burst.
            storage.expect_save().times(2).returning(|_, _| Ok(()));
            let mut store = CampaignStore::open(storage, "campaign").unwrap();
            let settlement = store
                .create_settlement("Lanternhold", CampaignType::PeopleOfTheLantern, SurvivorType::Core)
                .unwrap();

            let clock = clock();
            let mut saves = DebouncedSave::new(clock.clone(), DELAY);
            for population in 1..=10 {
                saves
                    .schedule(
                        &mut store,
                        SaveTarget::Settlement(settlement),
                        json!({ "population": population }),
                    )
                    .unwrap();
                wait(&clock, 20);
            }
            wait(&clock, 300);
            assert!(saves.poll(&mut store).unwrap());
            assert_eq!(store.get().settlement(settlement).unwrap().population, 10);
        }
    }
}
