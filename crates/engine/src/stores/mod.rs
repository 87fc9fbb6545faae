//! Stores - the single path through which the campaign document changes.

mod campaign;
pub mod merge;

pub use campaign::{CampaignStore, Section, StoreError};
