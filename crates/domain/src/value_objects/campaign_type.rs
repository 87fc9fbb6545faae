//! Campaign and survivor rule variants.
//!
//! The campaign type decides which optional settlement sections exist; the
//! survivor type (Core or Arc) switches on the Arc-only survivor fields and
//! tighter fighting-art limits.

use crate::choice_enum;

choice_enum! {
    /// The campaign a settlement is playing.
    pub enum CampaignType {
        PeopleOfTheLantern => "People of the Lantern",
        PeopleOfTheDreamKeeper => "People of the Dream Keeper",
        PeopleOfTheStars => "People of the Stars",
        PeopleOfTheSun => "People of the Sun",
        SquiresOfTheCitadel => "Squires of the Citadel",
        Custom => "Custom",
    }
}

impl CampaignType {
    /// Squires of the Citadel track survivor suspicions; no other campaign does.
    pub fn tracks_suspicions(&self) -> bool {
        matches!(self, Self::SquiresOfTheCitadel)
    }
}

impl Default for CampaignType {
    fn default() -> Self {
        Self::PeopleOfTheLantern
    }
}

choice_enum! {
    /// Survivor rules used by a settlement.
    pub enum SurvivorType {
        Core => "Core",
        Arc => "Arc",
    }
}

impl SurvivorType {
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc)
    }
}

impl Default for SurvivorType {
    fn default() -> Self {
        Self::Core
    }
}
