//! Value objects - Immutable objects defined by their attributes

mod campaign_type;
mod resource;
mod settlement_phase_step;
mod turn;

pub use campaign_type::{CampaignType, SurvivorType};
pub use resource::{Resource, ResourceCategory, ResourceType};
pub use settlement_phase_step::SettlementPhaseStep;
pub use turn::{
    AmbushType, MonsterTurnState, ShowdownTurn, ShowdownType, SurvivorTurnState, TurnType,
};
