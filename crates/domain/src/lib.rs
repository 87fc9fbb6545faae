//! Lanternlog domain layer.
//!
//! Everything needed to validate, upgrade and evolve a campaign document
//! without touching storage:
//!
//! - `schema/` - Field readers and the `path: message` issue list
//! - `entities/`, `value_objects/` - Records nested inside the campaign
//! - `aggregates/` - Settlements, survivors, embark sessions and the campaign root
//! - `migration/` - Upgrades older saved documents to the current shape
//! - `events/` - Outcomes of state machine transitions

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod migration;
pub mod schema;
pub mod value_objects;

pub use aggregates::{
    opening_turn, Campaign, EmbarkState, Gender, Hunt, Settlement, SettlementPhase, Showdown,
    Survivor, SurvivorKnowledge, CAMPAIGN_VERSION, MAX_PARTY_SIZE, MIN_PARTY_SIZE,
};

pub use entities::{
    AiDeck, CollectiveCognitionReward, CustomMonster, HuntBoard, HuntEventType,
    InjuryRule, Milestone, MonsterKind, MonsterLevel, MonsterSnapshot, MonsterTimelineEntry,
    MonsterVariant, Principle, QuarryDetails, SettlementKnowledge, SettlementLocation,
    SettlementNemesis, SettlementQuarry, SevereInjuries, Suspicion, SurvivorHuntDetails,
    SurvivorShowdownDetails, SurvivorTokens, TimelineYear,
};

pub use error::DomainError;
pub use events::{PhaseAdvance, PhaseJump, ShowdownConcluded, TurnChange};
pub use ids::{MonsterId, SettlementId, SurvivorId};
pub use migration::migrate;
pub use schema::{Choice, Issue, Issues, Schema, SchemaContext, DEFAULT_REPORT_LIMIT};

pub use value_objects::{
    AmbushType, CampaignType, MonsterTurnState, Resource, ResourceCategory, ResourceType,
    SettlementPhaseStep, ShowdownTurn, ShowdownType, SurvivorTurnState, SurvivorType, TurnType,
};
