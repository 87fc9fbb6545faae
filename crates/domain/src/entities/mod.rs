//! Domain entities - Records nested inside the campaign aggregates

mod custom_monster;
mod embark;
mod settlement_monsters;
mod settlement_records;
mod severe_injuries;

pub use custom_monster::{
    AiDeck, CustomMonster, HuntBoard, HuntEventType, MonsterKind, MonsterLevel,
    MonsterTimelineEntry, MonsterVariant, QuarryDetails, HUNT_BOARD_SIZE, MAX_MONSTER_LEVEL,
    MIN_MONSTER_LEVEL, RESERVED_HUNT_POSITIONS,
};
pub use embark::{MonsterSnapshot, SurvivorHuntDetails, SurvivorShowdownDetails, SurvivorTokens};
pub use settlement_monsters::{
    SettlementNemesis, SettlementQuarry, CC_LEVEL2_VICTORIES, CC_LEVEL3_VICTORIES,
};
pub use settlement_records::{
    CollectiveCognitionReward, Milestone, Principle, SettlementKnowledge, SettlementLocation,
    Suspicion, TimelineYear,
};
pub use severe_injuries::{InjuryRule, SevereInjuries};
