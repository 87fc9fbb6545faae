//! Settlement aggregate - the settlement sheet a campaign is played from
//!
//! A settlement is a document edited row by row from the tracker, so its
//! sheet values are public. Every change is re-validated through
//! [`Schema::parse`] before it is committed, which is where the sheet's
//! invariants are enforced:
//!
//! - numeric values are non-negative, `survivalLimit` is at least 1
//! - `suspicions` exists if and only if the campaign is Squires of the Citadel
//! - principles have at most one option selected

use serde::Serialize;
use serde_json::Value;

use crate::entities::{
    CollectiveCognitionReward, Milestone, Principle, SettlementKnowledge, SettlementLocation,
    SettlementNemesis, SettlementQuarry, Suspicion, TimelineYear,
};
use crate::error::DomainError;
use crate::ids::SettlementId;
use crate::schema::{Bounds, Fields, Schema, SchemaContext};
use crate::value_objects::{CampaignType, Resource, SurvivorType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: SettlementId,
    pub name: String,
    pub campaign_type: CampaignType,
    pub survivor_type: SurvivorType,
    pub survival_limit: u32,
    pub population: u32,
    pub death_count: u32,
    pub lost_settlements: u32,
    pub timeline: Vec<TimelineYear>,
    pub quarries: Vec<SettlementQuarry>,
    pub nemeses: Vec<SettlementNemesis>,
    pub milestones: Vec<Milestone>,
    pub principles: Vec<Principle>,
    pub innovations: Vec<String>,
    pub locations: Vec<SettlementLocation>,
    pub resources: Vec<Resource>,
    pub gear: Vec<String>,
    pub patterns: Vec<String>,
    pub seed_patterns: Vec<String>,
    pub notes: String,

    // Arc
    pub knowledges: Vec<SettlementKnowledge>,
    pub philosophies: Vec<String>,
    pub cc_rewards: Vec<CollectiveCognitionReward>,
    pub cc_value: u32,

    // Squires of the Citadel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspicions: Option<Vec<Suspicion>>,
}

impl Settlement {
    /// A fresh settlement sheet for the given campaign.
    pub fn new(
        id: SettlementId,
        name: impl Into<String>,
        campaign_type: CampaignType,
        survivor_type: SurvivorType,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Settlement name is required."));
        }
        Ok(Self {
            id,
            name,
            campaign_type,
            survivor_type,
            survival_limit: 1,
            population: 0,
            death_count: 0,
            lost_settlements: 0,
            timeline: Vec::new(),
            quarries: Vec::new(),
            nemeses: Vec::new(),
            milestones: Vec::new(),
            principles: Vec::new(),
            innovations: Vec::new(),
            locations: Vec::new(),
            resources: Vec::new(),
            gear: Vec::new(),
            patterns: Vec::new(),
            seed_patterns: Vec::new(),
            notes: String::new(),
            knowledges: Vec::new(),
            philosophies: Vec::new(),
            cc_rewards: Vec::new(),
            cc_value: 0,
            suspicions: campaign_type.tracks_suspicions().then(Vec::new),
        })
    }

    /// Lantern year currently being played: the first year not completed.
    pub fn current_year(&self) -> usize {
        self.timeline
            .iter()
            .position(|year| !year.completed)
            .unwrap_or(self.timeline.len())
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.name == name)
    }
}

impl Schema for Settlement {
    fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
        let f = Fields::of(value, "Settlement", cx);
        let campaign_type = f.choice(
            cx,
            "campaignType",
            "Campaign type",
            CampaignType::PeopleOfTheLantern,
        );
        let count = |cx: &mut SchemaContext, key: &str, label: &str| {
            f.count(cx, key, label, Bounds::non_negative())
        };

        let settlement = Self {
            id: SettlementId::new(count(cx, "id", "Settlement id")),
            name: f.required_text(cx, "name", "Settlement name"),
            campaign_type,
            survivor_type: f.choice(cx, "survivorType", "Survivor type", SurvivorType::Core),
            survival_limit: f.count(cx, "survivalLimit", "Survival limit", Bounds::at_least(1)),
            population: count(cx, "population", "Population"),
            death_count: count(cx, "deathCount", "Death count"),
            lost_settlements: count(cx, "lostSettlements", "Lost settlements"),
            timeline: f.list(cx, "timeline", "Timeline"),
            quarries: f.list(cx, "quarries", "Quarries"),
            nemeses: f.list(cx, "nemeses", "Nemeses"),
            milestones: f.list(cx, "milestones", "Milestones"),
            principles: f.list(cx, "principles", "Principles"),
            innovations: f.strings(cx, "innovations", "Innovations", None),
            locations: f.list(cx, "locations", "Locations"),
            resources: f.list(cx, "resources", "Resources"),
            gear: f.strings(cx, "gear", "Gear", None),
            patterns: f.strings(cx, "patterns", "Patterns", None),
            seed_patterns: f.strings(cx, "seedPatterns", "Seed patterns", None),
            notes: f.text(cx, "notes", "Notes"),
            knowledges: f.list(cx, "knowledges", "Knowledges"),
            philosophies: f.strings(cx, "philosophies", "Philosophies", None),
            cc_rewards: f.list(cx, "ccRewards", "Collective cognition rewards"),
            cc_value: count(cx, "ccValue", "Collective cognition"),
            suspicions: if campaign_type.tracks_suspicions() {
                Some(f.list(cx, "suspicions", "Suspicions"))
            } else {
                if f.has("suspicions") {
                    cx.report_at(
                        "suspicions",
                        format!("Suspicions are only tracked by {}.", CampaignType::SquiresOfTheCitadel),
                    );
                }
                None
            },
        };

        if campaign_type.tracks_suspicions() && !f.has("suspicions") {
            cx.report_at("suspicions", "Suspicions are required for this campaign type.");
        }
        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lantern() -> Value {
        json!({
            "id": 1,
            "name": "Lanternhold",
            "campaignType": "People of the Lantern",
            "survivorType": "Core",
        })
    }

    mod defaults {
        use super::*;

        #[test]
        fn minimal_settlement_is_filled_in() {
            let settlement = Settlement::safe_parse(&lantern()).unwrap();
            assert_eq!(settlement.survival_limit, 1);
            assert_eq!(settlement.population, 0);
            assert!(settlement.timeline.is_empty());
            assert!(settlement.suspicions.is_none());
        }

        #[test]
        fn name_is_required() {
            let issues = Settlement::safe_parse(&json!({ "id": 1 })).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().to_string(),
                "name: Settlement name is required."
            );
        }

        #[test]
        fn new_settlement_matches_parsed_defaults() {
            let built = Settlement::new(
                SettlementId::new(1),
                "Lanternhold",
                CampaignType::PeopleOfTheLantern,
                SurvivorType::Core,
            )
            .unwrap();
            assert_eq!(Settlement::safe_parse(&lantern()).unwrap(), built);
        }

        #[test]
        fn new_rejects_blank_name() {
            let result = Settlement::new(
                SettlementId::new(1),
                " ",
                CampaignType::PeopleOfTheLantern,
                SurvivorType::Core,
            );
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
    }

    mod bounds {
        use super::*;

        #[test]
        fn survival_limit_must_be_at_least_one() {
            let mut doc = lantern();
            doc["survivalLimit"] = json!(0);
            let issues = Settlement::safe_parse(&doc).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().message,
                "Survival limit must be at least 1."
            );

            doc["survivalLimit"] = json!(1);
            assert!(Settlement::safe_parse(&doc).is_ok());
        }

        #[test]
        fn counters_may_not_be_negative() {
            for (key, label) in [
                ("population", "Population"),
                ("deathCount", "Death count"),
                ("lostSettlements", "Lost settlements"),
                ("ccValue", "Collective cognition"),
            ] {
                let mut doc = lantern();
                doc[key] = json!(-1);
                let issues = Settlement::safe_parse(&doc).unwrap_err();
                let issue = issues.iter().next().unwrap();
                assert_eq!(issue.path, key);
                assert_eq!(issue.message, format!("{label} may not be negative."));

                doc[key] = json!(0);
                assert!(Settlement::safe_parse(&doc).is_ok(), "{key} at 0");
            }
        }

        #[test]
        fn nested_resource_issue_has_full_path() {
            let mut doc = lantern();
            doc["resources"] = json!([
                { "name": "Bone", "category": "Basic", "types": ["Bone"], "amount": 2 },
                { "name": "Hide", "category": "Basic", "types": ["Hide"], "amount": -1 },
            ]);
            let issues = Settlement::safe_parse(&doc).unwrap_err();
            assert_eq!(issues.iter().next().unwrap().path, "resources[1].amount");
        }
    }

    mod suspicions {
        use super::*;

        #[test]
        fn squires_require_suspicions() {
            let mut doc = lantern();
            doc["campaignType"] = json!("Squires of the Citadel");
            let issues = Settlement::safe_parse(&doc).unwrap_err();
            assert!(issues.touches("suspicions"));

            doc["suspicions"] = json!([{ "name": "Cyclops", "level1": true }]);
            let settlement = Settlement::safe_parse(&doc).unwrap();
            assert_eq!(settlement.suspicions.unwrap()[0].level(), 1);
        }

        #[test]
        fn other_campaigns_may_not_track_suspicions() {
            let mut doc = lantern();
            doc["suspicions"] = json!([]);
            let issues = Settlement::safe_parse(&doc).unwrap_err();
            assert_eq!(
                issues.iter().next().unwrap().message,
                "Suspicions are only tracked by Squires of the Citadel."
            );
        }

        #[test]
        fn new_squires_settlement_starts_with_empty_suspicions() {
            let settlement = Settlement::new(
                SettlementId::new(2),
                "Citadel",
                CampaignType::SquiresOfTheCitadel,
                SurvivorType::Core,
            )
            .unwrap();
            assert_eq!(settlement.suspicions, Some(Vec::new()));
        }
    }

    mod behaviour {
        use super::*;

        #[test]
        fn current_year_is_first_incomplete_year() {
            let mut doc = lantern();
            doc["timeline"] = json!([
                { "completed": true, "entries": ["Returning Survivors"] },
                { "completed": false, "entries": [] },
            ]);
            let settlement = Settlement::safe_parse(&doc).unwrap();
            assert_eq!(settlement.current_year(), 1);
        }

        #[test]
        fn round_trips_through_json() {
            let mut doc = lantern();
            doc["principles"] = json!([{
                "name": "New Life",
                "option1Name": "Protect the Young",
                "option1Selected": true,
                "option2Name": "Survival of the Fittest",
            }]);
            doc["quarries"] = json!([{ "name": "White Lion", "ccLevel2": [true, false] }]);
            let parsed = Settlement::safe_parse(&doc).unwrap();
            let json = serde_json::to_value(&parsed).unwrap();
            assert_eq!(Settlement::safe_parse(&json).unwrap(), parsed);
        }
    }
}
