//! Severe injury counters.
//!
//! Stored flat on the survivor document (`brokenArm: 1`), each counter is
//! capped at the number of times that injury can be suffered.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{Bounds, Fields, Schema, SchemaContext};

/// Static description of one severe injury counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjuryRule {
    pub key: &'static str,
    pub label: &'static str,
    pub max: u32,
}

macro_rules! severe_injuries {
    ($($field:ident => ($key:literal, $label:literal, $max:literal)),+ $(,)?) => {
        /// Severe injury counts; every counter defaults to 0.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        #[serde(rename_all = "camelCase")]
        pub struct SevereInjuries {
            $(pub $field: u32,)+
        }

        impl SevereInjuries {
            /// Every counter with its key, label and cap.
            pub const RULES: &'static [InjuryRule] = &[
                $(InjuryRule {
                    key: $key,
                    label: $label,
                    max: $max,
                },)+
            ];

            /// Reads the counters from an already opened object, so they can
            /// sit flat on the survivor document.
            pub(crate) fn read(f: &Fields<'_>, cx: &mut SchemaContext) -> Self {
                Self {
                    $($field: f.count(cx, $key, $label, Bounds::range(0, $max)),)+
                }
            }
        }

        impl Schema for SevereInjuries {
            fn parse(value: &Value, cx: &mut SchemaContext) -> Self {
                let f = Fields::of(value, "Severe injuries", cx);
                Self::read(&f, cx)
            }
        }
    };
}

severe_injuries! {
    intracranial_hemorrhage => ("intracranialHemorrhage", "Intracranial hemorrhage", 1),
    deaf => ("deaf", "Deaf", 1),
    blind => ("blind", "Blind", 2),
    shattered_jaw => ("shatteredJaw", "Shattered jaw", 1),
    dismembered_arm => ("dismemberedArm", "Dismembered arm", 2),
    ruptured_muscle => ("rupturedMuscle", "Ruptured muscle", 1),
    contracture => ("contracture", "Contracture", 5),
    broken_arm => ("brokenArm", "Broken arm", 2),
    gaping_chest_wound => ("gapingChestWound", "Gaping chest wound", 5),
    destroyed_back => ("destroyedBack", "Destroyed back", 1),
    broken_rib => ("brokenRib", "Broken rib", 5),
    intestinal_prolapse => ("intestinalProlapse", "Intestinal prolapse", 1),
    warped_pelvis => ("warpedPelvis", "Warped pelvis", 5),
    destroyed_genitals => ("destroyedGenitals", "Destroyed genitals", 1),
    broken_hip => ("brokenHip", "Broken hip", 1),
    dismembered_leg => ("dismemberedLeg", "Dismembered leg", 2),
    hamstrung => ("hamstrung", "Hamstrung", 1),
    broken_leg => ("brokenLeg", "Broken leg", 2),
}
