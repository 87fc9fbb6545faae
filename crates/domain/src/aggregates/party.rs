//! Checks shared by the hunt and showdown embark sessions.

use crate::error::DomainError;
use crate::ids::SurvivorId;
use crate::schema::{Bounds, Fields, SchemaContext};

pub const MIN_PARTY_SIZE: usize = 1;
pub const MAX_PARTY_SIZE: usize = 4;

/// Reads the `survivors` id list: 1 to 4 distinct ids.
pub(crate) fn read_party(f: &Fields<'_>, cx: &mut SchemaContext, session: &str) -> Vec<SurvivorId> {
    let ids: Vec<SurvivorId> = f
        .numbers(cx, "survivors", "Survivors")
        .into_iter()
        .map(SurvivorId::new)
        .collect();
    cx.at("survivors", |cx| {
        if let Err(err) = check_party(&ids, session) {
            cx.report(rule_message(err));
        }
    });
    ids
}

/// Party size and uniqueness rule, shared by parsing and constructors.
pub(crate) fn check_party(ids: &[SurvivorId], session: &str) -> Result<(), DomainError> {
    if ids.len() < MIN_PARTY_SIZE {
        return Err(DomainError::validation(format!(
            "A {session} needs at least {MIN_PARTY_SIZE} survivor."
        )));
    }
    if ids.len() > MAX_PARTY_SIZE {
        return Err(DomainError::validation(format!(
            "A {session} may not have more than {MAX_PARTY_SIZE} survivors."
        )));
    }
    if let Some(duplicate) = ids
        .iter()
        .enumerate()
        .find_map(|(index, id)| ids[..index].contains(id).then_some(id))
    {
        return Err(DomainError::validation(format!(
            "Survivor {duplicate} is listed more than once."
        )));
    }
    Ok(())
}

/// Optional scout, who must be one of the party.
pub(crate) fn read_scout(
    f: &Fields<'_>,
    cx: &mut SchemaContext,
    party: &[SurvivorId],
) -> Option<SurvivorId> {
    let scout = f
        .optional_count(cx, "scout", "Scout", Bounds::non_negative())
        .map(SurvivorId::new)?;
    if !party.contains(&scout) {
        cx.report_at("scout", format!("Scout {scout} is not part of the party."));
    }
    Some(scout)
}

/// Every party member has exactly one details entry and no one else does.
pub(crate) fn check_details(
    party: &[SurvivorId],
    detail_ids: &[SurvivorId],
    cx: &mut SchemaContext,
) {
    cx.at("survivorDetails", |cx| {
        for (index, id) in detail_ids.iter().enumerate() {
            if !party.contains(id) {
                cx.at(index, |cx| {
                    cx.report_at("id", format!("Survivor {id} is not part of the party."))
                });
            } else if detail_ids[..index].contains(id) {
                cx.at(index, |cx| {
                    cx.report_at("id", format!("Survivor {id} has more than one details entry."))
                });
            }
        }
        for id in party {
            if !detail_ids.contains(id) {
                cx.report(format!("Survivor {id} has no details entry."));
            }
        }
    });
}

pub(crate) fn check_monsters(count: usize, session: &str, cx: &mut SchemaContext) {
    if count == 0 {
        cx.report_at("monsters", format!("A {session} needs at least one monster."));
    }
}

fn rule_message(err: DomainError) -> String {
    match err {
        DomainError::Validation(message) => message,
        other => other.to_string(),
    }
}
