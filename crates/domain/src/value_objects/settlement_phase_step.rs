//! Ordered steps of the settlement phase.

use crate::choice_enum;
use crate::schema::Choice;

choice_enum! {
    /// A step of the settlement phase, in canonical game order.
    pub enum SettlementPhaseStep {
        SetUpSettlement => "SetUpSettlement",
        SurvivorsReturn => "SurvivorsReturn",
        GainEndeavors => "GainEndeavors",
        UpdateTimeline => "UpdateTimeline",
        UpdateDeathCount => "UpdateDeathCount",
        CheckMilestones => "CheckMilestones",
        Develop => "Develop",
        PrepareDepartingSurvivors => "PrepareDepartingSurvivors",
        SpecialShowdown => "SpecialShowdown",
        RecordAndArchiveResources => "RecordAndArchiveResources",
        EndSettlementPhase => "EndSettlementPhase",
    }
}

impl SettlementPhaseStep {
    /// Zero-based position on the phase board.
    pub fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    /// Step at a board position, if the position exists.
    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    /// Following step in canonical order; `None` after the last step.
    pub fn next(&self) -> Option<Self> {
        Self::from_position(self.position() + 1)
    }

    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SetUpSettlement => "Set Up Settlement",
            Self::SurvivorsReturn => "Survivors Return",
            Self::GainEndeavors => "Gain Endeavors",
            Self::UpdateTimeline => "Update Timeline",
            Self::UpdateDeathCount => "Update Death Count",
            Self::CheckMilestones => "Check Milestones",
            Self::Develop => "Develop",
            Self::PrepareDepartingSurvivors => "Prepare Departing Survivors",
            Self::SpecialShowdown => "Special Showdown",
            Self::RecordAndArchiveResources => "Record & Archive Resources",
            Self::EndSettlementPhase => "End Settlement Phase",
        }
    }
}

impl Default for SettlementPhaseStep {
    fn default() -> Self {
        Self::SetUpSettlement
    }
}
