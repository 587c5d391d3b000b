//! Hook phases and the phase capability set declared by each effect.

use bitflags::bitflags;

/// Timing phase at which an effect hook fires.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HookPhase {
    /// Once, when the effect is registered.
    Immediate,
    BeforeAttack,
    AfterAttack,
    BeforeAttacked,
    AfterAttacked,
    /// On every ally of the defender, before the attack resolves.
    BeforeAllyAttacked,
    OnReposition,
    OnStatChange,
    OnStatusApplied,
    OnHeal,
    OnParry,
    StartTurn,
    EndTurn,
    /// On every living entity except the next actor, when the scheduler advances.
    AdvanceTurn,
    /// On the inflicter's team when a damage-over-time status ticks.
    OnOpponentDot,
    /// On the user's opponents when an attacking skill is activated.
    OnAttackSkill,
}

impl HookPhase {
    /// The capability bit for this phase.
    pub const fn flag(self) -> HookPhases {
        match self {
            Self::Immediate => HookPhases::IMMEDIATE,
            Self::BeforeAttack => HookPhases::BEFORE_ATTACK,
            Self::AfterAttack => HookPhases::AFTER_ATTACK,
            Self::BeforeAttacked => HookPhases::BEFORE_ATTACKED,
            Self::AfterAttacked => HookPhases::AFTER_ATTACKED,
            Self::BeforeAllyAttacked => HookPhases::BEFORE_ALLY_ATTACKED,
            Self::OnReposition => HookPhases::ON_REPOSITION,
            Self::OnStatChange => HookPhases::ON_STAT_CHANGE,
            Self::OnStatusApplied => HookPhases::ON_STATUS_APPLIED,
            Self::OnHeal => HookPhases::ON_HEAL,
            Self::OnParry => HookPhases::ON_PARRY,
            Self::StartTurn => HookPhases::START_TURN,
            Self::EndTurn => HookPhases::END_TURN,
            Self::AdvanceTurn => HookPhases::ADVANCE_TURN,
            Self::OnOpponentDot => HookPhases::ON_OPPONENT_DOT,
            Self::OnAttackSkill => HookPhases::ON_ATTACK_SKILL,
        }
    }
}

bitflags! {
    /// Set of phases an effect implements.
    ///
    /// The registry only hands an effect to a phase it declared, so content
    /// implements just the hooks it needs and dispatch never inspects types.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct HookPhases: u16 {
        const IMMEDIATE            = 1 << 0;
        const BEFORE_ATTACK        = 1 << 1;
        const AFTER_ATTACK         = 1 << 2;
        const BEFORE_ATTACKED      = 1 << 3;
        const AFTER_ATTACKED       = 1 << 4;
        const BEFORE_ALLY_ATTACKED = 1 << 5;
        const ON_REPOSITION        = 1 << 6;
        const ON_STAT_CHANGE       = 1 << 7;
        const ON_STATUS_APPLIED    = 1 << 8;
        const ON_HEAL              = 1 << 9;
        const ON_PARRY             = 1 << 10;
        const START_TURN           = 1 << 11;
        const END_TURN             = 1 << 12;
        const ADVANCE_TURN         = 1 << 13;
        const ON_OPPONENT_DOT      = 1 << 14;
        const ON_ATTACK_SKILL      = 1 << 15;
    }
}

impl HookPhases {
    pub const fn has(self, phase: HookPhase) -> bool {
        self.contains(phase.flag())
    }
}

impl From<HookPhase> for HookPhases {
    fn from(phase: HookPhase) -> Self {
        phase.flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_phase_has_a_distinct_bit() {
        let all = HookPhase::iter().fold(HookPhases::empty(), |acc, p| {
            assert!(!acc.has(p), "{p} shares a bit");
            acc | p.flag()
        });
        assert_eq!(all, HookPhases::all());
    }
}
