//! Attack outcome records.

use crate::state::{AttackType, EntityId};

/// Result of one attack resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub attacker: EntityId,
    pub defender: EntityId,
    /// Distance between the pair when the attack was declared.
    pub distance: u8,
    pub in_range: bool,
    /// Hit threshold used for the roll (0 when out of range or dodged).
    pub hit_chance: f64,
    pub hit: bool,
    pub crit: bool,
    /// A registered parry consumed this attack.
    pub parried: bool,
    /// HP actually removed from the defender.
    pub damage: u32,
    pub killed: bool,
    pub is_bonus: bool,
    pub is_physical: bool,
    pub attack_type: AttackType,
}

/// Every attack resolved for one action: the primary attack, its repeat if
/// any, then queued bonus attacks in FIFO order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackChain {
    pub results: Vec<AttackResult>,
    /// Bonus attacks discarded after the per-action bound was reached.
    pub dropped_bonus_attacks: usize,
}

impl AttackChain {
    pub fn primary(&self) -> Option<&AttackResult> {
        self.results.first()
    }

    pub fn total_damage(&self) -> u64 {
        self.results.iter().map(|r| u64::from(r.damage)).sum()
    }

    pub fn bonus_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_bonus).count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
