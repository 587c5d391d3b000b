//! Enchantments: effects that override the wielder's attack attribute and
//! grant stat bonuses only while they sit on top of the enchantment stack.
//!
//! The engine owns the stack bookkeeping (see
//! [`CombatEngine::add_effect`](crate::engine::CombatEngine::add_effect)):
//! pushing an enchantment reverts the previous top's bonus and freezes its
//! counter; removing the top reverts its bonus and reactivates the new top.

use crate::state::Attribute;
use crate::stats::StatBonus;

use super::{Effect, EffectKey, HookPhases};

#[derive(Clone, Debug, PartialEq)]
pub struct Enchantment {
    pub key: EffectKey,
    pub name: String,
    pub attribute: Attribute,
    pub bonus: StatBonus,
    pub duration: Option<u32>,
}

impl Enchantment {
    pub fn new(key: EffectKey, name: impl Into<String>, attribute: Attribute) -> Self {
        Self {
            key,
            name: name.into(),
            attribute,
            bonus: StatBonus::default(),
            duration: None,
        }
    }

    pub fn with_bonus(mut self, bonus: StatBonus) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl Effect for Enchantment {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::empty()
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn expiration_message(&self) -> Option<String> {
        Some(format!("{} fades.", self.name))
    }

    fn as_enchantment(&self) -> Option<&Enchantment> {
        Some(self)
    }
}
