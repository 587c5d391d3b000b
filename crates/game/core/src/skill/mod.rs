//! Skill interfaces.
//!
//! Skills are immutable content. An [`ActiveSkill`] turns a validated use
//! into effect grants that the engine registers; a [`PassiveSkill`] yields
//! effects registered on its owner when the encounter starts. Neither ever
//! touches the engine directly.
mod table;

pub use table::{SkillEntry, SkillTable, SkillTableBuilder};

use std::fmt;
use std::sync::Arc;

use crate::effect::{Effect, EffectKey};
use crate::state::{AttackType, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill:{}", self.0)
    }
}

/// Which side a skill may target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetSide {
    /// The user only. Targets are ignored and replaced by the user.
    User,
    Ally,
    Enemy,
}

/// Target arity and side constraints checked before a skill activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Targeting {
    pub side: TargetSide,
    pub min: usize,
    pub max: usize,
}

impl Targeting {
    pub const fn user() -> Self {
        Self {
            side: TargetSide::User,
            min: 0,
            max: 0,
        }
    }

    pub const fn single(side: TargetSide) -> Self {
        Self { side, min: 1, max: 1 }
    }

    pub const fn up_to(side: TargetSide, max: usize) -> Self {
        Self { side, min: 1, max }
    }

    pub const fn accepts(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

/// A validated skill activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillUse {
    pub skill: SkillId,
    pub user: EntityId,
    pub targets: Vec<EntityId>,
    /// Free-form integer chosen by the decision (e.g. a reposition amount).
    pub parameter: i32,
}

impl SkillUse {
    /// Key for the `slot`-th effect granted by this use.
    pub fn key(&self, slot: u8) -> EffectKey {
        EffectKey::Skill {
            skill: self.skill,
            source: self.user,
            slot,
        }
    }
}

/// An effect to register on `recipient`.
#[derive(Clone, Debug)]
pub struct EffectGrant {
    pub recipient: EntityId,
    pub effect: Arc<dyn Effect>,
}

impl EffectGrant {
    pub fn new(recipient: EntityId, effect: Arc<dyn Effect>) -> Self {
        Self { recipient, effect }
    }
}

/// Attack resolved right after an attacking skill activates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillAttack {
    pub is_physical: bool,
    pub attack_type: Option<AttackType>,
}

pub trait ActiveSkill: Send + Sync {
    fn id(&self) -> SkillId;

    fn name(&self) -> &str;

    fn targeting(&self) -> Targeting;

    fn mana_cost(&self) -> u32 {
        0
    }

    /// Multiplier on the base action-timer usage.
    fn time_multiplier(&self) -> f64 {
        1.0
    }

    /// Toggles stay on until used again; their effects skip the first tick.
    fn is_toggle(&self) -> bool {
        false
    }

    /// Attack resolved against the first target after activation.
    fn attack(&self) -> Option<SkillAttack> {
        None
    }

    /// Effects to register for this use, in slot order.
    fn activate(&self, usage: &SkillUse) -> Vec<EffectGrant>;
}

pub trait PassiveSkill: Send + Sync {
    fn id(&self) -> SkillId;

    fn name(&self) -> &str;

    /// Effects registered on `owner` when the encounter starts.
    fn effects(&self, owner: EntityId) -> Vec<Arc<dyn Effect>>;
}

impl fmt::Debug for dyn ActiveSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSkill")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Debug for dyn PassiveSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassiveSkill")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}
