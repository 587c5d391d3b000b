//! Entity templates: the static description an encounter instantiates.

use std::fmt;
use std::sync::Arc;

use crate::skill::{ActiveSkill, PassiveSkill};
use crate::stats::BaseStats;

/// How an entity delivers its basic attack. Parries key off this.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
    Magic,
}

impl AttackType {
    /// Basic attacks of this type resolve against ATK/DEF.
    pub const fn is_physical(self) -> bool {
        !matches!(self, Self::Magic)
    }
}

/// Elemental attribute carried by attacks and matched against weaknesses.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    #[default]
    Neutral,
    Fire,
    Ice,
    Lightning,
    Earth,
    Light,
    Dark,
    Poison,
}

/// Immutable template for an entity joining an encounter.
///
/// Weaknesses and resistances are lists of attributes; an attribute may
/// appear more than once to stack.
#[derive(Clone)]
pub struct CombatEntity {
    pub name: String,
    pub level: u32,
    pub base: BaseStats,
    pub attack_type: AttackType,
    pub attribute: Attribute,
    pub weaknesses: Vec<Attribute>,
    pub resistances: Vec<Attribute>,
    pub passives: Vec<Arc<dyn PassiveSkill>>,
    pub actives: Vec<Arc<dyn ActiveSkill>>,
}

impl CombatEntity {
    pub fn new(name: impl Into<String>, base: BaseStats) -> Self {
        Self {
            name: name.into(),
            level: 1,
            base,
            attack_type: AttackType::default(),
            attribute: Attribute::default(),
            weaknesses: Vec::new(),
            resistances: Vec::new(),
            passives: Vec::new(),
            actives: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_attack_type(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attribute = attribute;
        self
    }

    pub fn with_weakness(mut self, attribute: Attribute) -> Self {
        self.weaknesses.push(attribute);
        self
    }

    pub fn with_resistance(mut self, attribute: Attribute) -> Self {
        self.resistances.push(attribute);
        self
    }

    pub fn with_passive(mut self, passive: Arc<dyn PassiveSkill>) -> Self {
        self.passives.push(passive);
        self
    }

    pub fn with_active(mut self, active: Arc<dyn ActiveSkill>) -> Self {
        self.actives.push(active);
        self
    }
}

impl fmt::Debug for CombatEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEntity")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("attack_type", &self.attack_type)
            .field("attribute", &self.attribute)
            .field("weaknesses", &self.weaknesses)
            .field("resistances", &self.resistances)
            .field(
                "passives",
                &self.passives.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field(
                "actives",
                &self.actives.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
