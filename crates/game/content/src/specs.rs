//! Authoring formats for skills and entity templates.
//!
//! These are plain data. [`crate::interpreter`] turns skill specs into
//! engine skills; the loaders turn entity specs into
//! [`CombatEntity`](combat_core::CombatEntity) templates.

use combat_core::skill::Targeting;
use combat_core::{AttackType, Attribute, Stat, StatBonus, StatMods, StatusKind};

/// `(stat, value)` pairs as written in data files.
pub type StatList = Vec<(Stat, f64)>;

pub(crate) fn mods(list: &[(Stat, f64)]) -> StatMods {
    list.iter().copied().collect()
}

pub(crate) fn bonus(flat: &[(Stat, f64)], mult: &[(Stat, f64)]) -> StatBonus {
    StatBonus::new(mods(flat), mods(mult))
}

#[cfg(feature = "serde")]
fn one() -> f64 {
    1.0
}

/// One entry of the skill catalogue.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillSpec {
    Active(ActiveSpec),
    Passive(PassiveSpec),
}

impl SkillSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Active(spec) => &spec.name,
            Self::Passive(spec) => &spec.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub targeting: Targeting,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: u32,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub time_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub toggle: bool,
    /// Attack resolved against the first target once the grants are in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack: Option<AttackSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<GrantSpec>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub effects: Vec<EffectSpec>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_type: Option<AttackType>,
}

/// Who receives a granted effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Recipient {
    #[default]
    User,
    /// Every chosen target, one grant each.
    Targets,
    FirstTarget,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrantSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub to: Recipient,
    pub effect: EffectSpec,
    /// Owner turns before expiry. `None` lasts until removed, `Some(0)` for a
    /// single attack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<u32>,
}

/// Data form of the engine's effect building blocks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    StatModifier {
        #[cfg_attr(feature = "serde", serde(default))]
        flat: StatList,
        #[cfg_attr(feature = "serde", serde(default))]
        mult: StatList,
        #[cfg_attr(feature = "serde", serde(default))]
        label: Option<String>,
    },
    AttackBonus {
        #[cfg_attr(feature = "serde", serde(default))]
        flat: StatList,
        #[cfg_attr(feature = "serde", serde(default))]
        mult: StatList,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        damage_multiplier: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        opportunism: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        ignore_range: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        physical_only: bool,
    },
    Momentum {
        counter: String,
        per_stack: StatList,
        max_stacks: i64,
    },
    Enchantment {
        name: String,
        attribute: Attribute,
        #[cfg_attr(feature = "serde", serde(default))]
        flat: StatList,
        #[cfg_attr(feature = "serde", serde(default))]
        mult: StatList,
    },
    CounterAttack {
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        chance: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        damage_multiplier: Option<f64>,
    },
    FollowUp {
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        chance: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        chain: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        on_hit: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        damage_multiplier: Option<f64>,
    },
    Repeat {
        chance: f64,
    },
    Parry {
        name: String,
        attack_type: AttackType,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        damage_multiplier: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        dodge: bool,
        /// Riposte damage multiplier; `None` parries without answering.
        #[cfg_attr(feature = "serde", serde(default))]
        riposte: Option<f64>,
    },
    Guardian {
        damage_multiplier: f64,
    },
    Ambush {
        #[cfg_attr(feature = "serde", serde(default))]
        damage_multiplier: Option<f64>,
    },
    Thorns {
        fraction: f64,
    },
    Forewarned {
        #[cfg_attr(feature = "serde", serde(default))]
        flat: StatList,
        #[cfg_attr(feature = "serde", serde(default))]
        mult: StatList,
    },
    InflictOnHit {
        status: StatusKind,
        strength: f64,
        turns: u32,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        chance: f64,
    },
    Inflict {
        status: StatusKind,
        strength: f64,
        turns: u32,
    },
    Cleanse {
        statuses: Vec<StatusKind>,
    },
    StatusSurge {
        mana: u32,
    },
    DotSiphon {
        fraction: f64,
    },
    Regeneration {
        #[cfg_attr(feature = "serde", serde(default))]
        flat: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        fraction: f64,
    },
    ManaOnHit {
        mana: u32,
    },
    Restore {
        #[cfg_attr(feature = "serde", serde(default))]
        hp: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        mp: u32,
    },
    HealingBoost {
        multiplier: f64,
    },
    Meditation {
        mana: u32,
    },
    TimeWarp,
}

/// An entity template as authored in `entities.ron`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u32,
    /// Class whose skills the entity knows up to `rank`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub class: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank: u32,
    /// Extra skills by name, on top of the class list.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    /// Overrides on top of each stat's default base value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatList,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_type: AttackType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute: Attribute,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weaknesses: Vec<Attribute>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<Attribute>,
}

#[cfg(feature = "serde")]
fn first_level() -> u32 {
    1
}
