//! Event payloads handed to effect hooks.
//!
//! Payloads are plain data owned by the pipeline that fires the hook; hooks
//! mutate them to steer the rest of the pipeline (damage multipliers,
//! repeat flags, queued bonus attacks, heal amounts).

use std::fmt;
use std::sync::Arc;

use crate::config::CombatConfig;
use crate::skill::SkillId;
use crate::state::{AttackType, Attribute, EntityId};
use crate::status::StatusKind;

use super::Effect;

/// Overrides carried by a queued bonus attack.
#[derive(Clone, Default)]
pub struct BonusAttackOptions {
    /// Force physical (`Some(true)`) or magical (`Some(false)`) resolution.
    pub is_physical: Option<bool>,
    /// Override the attacker's default attack type.
    pub attack_type: Option<AttackType>,
    pub ignore_range: bool,
    /// Multiplier on the bonus attack's damage.
    pub damage_multiplier: Option<f64>,
    /// Single-attack effect registered on the user just before the attack
    /// (the attacking skill's own hooks). Should carry duration 0.
    pub skill: Option<Arc<dyn Effect>>,
}

impl fmt::Debug for BonusAttackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BonusAttackOptions")
            .field("is_physical", &self.is_physical)
            .field("attack_type", &self.attack_type)
            .field("ignore_range", &self.ignore_range)
            .field("damage_multiplier", &self.damage_multiplier)
            .field("skill", &self.skill.as_ref().map(|s| s.key()))
            .finish()
    }
}

/// An attack queued as a side effect of another action.
#[derive(Clone, Debug)]
pub struct BonusAttack {
    pub user: EntityId,
    pub target: EntityId,
    pub options: BonusAttackOptions,
}

impl BonusAttack {
    pub fn new(user: EntityId, target: EntityId) -> Self {
        Self {
            user,
            target,
            options: BonusAttackOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BonusAttackOptions) -> Self {
        self.options = options;
        self
    }
}

/// Mutable description of one attack while it resolves.
#[derive(Clone, Debug)]
pub struct AttackContext {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub is_physical: bool,
    pub attack_type: AttackType,
    /// Effective attack attribute (top enchantment or the attacker's own).
    pub attribute: Attribute,
    /// Basic (non-skill) attack: grants mana and spends the action timer.
    pub is_basic: bool,
    /// Queued by another action; never regains basic-attack resources.
    pub is_bonus: bool,
    pub ignore_range: bool,
    /// Use the lower of the two defensive stats.
    pub opportunism: bool,
    pub guaranteed_dodge: bool,
    /// Product of all hook-supplied damage multipliers.
    pub damage_multiplier: f64,

    // === After-attack control ===
    /// Resolve one immediate extra attack against the same defender.
    pub repeat: bool,
    /// Bonus attacks to append to the action's FIFO queue.
    pub bonus_attacks: Vec<BonusAttack>,
    /// Mana granted if this is a basic attack.
    pub mana_gain: u32,
    /// Action timer spent if this is a basic attack, before `time_multiplier`.
    pub base_usage: f64,
    pub time_multiplier: f64,
}

impl AttackContext {
    pub fn new(
        attacker: EntityId,
        defender: EntityId,
        is_physical: bool,
        attack_type: AttackType,
        is_basic: bool,
        config: &CombatConfig,
    ) -> Self {
        Self {
            attacker,
            defender,
            is_physical,
            attack_type,
            attribute: Attribute::Neutral,
            is_basic,
            is_bonus: false,
            ignore_range: false,
            opportunism: false,
            guaranteed_dodge: false,
            damage_multiplier: 1.0,
            repeat: false,
            bonus_attacks: Vec::new(),
            mana_gain: config.mana.basic_attack_gain,
            base_usage: config.timing.basic_action_usage,
            time_multiplier: 1.0,
        }
    }

    /// Queue a bonus attack to run after this one (and its repeat) completes.
    pub fn queue_bonus(&mut self, bonus: BonusAttack) {
        self.bonus_attacks.push(bonus);
    }
}

/// A completed reposition, as seen by ON_REPOSITION hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositionEvent {
    pub mover: EntityId,
    pub targets: Vec<EntityId>,
    /// Signed distance change applied to each target pair.
    pub delta: i8,
}

/// A heal in flight; ON_HEAL hooks on the healer may rescale `amount`.
#[derive(Clone, Debug, PartialEq)]
pub struct HealEvent {
    pub healer: EntityId,
    pub target: EntityId,
    pub amount: f64,
}

/// A status that was just applied (or amplified).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    pub target: EntityId,
    pub inflicter: EntityId,
    pub kind: StatusKind,
    /// True when an existing instance was amplified instead of a new one landing.
    pub amplified: bool,
}

/// An attacking skill activation, as seen by ON_ATTACK_SKILL hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillEvent {
    pub user: EntityId,
    pub skill: SkillId,
    pub targets: Vec<EntityId>,
}
