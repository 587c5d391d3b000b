//! Effect system - duration-tracked bundles of phase-tagged hooks.
//!
//! An [`Effect`] is an immutable value identified by its [`EffectKey`]. It is
//! registered on one entity (its *owner*) and fires hooks at the phases it
//! declares through [`Effect::phases`]. All mutable per-instance data lives
//! in the engine (registry counters, status payloads, enchantment stack), so
//! effects can be shared as `Arc<dyn Effect>` and snapshotted freely.
//!
//! # Hook dispatch
//!
//! For a given phase, hooks run sequentially in registration order. The
//! engine snapshots the hook list before iterating, so a hook may add or
//! remove effects (including itself) without invalidating the iteration.
//!
//! # Building blocks
//!
//! [`kinds`] provides the closed set of reusable effects that content
//! composes: stat modifiers, single-attack bonuses with their paired revert,
//! counters, follow-ups, parries, regeneration and so on.

mod context;
pub mod enchantment;
pub mod kinds;
mod phase;
pub mod registry;

pub use context::{
    AttackContext, BonusAttack, BonusAttackOptions, HealEvent, RepositionEvent, SkillEvent,
    StatusEvent,
};
pub use enchantment::Enchantment;
pub use phase::{HookPhase, HookPhases};
pub use registry::{ActiveEffect, EffectRegistry};

use std::fmt;

use crate::combat::AttackResult;
use crate::engine::CombatEngine;
use crate::skill::SkillId;
use crate::state::EntityId;
use crate::status::StatusKind;

/// Identity of a registered effect. Registering a key that is already
/// present on the owner is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKey {
    /// The `slot`-th effect granted by `skill` when used by `source`.
    Skill {
        skill: SkillId,
        source: EntityId,
        slot: u8,
    },
    /// The single instance of a status condition.
    Status(StatusKind),
    /// Engine-allocated key for short-lived effects (single-attack reverts).
    Transient(u64),
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill {
                skill,
                source,
                slot,
            } => write!(f, "skill {}#{} from {}", skill.0, slot, source.0),
            Self::Status(kind) => write!(f, "status {kind}"),
            Self::Transient(id) => write!(f, "transient {id}"),
        }
    }
}

/// A bundle of hook callbacks attached to an entity.
///
/// Every hook has a no-op default; implementors override the ones listed in
/// [`phases`](Self::phases). `owner` is the entity the effect is registered
/// on.
#[allow(unused_variables)]
pub trait Effect: Send + Sync {
    fn key(&self) -> EffectKey;

    /// Phases this effect hooks into.
    fn phases(&self) -> HookPhases;

    /// `None` lasts until removed; `Some(n)` expires after `n` end-of-turn
    /// ticks. `Some(0)` lives for a single attack.
    fn duration(&self) -> Option<u32> {
        None
    }

    /// Message logged when the effect expires naturally.
    fn expiration_message(&self) -> Option<String> {
        None
    }

    /// Enchantment payload, if this effect is one.
    fn as_enchantment(&self) -> Option<&Enchantment> {
        None
    }

    /// Teardown run whenever the effect leaves the registry.
    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {}

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {}

    fn before_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
    }

    fn after_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
        result: &AttackResult,
    ) {
    }

    fn before_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
    }

    fn after_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
        result: &AttackResult,
    ) {
    }

    fn before_ally_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
    }

    fn on_reposition(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        event: &RepositionEvent,
        bonus_attacks: &mut Vec<BonusAttack>,
    ) {
    }

    fn on_stat_change(&self, engine: &mut CombatEngine, owner: EntityId) {}

    fn on_status_applied(&self, engine: &mut CombatEngine, owner: EntityId, event: &StatusEvent) {}

    fn on_heal(&self, engine: &mut CombatEngine, owner: EntityId, heal: &mut HealEvent) {}

    fn on_parry(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
    }

    fn start_turn(&self, engine: &mut CombatEngine, owner: EntityId) {}

    fn end_turn(&self, engine: &mut CombatEngine, owner: EntityId) {}

    fn advance_turn(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        previous: Option<EntityId>,
        next: EntityId,
    ) {
    }

    fn on_opponent_dot(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        victim: EntityId,
        damage: u32,
    ) {
    }

    fn on_attack_skill(&self, engine: &mut CombatEngine, owner: EntityId, event: &SkillEvent) {}
}

impl fmt::Debug for dyn Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("key", &self.key())
            .field("phases", &self.phases())
            .field("duration", &self.duration())
            .finish()
    }
}
