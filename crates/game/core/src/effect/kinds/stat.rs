use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::combat::AttackResult;
use crate::effect::{AttackContext, Effect, EffectKey, HookPhases};
use crate::engine::CombatEngine;
use crate::state::EntityId;
use crate::stats::{StatBonus, StatMods};

/// Flat and multiplicative stat changes held for the effect's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct StatModifier {
    pub key: EffectKey,
    /// Shown when the modifier expires.
    pub label: Option<String>,
    pub bonus: StatBonus,
    pub duration: Option<u32>,
}

impl StatModifier {
    pub fn new(key: EffectKey, bonus: StatBonus) -> Self {
        Self {
            key,
            label: None,
            bonus,
            duration: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Effect for StatModifier {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::IMMEDIATE
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn expiration_message(&self) -> Option<String> {
        self.label.as_ref().map(|label| format!("{label} wears off."))
    }

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.apply_bonus(owner, &self.bonus);
    }

    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.revert_bonus(owner, &self.bonus);
    }
}

/// Buff applied to each of the owner's attacks for that attack only.
///
/// The stat part is applied in BEFORE_ATTACK and paired with a
/// [`RevertBonus`] whose AFTER_ATTACK hook takes it back off.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackBonus {
    pub key: EffectKey,
    pub bonus: StatBonus,
    pub damage_multiplier: f64,
    /// Hit the weaker of DEF and RES.
    pub opportunism: bool,
    pub ignore_range: bool,
    /// Only boost physical attacks.
    pub physical_only: bool,
    /// Leave queued bonus attacks alone.
    pub skip_bonus: bool,
    pub duration: Option<u32>,
}

impl AttackBonus {
    pub fn new(key: EffectKey) -> Self {
        Self {
            key,
            bonus: StatBonus::default(),
            damage_multiplier: 1.0,
            opportunism: false,
            ignore_range: false,
            physical_only: false,
            skip_bonus: false,
            duration: None,
        }
    }

    pub fn with_bonus(mut self, bonus: StatBonus) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_damage_multiplier(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_opportunism(mut self) -> Self {
        self.opportunism = true;
        self
    }

    pub fn with_ignore_range(mut self) -> Self {
        self.ignore_range = true;
        self
    }

    pub fn physical_only(mut self) -> Self {
        self.physical_only = true;
        self
    }

    pub fn skip_bonus(mut self) -> Self {
        self.skip_bonus = true;
        self
    }
}

impl Effect for AttackBonus {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::BEFORE_ATTACK
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn before_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
        if self.physical_only && !attack.is_physical {
            return;
        }
        if self.skip_bonus && attack.is_bonus {
            return;
        }
        attack.damage_multiplier *= self.damage_multiplier;
        attack.opportunism |= self.opportunism;
        attack.ignore_range |= self.ignore_range;
        if !self.bonus.is_empty() {
            hold_for_attack(engine, owner, self.bonus.clone());
        }
    }
}

/// Apply `bonus` now and register the paired AFTER_ATTACK revert.
fn hold_for_attack(engine: &mut CombatEngine, owner: EntityId, bonus: StatBonus) {
    engine.apply_bonus(owner, &bonus);
    let key = engine.next_transient_key();
    engine.add_effect(owner, Arc::new(RevertBonus::new(key, bonus)));
}

/// Undoes a single-attack bonus in the owner's AFTER_ATTACK phase, before
/// the defender's AFTER_ATTACKED hooks run. Lives for a single attack; if it
/// is removed before its hook fires, removal reverts instead.
#[derive(Debug)]
pub struct RevertBonus {
    pub key: EffectKey,
    pub bonus: StatBonus,
    reverted: AtomicBool,
}

impl RevertBonus {
    pub fn new(key: EffectKey, bonus: StatBonus) -> Self {
        Self {
            key,
            bonus,
            reverted: AtomicBool::new(false),
        }
    }

    fn settle(&self, engine: &mut CombatEngine, owner: EntityId) {
        if !self.reverted.swap(true, Ordering::Relaxed) {
            engine.revert_bonus(owner, &self.bonus);
        }
    }
}

impl Effect for RevertBonus {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::AFTER_ATTACK
    }

    fn duration(&self) -> Option<u32> {
        Some(0)
    }

    fn after_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        _attack: &mut AttackContext,
        _result: &AttackResult,
    ) {
        self.settle(engine, owner);
    }

    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {
        self.settle(engine, owner);
    }
}

/// Consecutive hits build a named counter; each stack adds `per_stack`
/// (flat) to the next attack. A miss resets the counter.
#[derive(Clone, Debug, PartialEq)]
pub struct Momentum {
    pub key: EffectKey,
    pub counter: String,
    pub per_stack: StatMods,
    pub max_stacks: i64,
    pub duration: Option<u32>,
}

impl Momentum {
    pub fn new(
        key: EffectKey,
        counter: impl Into<String>,
        per_stack: StatMods,
        max_stacks: i64,
    ) -> Self {
        Self {
            key,
            counter: counter.into(),
            per_stack,
            max_stacks,
            duration: None,
        }
    }
}

impl Effect for Momentum {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::BEFORE_ATTACK | HookPhases::AFTER_ATTACK
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn before_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        _attack: &mut AttackContext,
    ) {
        let stacks = engine.stacks(owner, &self.counter);
        if stacks <= 0 {
            return;
        }
        let scaled = self
            .per_stack
            .iter()
            .fold(StatMods::new(), |mods, (stat, value)| {
                mods.with(stat, value * stacks as f64)
            });
        hold_for_attack(engine, owner, StatBonus::flat(scaled));
    }

    fn after_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        _attack: &mut AttackContext,
        result: &AttackResult,
    ) {
        if !result.hit {
            engine.reset_stacks(owner, &self.counter);
        } else if engine.stacks(owner, &self.counter) < self.max_stacks {
            engine.add_stacks(owner, &self.counter, 1);
        }
    }

    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.reset_stacks(owner, &self.counter);
    }
}
