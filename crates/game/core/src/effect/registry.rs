//! Per-entity store of active effects and their duration counters.
//!
//! The registry is pure bookkeeping: it never runs hooks. Registration,
//! removal teardown and hook dispatch go through the engine so that status
//! and enchantment side tables stay in step.

use std::sync::Arc;

use super::{Effect, EffectKey, HookPhase};

/// A registered effect and its counters.
#[derive(Clone, Debug)]
pub struct ActiveEffect {
    pub effect: Arc<dyn Effect>,
    /// End-of-turn ticks elapsed. Can go negative when a status is extended.
    pub elapsed: i64,
    pub duration: Option<u32>,
    /// Frozen effects (buried enchantments) neither tick nor fire hooks.
    pub frozen: bool,
    /// Skip the next end-of-turn tick (toggles activated this turn).
    pub skip_next_tick: bool,
}

impl ActiveEffect {
    fn new(effect: Arc<dyn Effect>) -> Self {
        let duration = effect.duration();
        Self {
            effect,
            elapsed: 0,
            duration,
            frozen: false,
            skip_next_tick: false,
        }
    }

    pub fn key(&self) -> EffectKey {
        self.effect.key()
    }

    /// Ticks left before expiry, if the effect has a duration.
    pub fn remaining(&self) -> Option<i64> {
        self.duration.map(|d| i64::from(d) - self.elapsed)
    }

    fn is_expired(&self) -> bool {
        !self.frozen && self.duration.is_some_and(|d| self.elapsed >= i64::from(d))
    }
}

/// Ordered collection of effects registered on one entity.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    entries: Vec<ActiveEffect>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect with a zeroed counter. Returns false (and leaves
    /// the registry untouched) if the key is already present.
    pub fn insert(&mut self, effect: Arc<dyn Effect>) -> bool {
        let key = effect.key();
        if self.contains(key) {
            return false;
        }
        self.entries.push(ActiveEffect::new(effect));
        true
    }

    /// Remove an effect by key, returning it.
    pub fn take(&mut self, key: EffectKey) -> Option<Arc<dyn Effect>> {
        let index = self.entries.iter().position(|e| e.key() == key)?;
        Some(self.entries.remove(index).effect)
    }

    pub fn contains(&self, key: EffectKey) -> bool {
        self.entries.iter().any(|e| e.key() == key)
    }

    pub fn get(&self, key: EffectKey) -> Option<&ActiveEffect> {
        self.entries.iter().find(|e| e.key() == key)
    }

    fn get_mut(&mut self, key: EffectKey) -> Option<&mut ActiveEffect> {
        self.entries.iter_mut().find(|e| e.key() == key)
    }

    /// Snapshot of live effects hooking `phase`, in registration order.
    pub fn hooks_for(&self, phase: HookPhase) -> Vec<Arc<dyn Effect>> {
        self.entries
            .iter()
            .filter(|e| !e.frozen && e.effect.phases().has(phase))
            .map(|e| Arc::clone(&e.effect))
            .collect()
    }

    /// Advance every live, timed counter by one and return the keys that
    /// reached their duration. The caller removes them.
    pub fn tick_end_of_turn(&mut self) -> Vec<EffectKey> {
        for entry in self.entries.iter_mut() {
            if entry.frozen || entry.duration.is_none() {
                continue;
            }
            if entry.skip_next_tick {
                entry.skip_next_tick = false;
                continue;
            }
            entry.elapsed += 1;
        }
        self.check_expired()
    }

    /// Keys already at or over their duration, without ticking. Used right
    /// after an attack to clean up single-attack effects.
    pub fn check_expired(&self) -> Vec<EffectKey> {
        self.entries
            .iter()
            .filter(|e| e.is_expired())
            .map(ActiveEffect::key)
            .collect()
    }

    /// Subtract `ticks` from an effect's elapsed counter, extending its life.
    pub fn extend(&mut self, key: EffectKey, ticks: u32) {
        if let Some(entry) = self.get_mut(key) {
            entry.elapsed -= i64::from(ticks);
        }
    }

    pub fn set_frozen(&mut self, key: EffectKey, frozen: bool) {
        if let Some(entry) = self.get_mut(key) {
            entry.frozen = frozen;
        }
    }

    pub fn skip_next_tick(&mut self, key: EffectKey) {
        if let Some(entry) = self.get_mut(key) {
            entry.skip_next_tick = true;
        }
    }

    pub fn elapsed(&self, key: EffectKey) -> Option<i64> {
        self.get(key).map(|e| e.elapsed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<EffectKey> {
        self.entries.iter().map(ActiveEffect::key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
