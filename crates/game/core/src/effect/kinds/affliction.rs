use crate::combat::AttackResult;
use crate::effect::{AttackContext, Effect, EffectKey, HookPhases, StatusEvent};
use crate::engine::CombatEngine;
use crate::state::EntityId;
use crate::status::{StatusCondition, StatusKind};

/// Try to inflict a status on whatever the owner hits.
#[derive(Clone, Debug, PartialEq)]
pub struct InflictOnHit {
    pub key: EffectKey,
    pub status: StatusKind,
    pub strength: f64,
    pub turns: u32,
    /// Chance the attempt is made at all; the target still rolls to resist.
    pub chance: f64,
    pub duration: Option<u32>,
}

impl InflictOnHit {
    pub fn new(key: EffectKey, status: StatusKind, strength: f64, turns: u32) -> Self {
        Self {
            key,
            status,
            strength,
            turns,
            chance: 1.0,
            duration: None,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }
}

impl Effect for InflictOnHit {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::AFTER_ATTACK
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn after_attack(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
        result: &AttackResult,
    ) {
        let target = attack.defender;
        if !result.hit || !engine.is_alive(target) {
            return;
        }
        if self.chance < 1.0 {
            let luck = engine.luck_delta(owner, target);
            if !engine.rng().luck_check(self.chance, luck) {
                return;
            }
        }
        let condition = StatusCondition::new(self.status, owner, self.strength, self.turns);
        engine.apply_status(target, condition);
    }
}

/// Applies a status to its recipient once, on registration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InflictStatus {
    pub key: EffectKey,
    pub condition: StatusCondition,
}

impl InflictStatus {
    pub fn new(key: EffectKey, condition: StatusCondition) -> Self {
        Self { key, condition }
    }
}

impl Effect for InflictStatus {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::IMMEDIATE
    }

    fn duration(&self) -> Option<u32> {
        Some(0)
    }

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {
        if engine.is_alive(owner) && engine.is_alive(self.condition.inflicter) {
            engine.apply_status(owner, self.condition);
        }
    }
}

/// Cures the listed statuses on registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cleanse {
    pub key: EffectKey,
    pub statuses: Vec<StatusKind>,
}

impl Cleanse {
    pub fn new(key: EffectKey, statuses: Vec<StatusKind>) -> Self {
        Self { key, statuses }
    }
}

impl Effect for Cleanse {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::IMMEDIATE
    }

    fn duration(&self) -> Option<u32> {
        Some(0)
    }

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {
        for &kind in &self.statuses {
            engine.cure_status(owner, kind);
        }
    }
}

/// Mana for the owner whenever a status it inflicted lands on someone else.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusSurge {
    pub key: EffectKey,
    pub mana: u32,
    pub duration: Option<u32>,
}

impl StatusSurge {
    pub fn new(key: EffectKey, mana: u32) -> Self {
        Self {
            key,
            mana,
            duration: None,
        }
    }
}

impl Effect for StatusSurge {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ON_STATUS_APPLIED
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn on_status_applied(&self, engine: &mut CombatEngine, owner: EntityId, event: &StatusEvent) {
        if event.inflicter == owner && event.target != owner {
            engine.restore_mana(owner, self.mana);
        }
    }
}

/// Heals the owner for a share of every damage-over-time tick its team
/// inflicts.
#[derive(Clone, Debug, PartialEq)]
pub struct DotSiphon {
    pub key: EffectKey,
    pub fraction: f64,
    pub duration: Option<u32>,
}

impl DotSiphon {
    pub fn new(key: EffectKey, fraction: f64) -> Self {
        Self {
            key,
            fraction,
            duration: None,
        }
    }
}

impl Effect for DotSiphon {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ON_OPPONENT_DOT
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn on_opponent_dot(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        _victim: EntityId,
        damage: u32,
    ) {
        if damage > 0 {
            engine.heal(owner, owner, f64::from(damage) * self.fraction);
        }
    }
}
