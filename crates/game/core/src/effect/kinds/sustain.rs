use crate::combat::AttackResult;
use crate::effect::{AttackContext, Effect, EffectKey, HealEvent, HookPhases};
use crate::engine::{CombatEngine, MessageTag};
use crate::state::EntityId;

/// Heals the owner at the end of each of its turns by
/// `flat + fraction × MAX_HP`.
#[derive(Clone, Debug, PartialEq)]
pub struct Regeneration {
    pub key: EffectKey,
    pub flat: f64,
    pub fraction: f64,
    pub duration: Option<u32>,
}

impl Regeneration {
    pub fn new(key: EffectKey, flat: f64, fraction: f64) -> Self {
        Self {
            key,
            flat,
            fraction,
            duration: None,
        }
    }
}

impl Effect for Regeneration {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::END_TURN
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn expiration_message(&self) -> Option<String> {
        Some("regeneration ends.".to_owned())
    }

    fn end_turn(&self, engine: &mut CombatEngine, owner: EntityId) {
        let max = f64::from(engine.entity(owner).stats.max_hp());
        engine.heal(owner, owner, self.flat + self.fraction * max);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ManaOnHit {
    pub key: EffectKey,
    pub mana: u32,
    pub duration: Option<u32>,
}

impl ManaOnHit {
    pub fn new(key: EffectKey, mana: u32) -> Self {
        Self {
            key,
            mana,
            duration: None,
        }
    }
}

impl Effect for ManaOnHit {
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
        _attack: &mut AttackContext,
        result: &AttackResult,
    ) {
        if result.hit {
            engine.restore_mana(owner, self.mana);
        }
    }
}

/// One-off heal and mana restore for the recipient, credited to `source`.
#[derive(Clone, Debug, PartialEq)]
pub struct Restore {
    pub key: EffectKey,
    pub source: EntityId,
    pub hp: f64,
    pub mp: u32,
}

impl Restore {
    pub fn new(key: EffectKey, source: EntityId, hp: f64, mp: u32) -> Self {
        Self { key, source, hp, mp }
    }
}

impl Effect for Restore {
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
        if self.hp > 0.0 {
            engine.heal(self.source, owner, self.hp);
        }
        if self.mp > 0 && engine.is_alive(owner) {
            engine.restore_mana(owner, self.mp);
        }
    }
}

/// Scales every heal the owner performs.
#[derive(Clone, Debug, PartialEq)]
pub struct HealingBoost {
    pub key: EffectKey,
    pub multiplier: f64,
    pub duration: Option<u32>,
}

impl HealingBoost {
    pub fn new(key: EffectKey, multiplier: f64) -> Self {
        Self {
            key,
            multiplier,
            duration: None,
        }
    }
}

impl Effect for HealingBoost {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ON_HEAL
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn on_heal(&self, _engine: &mut CombatEngine, _owner: EntityId, heal: &mut HealEvent) {
        heal.amount *= self.multiplier;
    }
}

/// Mana each time the scheduler hands a turn to someone else.
#[derive(Clone, Debug, PartialEq)]
pub struct Meditation {
    pub key: EffectKey,
    pub mana: u32,
    pub duration: Option<u32>,
}

impl Meditation {
    pub fn new(key: EffectKey, mana: u32) -> Self {
        Self {
            key,
            mana,
            duration: None,
        }
    }
}

impl Effect for Meditation {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ADVANCE_TURN
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn advance_turn(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        _previous: Option<EntityId>,
        _next: EntityId,
    ) {
        engine.restore_mana(owner, self.mana);
    }
}

/// Refills the owner's action timer at the end of its turn, so the
/// scheduler hands it the next turn as well. Expires after that turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWarp {
    pub key: EffectKey,
}

impl TimeWarp {
    pub fn new(key: EffectKey) -> Self {
        Self { key }
    }
}

impl Effect for TimeWarp {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::END_TURN
    }

    fn duration(&self) -> Option<u32> {
        Some(1)
    }

    fn end_turn(&self, engine: &mut CombatEngine, owner: EntityId) {
        let max = engine.config().timing.max_action_timer;
        engine.set_action_timer(owner, max);
        let text = format!("Time bends around {}.", engine.name(owner));
        engine.message(MessageTag::Effect, text);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::CombatConfig;
    use crate::state::{CombatEntity, Team};
    use crate::stats::{BaseStats, Stat};

    fn setup() -> (CombatEngine, EntityId, EntityId) {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        let stats = BaseStats::defaults()
            .with(Stat::MaxHp, 100.0)
            .with(Stat::MaxMp, 30.0)
            .with(Stat::Spd, 9.0);
        let a = builder.join(Team::Players, CombatEntity::new("Cleric", stats));
        let b = builder.join(
            Team::Opponents,
            CombatEntity::new("Shade", stats.with(Stat::Spd, 1.0)),
        );
        (builder.build(), a, b)
    }

    #[test]
    fn regeneration_heals_at_end_of_turn() {
        let (mut engine, a, _) = setup();
        engine.add_effect(
            a,
            Arc::new(Regeneration::new(EffectKey::Transient(500), 2.0, 0.1).with_duration(1)),
        );
        engine.entity_mut(a).stats.set_hp(50);
        assert_eq!(engine.advance(), a);
        engine.begin_turn();
        engine.end_turn();
        assert_eq!(engine.entity(a).stats.hp(), 62);
        assert!(!engine.has_effect(a, EffectKey::Transient(500)));
    }

    #[test]
    fn healing_boost_scales_outgoing_heals() {
        let (mut engine, a, b) = setup();
        engine.add_effect(a, Arc::new(HealingBoost::new(EffectKey::Transient(500), 2.0)));
        engine.entity_mut(a).stats.set_hp(10);
        engine.entity_mut(b).stats.set_hp(10);
        assert_eq!(engine.heal(a, a, 5.0), 10);
        // boosts belong to the healer
        assert_eq!(engine.heal(b, b, 5.0), 5);
    }

    #[test]
    fn restore_credits_the_source() {
        let (mut engine, a, _) = setup();
        engine.entity_mut(a).stats.set_hp(10);
        engine.entity_mut(a).stats.set_mp(0);
        engine.add_effect(a, Arc::new(Restore::new(EffectKey::Transient(500), a, 15.0, 4)));
        assert_eq!(engine.entity(a).stats.hp(), 25);
        assert_eq!(engine.entity(a).stats.mp(), 4);
    }

    #[test]
    fn time_warp_grants_the_next_turn() {
        let (mut engine, a, _) = setup();
        assert_eq!(engine.advance(), a);
        engine.begin_turn();
        engine.add_effect(a, Arc::new(TimeWarp::new(EffectKey::Transient(500))));
        engine.spend_action_time(a, 100.0);
        engine.end_turn();
        assert!(!engine.has_effect(a, EffectKey::Transient(500)));
        assert_eq!(engine.advance(), a);
    }
}
