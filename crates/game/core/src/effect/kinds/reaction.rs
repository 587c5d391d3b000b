use std::sync::Arc;

use crate::combat::AttackResult;
use crate::effect::{
    AttackContext, BonusAttack, BonusAttackOptions, Effect, EffectKey, HookPhases,
    RepositionEvent, SkillEvent,
};
use crate::engine::{CombatEngine, MessageTag};
use crate::state::{EntityId, ParryRegistration};
use crate::stats::StatBonus;

use super::StatModifier;

/// Luck-skewed trial for `owner` against `other`. Certain chances skip the draw.
fn roll(engine: &mut CombatEngine, chance: f64, owner: EntityId, other: EntityId) -> bool {
    if chance >= 1.0 {
        return true;
    }
    let luck = engine.luck_delta(owner, other);
    engine.rng().luck_check(chance, luck)
}

/// Strike back at whoever attacked the owner. Bonus attacks are never
/// answered.
#[derive(Clone, Debug)]
pub struct CounterAttack {
    pub key: EffectKey,
    pub chance: f64,
    pub options: BonusAttackOptions,
    pub duration: Option<u32>,
}

impl CounterAttack {
    pub fn new(key: EffectKey, chance: f64) -> Self {
        Self {
            key,
            chance,
            options: BonusAttackOptions::default(),
            duration: None,
        }
    }

    pub fn with_options(mut self, options: BonusAttackOptions) -> Self {
        self.options = options;
        self
    }
}

impl Effect for CounterAttack {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::AFTER_ATTACKED
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn after_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
        _result: &AttackResult,
    ) {
        let attacker = attack.attacker;
        if attack.is_bonus || !engine.is_alive(owner) || !engine.is_alive(attacker) {
            return;
        }
        if !roll(engine, self.chance, owner, attacker) {
            return;
        }
        let text = format!("{} counters!", engine.name(owner));
        engine.message(MessageTag::Effect, text);
        attack.queue_bonus(BonusAttack::new(owner, attacker).with_options(self.options.clone()));
    }
}

/// Queue another attack on the same defender after the owner attacks.
#[derive(Clone, Debug)]
pub struct FollowUpAttack {
    pub key: EffectKey,
    pub chance: f64,
    pub options: BonusAttackOptions,
    /// Also follow up on bonus attacks. Chains are bounded by the
    /// per-action bonus-attack limit.
    pub chain: bool,
    /// Only follow up on a hit.
    pub on_hit: bool,
    pub duration: Option<u32>,
}

impl FollowUpAttack {
    pub fn new(key: EffectKey, chance: f64) -> Self {
        Self {
            key,
            chance,
            options: BonusAttackOptions::default(),
            chain: false,
            on_hit: false,
            duration: None,
        }
    }

    pub fn with_options(mut self, options: BonusAttackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn chained(mut self) -> Self {
        self.chain = true;
        self
    }

    pub fn on_hit(mut self) -> Self {
        self.on_hit = true;
        self
    }
}

impl Effect for FollowUpAttack {
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
        if (attack.is_bonus && !self.chain) || (self.on_hit && !result.hit) || result.killed {
            return;
        }
        let defender = attack.defender;
        if roll(engine, self.chance, owner, defender) {
            attack.queue_bonus(
                BonusAttack::new(owner, defender).with_options(self.options.clone()),
            );
        }
    }
}

/// Chance to strike the same defender again immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatAttack {
    pub key: EffectKey,
    pub chance: f64,
    pub duration: Option<u32>,
}

impl RepeatAttack {
    pub fn new(key: EffectKey, chance: f64) -> Self {
        Self {
            key,
            chance,
            duration: None,
        }
    }
}

impl Effect for RepeatAttack {
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
        if attack.is_bonus || result.killed {
            return;
        }
        if roll(engine, self.chance, owner, attack.defender) {
            attack.repeat = true;
        }
    }
}

/// Arms a parry when registered.
#[derive(Clone, Debug)]
pub struct ParryStance {
    pub key: EffectKey,
    pub parry: ParryRegistration,
    pub duration: Option<u32>,
}

impl ParryStance {
    pub fn new(key: EffectKey, parry: ParryRegistration) -> Self {
        Self {
            key,
            parry,
            duration: None,
        }
    }
}

impl Effect for ParryStance {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::IMMEDIATE
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.register_parry(owner, self.parry.clone());
    }

    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {
        let state = engine.entity_mut(owner);
        if state
            .parry
            .as_ref()
            .is_some_and(|armed| armed.name == self.parry.name)
        {
            state.parry = None;
        }
    }
}

/// Softens attacks aimed at the owner's allies.
#[derive(Clone, Debug, PartialEq)]
pub struct Guardian {
    pub key: EffectKey,
    pub damage_multiplier: f64,
    pub duration: Option<u32>,
}

impl Guardian {
    pub fn new(key: EffectKey, damage_multiplier: f64) -> Self {
        Self {
            key,
            damage_multiplier,
            duration: None,
        }
    }
}

impl Effect for Guardian {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::BEFORE_ALLY_ATTACKED
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn before_ally_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
    ) {
        attack.damage_multiplier *= self.damage_multiplier;
        let text = format!(
            "{} shields {}.",
            engine.name(owner),
            engine.name(attack.defender)
        );
        engine.message(MessageTag::Effect, text);
    }
}

/// Attack an opponent that closes in on the owner.
#[derive(Clone, Debug)]
pub struct Ambush {
    pub key: EffectKey,
    pub options: BonusAttackOptions,
    pub duration: Option<u32>,
}

impl Ambush {
    pub fn new(key: EffectKey) -> Self {
        Self {
            key,
            options: BonusAttackOptions::default(),
            duration: None,
        }
    }

    pub fn with_options(mut self, options: BonusAttackOptions) -> Self {
        self.options = options;
        self
    }
}

impl Effect for Ambush {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ON_REPOSITION
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn on_reposition(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        event: &RepositionEvent,
        bonus_attacks: &mut Vec<BonusAttack>,
    ) {
        let mover = event.mover;
        if event.delta >= 0
            || !event.targets.contains(&owner)
            || engine.team_of(mover) == engine.team_of(owner)
            || !engine.is_alive(mover)
        {
            return;
        }
        let text = format!("{} ambushes {}!", engine.name(owner), engine.name(mover));
        engine.message(MessageTag::Effect, text);
        bonus_attacks.push(BonusAttack::new(owner, mover).with_options(self.options.clone()));
    }
}

/// Reflect a share of the damage the owner takes back at the attacker.
#[derive(Clone, Debug, PartialEq)]
pub struct Thorns {
    pub key: EffectKey,
    pub fraction: f64,
    pub duration: Option<u32>,
}

impl Thorns {
    pub fn new(key: EffectKey, fraction: f64) -> Self {
        Self {
            key,
            fraction,
            duration: None,
        }
    }
}

impl Effect for Thorns {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::AFTER_ATTACKED
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn after_attacked(
        &self,
        engine: &mut CombatEngine,
        owner: EntityId,
        attack: &mut AttackContext,
        result: &AttackResult,
    ) {
        if result.damage == 0 || !engine.is_alive(attack.attacker) {
            return;
        }
        let reflected = (f64::from(result.damage) * self.fraction).ceil() as u32;
        engine.deal_damage(owner, attack.attacker, reflected);
    }
}

/// Braces the owner for an attacking skill aimed at it: `bonus` holds for
/// the skill's attack only.
#[derive(Clone, Debug, PartialEq)]
pub struct Forewarned {
    pub key: EffectKey,
    pub bonus: StatBonus,
    pub duration: Option<u32>,
}

impl Forewarned {
    pub fn new(key: EffectKey, bonus: StatBonus) -> Self {
        Self {
            key,
            bonus,
            duration: None,
        }
    }
}

impl Effect for Forewarned {
    fn key(&self) -> EffectKey {
        self.key
    }

    fn phases(&self) -> HookPhases {
        HookPhases::ON_ATTACK_SKILL
    }

    fn duration(&self) -> Option<u32> {
        self.duration
    }

    fn on_attack_skill(&self, engine: &mut CombatEngine, owner: EntityId, event: &SkillEvent) {
        if !event.targets.contains(&owner) {
            return;
        }
        let key = engine.next_transient_key();
        let brace = StatModifier::new(key, self.bonus.clone()).single_attack();
        engine.add_effect(owner, Arc::new(brace));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::engine::AttackRequest;
    use crate::state::{AttackType, CombatEntity, Team};
    use crate::stats::{BaseStats, Stat};
    use crate::testing::ScriptedRng;

    fn fighter(name: &str) -> CombatEntity {
        CombatEntity::new(
            name,
            BaseStats::defaults()
                .with(Stat::Atk, 10.0)
                .with(Stat::Acc, 50.0)
                .with(Stat::Avo, 100.0)
                .with(Stat::MaxHp, 500.0),
        )
    }

    fn engine_with(draws: Vec<f64>) -> (CombatEngine, EntityId, EntityId, EntityId) {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        let a = builder.join(Team::Players, fighter("Knight"));
        let ally = builder.join(Team::Players, fighter("Squire"));
        let b = builder.join(Team::Opponents, fighter("Raider"));
        builder.rng(Box::new(ScriptedRng::new(draws)));
        (builder.build(), a, ally, b)
    }

    #[test]
    fn counter_answers_primary_attacks_only() {
        let (mut engine, a, _, b) = engine_with(vec![]);
        engine.add_effect(a, Arc::new(CounterAttack::new(EffectKey::Transient(500), 1.0)));
        engine.add_effect(b, Arc::new(CounterAttack::new(EffectKey::Transient(501), 1.0)));
        let chain = engine.resolve_attack(AttackRequest::basic(b, a));
        // b's attack, then a's counter; b does not counter the counter
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.bonus_count(), 1);
        assert_eq!(chain.results[1].attacker, a);
    }

    #[test]
    fn chained_follow_up_stops_at_bound() {
        let (mut engine, a, _, b) = engine_with(vec![]);
        engine.add_effect(
            a,
            Arc::new(FollowUpAttack::new(EffectKey::Transient(500), 1.0).chained()),
        );
        let chain = engine.resolve_attack(AttackRequest::basic(a, b));
        let bound = engine.config().max_bonus_attacks;
        assert!(chain.bonus_count() <= bound);
        assert!(chain.len() <= bound + 1);
        // a 500 HP target survives; the chain ended because of the bound
        if engine.is_alive(b) {
            assert_eq!(chain.bonus_count(), bound);
            assert!(chain.dropped_bonus_attacks > 0);
        }
    }

    #[test]
    fn guardian_scales_damage_to_allies() {
        let (mut engine, a, ally, b) = engine_with(vec![0.99, 0.5, 0.0, 0.99, 0.5, 0.0]);
        let unguarded = engine.resolve_attack(AttackRequest::basic(b, ally)).total_damage();
        engine.add_effect(a, Arc::new(Guardian::new(EffectKey::Transient(500), 0.5)));
        let guarded = engine.resolve_attack(AttackRequest::basic(b, ally)).total_damage();
        assert!(guarded < unguarded);
    }

    #[test]
    fn parry_stance_arms_and_disarms() {
        let (mut engine, a, _, _) = engine_with(vec![]);
        let key = EffectKey::Transient(500);
        let parry = ParryRegistration::new("Riposte", AttackType::Melee);
        engine.add_effect(a, Arc::new(ParryStance::new(key, parry)));
        assert!(engine.entity(a).parry.is_some());
        engine.remove_effect(a, key);
        assert!(engine.entity(a).parry.is_none());
    }

    #[test]
    fn thorns_reflect_damage() {
        let (mut engine, a, _, b) = engine_with(vec![0.99, 0.5, 0.0]);
        engine.add_effect(a, Arc::new(Thorns::new(EffectKey::Transient(500), 0.5)));
        let before = engine.entity(b).stats.hp();
        let chain = engine.resolve_attack(AttackRequest::basic(b, a));
        let dealt = chain.results[0].damage;
        assert!(dealt > 0);
        let reflected = (f64::from(dealt) * 0.5).ceil() as u32;
        assert_eq!(engine.entity(b).stats.hp(), before - reflected);
    }
}
