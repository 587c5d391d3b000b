//! Attack resolution pipeline.
//!
//! One action resolves a primary attack (plus its repeat, if any hook asked
//! for one) and then drains a FIFO queue of bonus attacks queued by hooks.
//! Bonus attacks may queue further bonus attacks; the number processed per
//! action is bounded by `max_bonus_attacks`, after which the rest of the
//! queue is discarded.

use std::collections::VecDeque;

use crate::combat::{
    AttackChain, AttackResult, DamageRoll, attribute_multiplier, effective_distance, hit_chance,
    variance_factor,
};
use crate::effect::{AttackContext, BonusAttack, HookPhase};
use crate::skill::SkillAttack;
use crate::state::{AttackType, EntityId};
use crate::stats::Stat;

use super::{CombatEngine, MessageTag};

/// A primary attack to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRequest {
    pub attacker: EntityId,
    pub defender: EntityId,
    /// `None` follows the attack type (magic attacks are non-physical).
    pub is_physical: Option<bool>,
    /// `None` uses the attacker's own attack type.
    pub attack_type: Option<AttackType>,
    /// Basic attacks regain mana and spend the action timer.
    pub is_basic: bool,
}

impl AttackRequest {
    pub fn basic(attacker: EntityId, defender: EntityId) -> Self {
        Self {
            attacker,
            defender,
            is_physical: None,
            attack_type: None,
            is_basic: true,
        }
    }

    pub fn skill(attacker: EntityId, defender: EntityId, attack: SkillAttack) -> Self {
        Self {
            attacker,
            defender,
            is_physical: Some(attack.is_physical),
            attack_type: attack.attack_type,
            is_basic: false,
        }
    }
}

impl CombatEngine {
    /// Resolve an attack and every bonus attack it triggers.
    ///
    /// # Panics
    ///
    /// Panics if either side is dead or both are on the same team.
    pub fn resolve_attack(&mut self, request: AttackRequest) -> AttackChain {
        let (attacker, defender) = (request.attacker, request.defender);
        assert!(self.is_alive(attacker), "{attacker} cannot attack while dead");
        assert!(self.is_alive(defender), "{defender} is already dead");
        assert_ne!(
            self.team_of(attacker),
            self.team_of(defender),
            "{attacker} cannot attack an ally"
        );

        let ctx = self.attack_context(
            attacker,
            defender,
            request.is_physical,
            request.attack_type,
            request.is_basic,
        );
        let mut queue = VecDeque::new();
        let mut chain = AttackChain::default();
        self.resolve_with_repeat(ctx, &mut queue, &mut chain);
        self.drain_bonus_queue(queue, &mut chain);
        chain
    }

    /// Process queued bonus attacks in FIFO order until the queue empties or
    /// the per-action bound is reached.
    pub(crate) fn drain_bonus_queue(
        &mut self,
        mut queue: VecDeque<BonusAttack>,
        chain: &mut AttackChain,
    ) {
        let limit = self.config.max_bonus_attacks;
        let mut processed = 0;
        while let Some(bonus) = queue.pop_front() {
            if processed >= limit {
                chain.dropped_bonus_attacks = queue.len() + 1;
                tracing::debug!(
                    limit,
                    dropped = chain.dropped_bonus_attacks,
                    "bonus attack bound reached"
                );
                break;
            }
            if !self.can_attack(bonus.user, bonus.target) {
                continue;
            }
            processed += 1;

            let options = bonus.options;
            let mut ctx = self.attack_context(
                bonus.user,
                bonus.target,
                options.is_physical,
                options.attack_type,
                false,
            );
            ctx.is_bonus = true;
            ctx.ignore_range = options.ignore_range;
            if let Some(multiplier) = options.damage_multiplier {
                ctx.damage_multiplier *= multiplier;
            }
            if let Some(skill) = options.skill {
                self.add_effect(bonus.user, skill);
            }
            self.resolve_with_repeat(ctx, &mut queue, chain);
        }
    }

    fn can_attack(&self, attacker: EntityId, defender: EntityId) -> bool {
        self.is_alive(attacker)
            && self.is_alive(defender)
            && self.team_of(attacker) != self.team_of(defender)
    }

    fn attack_context(
        &self,
        attacker: EntityId,
        defender: EntityId,
        is_physical: Option<bool>,
        attack_type: Option<AttackType>,
        is_basic: bool,
    ) -> AttackContext {
        let state = self.entity(attacker);
        let attack_type = attack_type.unwrap_or(state.attack_type());
        let is_physical = is_physical.unwrap_or(attack_type.is_physical());
        let mut ctx = AttackContext::new(
            attacker,
            defender,
            is_physical,
            attack_type,
            is_basic,
            &self.config,
        );
        ctx.attribute = state.attribute();
        ctx
    }

    fn resolve_with_repeat(
        &mut self,
        ctx: AttackContext,
        queue: &mut VecDeque<BonusAttack>,
        chain: &mut AttackChain,
    ) {
        let (attacker, defender) = (ctx.attacker, ctx.defender);
        let (is_physical, attack_type, ignore_range) =
            (ctx.is_physical, ctx.attack_type, ctx.ignore_range);

        let (result, repeat) = self.resolve_single(ctx, queue);
        chain.results.push(result);

        if repeat && self.can_attack(attacker, defender) {
            let text = format!("{} strikes again!", self.name(attacker));
            self.message(MessageTag::Effect, text);
            let mut again = self.attack_context(
                attacker,
                defender,
                Some(is_physical),
                Some(attack_type),
                false,
            );
            again.is_bonus = true;
            again.ignore_range = ignore_range;
            let (result, _) = self.resolve_single(again, queue);
            chain.results.push(result);
        }
    }

    /// One attack from hook dispatch to cleanup. Returns the result and the
    /// repeat flag left by AFTER_ATTACK hooks.
    fn resolve_single(
        &mut self,
        mut ctx: AttackContext,
        queue: &mut VecDeque<BonusAttack>,
    ) -> (AttackResult, bool) {
        let (attacker, defender) = (ctx.attacker, ctx.defender);
        let distance = self.distance(attacker, defender);

        for effect in self.hooks(attacker, HookPhase::BeforeAttack) {
            effect.before_attack(self, attacker, &mut ctx);
        }
        for effect in self.hooks(defender, HookPhase::BeforeAttacked) {
            effect.before_attacked(self, defender, &mut ctx);
        }
        for ally in self.allies_of(defender) {
            for effect in self.hooks(ally, HookPhase::BeforeAllyAttacked) {
                effect.before_ally_attacked(self, ally, &mut ctx);
            }
        }

        let current = self.distance(attacker, defender);
        let in_range = ctx.ignore_range || self.total(attacker, Stat::Range) >= f64::from(current);

        let parried = self.check_parry(&mut ctx);
        let luck = self.luck_delta(attacker, defender);

        let (chance, hit) = if !in_range {
            let text = format!(
                "{} is out of range of {}.",
                self.name(defender),
                self.name(attacker)
            );
            self.message(MessageTag::Positioning, text);
            (0.0, false)
        } else if ctx.guaranteed_dodge {
            (0.0, false)
        } else {
            let shift = self.total(attacker, Stat::AccuracyDistance);
            let chance = hit_chance(
                self.total(attacker, Stat::Acc),
                self.total(defender, Stat::Avo),
                effective_distance(current, shift),
                &self.config.hit,
            );
            let hit = self.rng.luck_check(chance, luck);
            let text = format!("{:.0}% chance to hit.", chance.min(1.0) * 100.0);
            self.message(MessageTag::Probability, text);
            (chance, hit)
        };

        let (damage, crit) = if hit {
            let (amount, crit) = self.roll_damage(&ctx, luck);
            let dealt = self.apply_damage(attacker, defender, amount);
            let text = format!(
                "{} {}hits {} for {dealt} damage.",
                self.name(attacker),
                if crit { "critically " } else { "" },
                self.name(defender)
            );
            self.message(MessageTag::Damage, text);
            if self.entity(defender).defending {
                self.break_guard(defender);
            }
            self.announce_if_fallen(defender);
            (dealt, crit)
        } else {
            if in_range {
                let text = format!("{} misses {}.", self.name(attacker), self.name(defender));
                self.message(MessageTag::Damage, text);
            }
            (0, false)
        };

        let result = AttackResult {
            attacker,
            defender,
            distance,
            in_range,
            hit_chance: chance,
            hit,
            crit,
            parried,
            damage,
            killed: !self.is_alive(defender),
            is_bonus: ctx.is_bonus,
            is_physical: ctx.is_physical,
            attack_type: ctx.attack_type,
        };

        for effect in self.hooks(attacker, HookPhase::AfterAttack) {
            effect.after_attack(self, attacker, &mut ctx, &result);
        }
        for effect in self.hooks(defender, HookPhase::AfterAttacked) {
            effect.after_attacked(self, defender, &mut ctx, &result);
        }

        if ctx.is_basic && !ctx.is_bonus {
            self.restore_mana(attacker, ctx.mana_gain);
            self.spend_action_time(attacker, ctx.base_usage * ctx.time_multiplier);
        }

        self.cleanup_expired();
        queue.extend(ctx.bonus_attacks.drain(..));
        (result, ctx.repeat)
    }

    /// Consume the defender's parry, if any. Returns true when it matched the
    /// attack type and took effect.
    fn check_parry(&mut self, ctx: &mut AttackContext) -> bool {
        let (attacker, defender) = (ctx.attacker, ctx.defender);
        let Some(parry) = self.entity_mut(defender).parry.take() else {
            return false;
        };

        if parry.attack_type != ctx.attack_type {
            let text = format!(
                "{}'s {} is wasted against a {} attack.",
                self.name(defender),
                parry.name,
                ctx.attack_type
            );
            self.message(MessageTag::Effect, text);
            return false;
        }

        ctx.damage_multiplier *= parry.damage_multiplier;
        if parry.dodge {
            ctx.guaranteed_dodge = true;
        }
        if let Some(counter) = parry.counter {
            ctx.queue_bonus(BonusAttack::new(defender, attacker).with_options(counter));
        }
        let text = format!("{} parries with {}!", self.name(defender), parry.name);
        self.message(MessageTag::Effect, text);

        for effect in self.hooks(defender, HookPhase::OnParry) {
            effect.on_parry(self, defender, ctx);
        }
        true
    }

    /// The first hit against a defending entity uses up its stance and
    /// refunds mana.
    fn break_guard(&mut self, defender: EntityId) {
        self.entity_mut(defender).defending = false;
        let text = format!("{}'s guard absorbs the blow.", self.name(defender));
        self.message(MessageTag::Effect, text);
        let gain = self.config.mana.defend_gain;
        self.restore_mana(defender, gain);
    }

    /// Draw variance and crit and compute the final damage of a hit.
    fn roll_damage(&mut self, ctx: &AttackContext, luck: i32) -> (u32, bool) {
        let (attacker, defender) = (ctx.attacker, ctx.defender);
        let (offense_stat, defense_stat) = if ctx.is_physical {
            (Stat::Atk, Stat::Def)
        } else {
            (Stat::Mag, Stat::Res)
        };
        let offense = self.total(attacker, offense_stat);
        let defense = if ctx.opportunism {
            self.total(defender, Stat::Def)
                .min(self.total(defender, Stat::Res))
        } else {
            self.total(defender, defense_stat)
        };

        let params = self.config.damage.clone();
        let variance = variance_factor(self.rng.luck_skewed(luck), params.variance);
        let crit_rate = self.total(attacker, Stat::Crit) / 100.0;
        let crit = self.rng.luck_check(crit_rate, luck);

        let target = self.entity(defender);
        let roll = DamageRoll {
            offense,
            defense,
            variance,
            crit: if crit {
                self.total(attacker, Stat::CritDamage)
            } else {
                1.0
            },
            attribute: attribute_multiplier(
                target.weakness_stacks(ctx.attribute),
                target.resistance_stacks(ctx.attribute),
                target.stats.total(Stat::WeaknessModifier),
                target.stats.total(Stat::ResistanceModifier),
            ),
            reduction: target.stats.total(Stat::DamageReduction),
            defend: if target.defending {
                params.defend_multiplier
            } else {
                1.0
            },
            hooks: ctx.damage_multiplier,
        };
        tracing::trace!(?roll, "damage roll");
        (roll.total(&params), crit)
    }
}
