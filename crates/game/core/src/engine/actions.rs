//! Validated decisions for the current actor.
//!
//! Every `perform_*` method checks its preconditions before touching any
//! state and reports failures as [`ActionError`], so a rejected decision
//! leaves the turn exactly as it was.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use crate::combat::AttackChain;
use crate::config::CombatConfig;
use crate::decision::{Decision, DecisionProvider};
use crate::effect::{EffectKey, HookPhase, RepositionEvent, SkillEvent};
use crate::error::CombatError;
use crate::skill::{ActiveSkill, SkillId, SkillUse, TargetSide, Targeting};
use crate::state::{EntityId, Team};

use super::{ActionError, AttackRequest, CombatEngine, MessageTag};

#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Attack(AttackChain),
    Skill(SkillOutcome),
    Reposition(RepositionOutcome),
    Defend,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillOutcome {
    pub skill: SkillId,
    /// A toggle skill was switched off instead of activated.
    pub toggled_off: bool,
    /// Effects that were newly registered.
    pub granted: usize,
    /// Attack resolved by an attacking skill.
    pub attack: Option<AttackChain>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepositionOutcome {
    /// Action time spent.
    pub cost: f64,
    /// Bonus attacks triggered by ON_REPOSITION hooks.
    pub reactions: AttackChain,
}

/// What happened during one [`CombatEngine::play_turn`].
#[derive(Clone, Debug, PartialEq)]
pub struct TurnSummary {
    pub actor: EntityId,
    pub skipped: bool,
    pub outcome: Option<ActionOutcome>,
    /// Decisions rejected before one was accepted.
    pub rejected: Vec<ActionError>,
}

impl CombatEngine {
    /// The surviving team once the other is wiped out.
    ///
    /// If both teams fall at once the opponents are credited with the win.
    pub fn check_victory(&self) -> Option<Team> {
        let players = !self.living(Team::Players).is_empty();
        let opponents = !self.living(Team::Opponents).is_empty();
        match (players, opponents) {
            (true, true) => None,
            (true, false) => Some(Team::Players),
            (false, _) => Some(Team::Opponents),
        }
    }

    fn validate_actor(&self, actor: EntityId) -> Result<(), ActionError> {
        if self.check_victory().is_some() {
            return Err(ActionError::EncounterOver);
        }
        if self.turn.current != Some(actor) {
            return Err(ActionError::NotCurrentActor { actor });
        }
        Ok(())
    }

    fn is_living_opponent(&self, actor: EntityId, target: EntityId) -> bool {
        target.index() < self.entities.len()
            && self.is_alive(target)
            && self.team_of(target) != self.team_of(actor)
    }

    /// Validate and dispatch a decision for `actor`.
    pub fn submit(
        &mut self,
        actor: EntityId,
        decision: &Decision,
    ) -> Result<ActionOutcome, ActionError> {
        match decision {
            Decision::Attack { target } => {
                self.perform_attack(actor, *target).map(ActionOutcome::Attack)
            }
            Decision::Skill {
                index,
                targets,
                parameter,
            } => self
                .perform_active_skill(actor, *index, targets, *parameter)
                .map(ActionOutcome::Skill),
            Decision::Reposition { targets, amount } => self
                .perform_reposition(actor, targets, *amount)
                .map(ActionOutcome::Reposition),
            Decision::Defend => self.perform_defend(actor).map(|()| ActionOutcome::Defend),
        }
    }

    /// Basic attack against a living opponent.
    pub fn perform_attack(
        &mut self,
        actor: EntityId,
        target: EntityId,
    ) -> Result<AttackChain, ActionError> {
        self.validate_actor(actor)?;
        if !self.is_living_opponent(actor, target) {
            return Err(ActionError::InvalidTargets);
        }
        Ok(self.resolve_attack(AttackRequest::basic(actor, target)))
    }

    /// Use the actor's `index`-th active skill.
    ///
    /// Toggle skills that are already on are switched off instead. Mana is
    /// spent, ON_ATTACK_SKILL fires on the user's opponents for attacking
    /// skills, the granted effects are registered, action time is spent, and
    /// an attacking skill then resolves its attack against the first target.
    pub fn perform_active_skill(
        &mut self,
        actor: EntityId,
        index: usize,
        targets: &[EntityId],
        parameter: i32,
    ) -> Result<SkillOutcome, ActionError> {
        self.validate_actor(actor)?;
        let skill = self
            .entity(actor)
            .template
            .actives
            .get(index)
            .map(Arc::clone)
            .ok_or(ActionError::UnknownSkill { index })?;
        let id = skill.id();

        if skill.is_toggle() && self.entity(actor).toggles.contains(&id) {
            return Ok(self.toggle_off(actor, skill.as_ref()));
        }

        let targets = self.validate_skill_targets(actor, skill.targeting(), targets)?;
        let cost = skill.mana_cost();
        let available = self.entity(actor).stats.mp();
        if available < cost {
            return Err(ActionError::InsufficientMana {
                required: cost,
                available,
            });
        }

        self.entity_mut(actor).stats.spend_mp(cost);
        let text = format!("{} uses {}.", self.name(actor), skill.name());
        self.message(MessageTag::Effect, text);

        if skill.attack().is_some() {
            let event = SkillEvent {
                user: actor,
                skill: id,
                targets: targets.clone(),
            };
            for opponent in self.opponents_of(actor) {
                for effect in self.hooks(opponent, HookPhase::OnAttackSkill) {
                    effect.on_attack_skill(self, opponent, &event);
                }
            }
        }

        let usage = SkillUse {
            skill: id,
            user: actor,
            targets: targets.clone(),
            parameter,
        };
        let mut granted = 0;
        for grant in skill.activate(&usage) {
            let key = grant.effect.key();
            if !self.is_alive(grant.recipient) {
                continue;
            }
            if self.add_effect(grant.recipient, grant.effect) {
                granted += 1;
                if skill.is_toggle() {
                    self.entity_mut(grant.recipient).effects.skip_next_tick(key);
                }
            }
        }
        if skill.is_toggle() {
            self.entity_mut(actor).toggles.insert(id);
        }

        let usage = self.config.timing.basic_action_usage * skill.time_multiplier();
        self.spend_action_time(actor, usage);

        let attack = match (skill.attack(), targets.first()) {
            (Some(attack), Some(&target)) if self.is_living_opponent(actor, target) => Some(
                self.resolve_attack(AttackRequest::skill(actor, target, attack)),
            ),
            _ => None,
        };
        self.cleanup_expired();

        Ok(SkillOutcome {
            skill: id,
            toggled_off: false,
            granted,
            attack,
        })
    }

    fn validate_skill_targets(
        &self,
        actor: EntityId,
        targeting: Targeting,
        targets: &[EntityId],
    ) -> Result<Vec<EntityId>, ActionError> {
        if targeting.side == TargetSide::User {
            return Ok(vec![actor]);
        }
        if !targeting.accepts(targets.len()) {
            return Err(ActionError::InvalidTargets);
        }
        let distinct: BTreeSet<_> = targets.iter().collect();
        if distinct.len() != targets.len() {
            return Err(ActionError::InvalidTargets);
        }
        let team = self.team_of(actor);
        let valid = targets.iter().all(|&t| {
            t.index() < self.entities.len()
                && self.is_alive(t)
                && match targeting.side {
                    TargetSide::Ally => self.team_of(t) == team,
                    TargetSide::Enemy => self.team_of(t) != team,
                    TargetSide::User => t == actor,
                }
        });
        if !valid {
            return Err(ActionError::InvalidTargets);
        }
        Ok(targets.to_vec())
    }

    fn toggle_off(&mut self, actor: EntityId, skill: &dyn ActiveSkill) -> SkillOutcome {
        let id = skill.id();
        self.entity_mut(actor).toggles.remove(&id);
        for owner in self.ids().collect::<Vec<_>>() {
            let keys: Vec<EffectKey> = self
                .entity(owner)
                .effects
                .keys()
                .into_iter()
                .filter(|key| {
                    matches!(
                        key,
                        EffectKey::Skill { skill, source, .. } if *skill == id && *source == actor
                    )
                })
                .collect();
            for key in keys {
                self.remove_effect(owner, key);
            }
        }
        let text = format!("{} ends {}.", self.name(actor), skill.name());
        self.message(MessageTag::Effect, text);
        let usage = self.config.timing.basic_action_usage * skill.time_multiplier();
        self.spend_action_time(actor, usage);
        SkillOutcome {
            skill: id,
            toggled_off: true,
            granted: 0,
            attack: None,
        }
    }

    /// Change the actor's distance to each target by `amount` (negative
    /// closes in), bounded to `±MAX_REPOSITION_STEP` per call.
    ///
    /// Costs `base_cost + cost_per_step × |amount| × targets` action time.
    /// ON_REPOSITION fires on every living entity afterwards; bonus attacks
    /// it queues are resolved before returning.
    pub fn perform_reposition(
        &mut self,
        actor: EntityId,
        targets: &[EntityId],
        amount: i8,
    ) -> Result<RepositionOutcome, ActionError> {
        self.validate_actor(actor)?;
        if amount == 0 || amount.unsigned_abs() > CombatConfig::MAX_REPOSITION_STEP.unsigned_abs() {
            return Err(ActionError::RepositionOutOfBounds { amount });
        }
        if self.entity(actor).statuses.restricts_movement() {
            return Err(ActionError::MovementRestricted);
        }
        let distinct: BTreeSet<_> = targets.iter().collect();
        if targets.is_empty()
            || distinct.len() != targets.len()
            || !targets.iter().all(|&t| self.is_living_opponent(actor, t))
        {
            return Err(ActionError::InvalidTargets);
        }
        if targets
            .iter()
            .any(|&t| self.positions.shifted(actor, t, amount).is_none())
        {
            return Err(ActionError::RepositionOutOfBounds { amount });
        }
        let params = &self.config.reposition;
        let cost = params.base_cost
            + params.cost_per_step * f64::from(amount.unsigned_abs()) * targets.len() as f64;
        let available = self.action_timer(actor);
        if cost > available {
            return Err(ActionError::InsufficientActionTime {
                required: cost,
                available,
            });
        }

        for &target in targets {
            let before = self.distance(actor, target);
            if let Some(after) = self.positions.shifted(actor, target, amount) {
                self.positions.set(actor, target, after);
                let verb = if amount < 0 { "closes in on" } else { "backs away from" };
                let text = format!(
                    "{} {verb} {} ({before} → {after}).",
                    self.name(actor),
                    self.name(target)
                );
                self.message(MessageTag::Positioning, text);
            }
        }
        self.spend_action_time(actor, cost);

        let event = RepositionEvent {
            mover: actor,
            targets: targets.to_vec(),
            delta: amount,
        };
        let mut queued = Vec::new();
        for id in self.living_ids() {
            for effect in self.hooks(id, HookPhase::OnReposition) {
                effect.on_reposition(self, id, &event, &mut queued);
            }
        }
        let mut reactions = AttackChain::default();
        self.drain_bonus_queue(VecDeque::from(queued), &mut reactions);

        Ok(RepositionOutcome { cost, reactions })
    }

    /// Brace until the actor's next turn. The first hit taken in the stance
    /// is reduced and refunds mana.
    pub fn perform_defend(&mut self, actor: EntityId) -> Result<(), ActionError> {
        self.validate_actor(actor)?;
        self.entity_mut(actor).defending = true;
        let text = format!("{} braces for impact.", self.name(actor));
        self.message(MessageTag::Effect, text);
        let usage = self.config.timing.defend_usage;
        self.spend_action_time(actor, usage);
        Ok(())
    }

    /// Run one full turn: advance, begin, decide and act, end.
    ///
    /// Rejected decisions are retried up to `MAX_DECISION_ATTEMPTS` times,
    /// after which the actor defends.
    ///
    /// # Panics
    ///
    /// Panics if the encounter is already decided.
    pub fn play_turn(&mut self, provider: &mut dyn DecisionProvider) -> TurnSummary {
        assert!(
            self.check_victory().is_none(),
            "play_turn called on a decided encounter"
        );
        let actor = self.advance();
        let start = self.begin_turn();
        let mut outcome = None;
        let mut rejected = Vec::new();

        if !start.skipped && self.check_victory().is_none() {
            for _ in 0..CombatConfig::MAX_DECISION_ATTEMPTS {
                let decision = provider.decide(self, actor);
                match self.submit(actor, &decision) {
                    Ok(done) => {
                        outcome = Some(done);
                        break;
                    }
                    Err(error) => {
                        tracing::debug!(
                            actor = actor.0,
                            code = error.error_code(),
                            severity = error.severity().as_str(),
                            "decision rejected: {error}"
                        );
                        rejected.push(error);
                    }
                }
            }
            if outcome.is_none() && self.perform_defend(actor).is_ok() {
                outcome = Some(ActionOutcome::Defend);
            }
        }

        self.end_turn();
        TurnSummary {
            actor,
            skipped: start.skipped,
            outcome,
            rejected,
        }
    }

    /// Play turns until one team wins or `max_turns` have elapsed.
    pub fn run(&mut self, provider: &mut dyn DecisionProvider, max_turns: u64) -> Option<Team> {
        for _ in 0..max_turns {
            if let Some(winner) = self.check_victory() {
                return Some(winner);
            }
            self.play_turn(provider);
        }
        self.check_victory()
    }
}
