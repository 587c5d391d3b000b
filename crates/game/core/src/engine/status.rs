//! Status application, amplification and teardown.

use std::sync::Arc;

use crate::effect::{EffectKey, HookPhase, StatusEvent};
use crate::state::EntityId;
use crate::stats::{Stat, StatMods};
use crate::status::{
    Amplify, StatusApplication, StatusCondition, StatusEffect, StatusKind, extension_chance,
    resist_chance,
};

use super::{CombatEngine, MessageTag};

impl CombatEngine {
    /// Try to apply a status condition to `target`.
    ///
    /// If the kind is already active the existing instance is amplified and
    /// the call always lands. Otherwise the target resists with probability
    /// `(tolerance/max) × STATUS_RESISTANCE(target) × STATUS_APPLICATION(inflicter)`;
    /// a resist wears the target's tolerance down.
    ///
    /// # Panics
    ///
    /// Panics if `target` is dead or the strength is not a finite, non-negative
    /// number (stat statuses additionally need a non-zero strength).
    pub fn apply_status(
        &mut self,
        target: EntityId,
        condition: StatusCondition,
    ) -> StatusApplication {
        assert!(self.is_alive(target), "cannot apply a status to dead {target}");
        assert!(
            condition.strength.is_finite() && condition.strength >= 0.0,
            "status strength must be finite and non-negative"
        );
        assert!(
            condition.kind.stat_mods(1.0).is_none() || condition.strength > 0.0,
            "{} needs a positive strength",
            condition.kind
        );
        let kind = condition.kind;

        if self.entity(target).statuses.contains(kind) {
            self.amplify_status(target, condition);
            self.status_applied(target, condition, true);
            return StatusApplication::Amplified;
        }

        let params = self.config.status.clone();
        let tolerance = self
            .entity(target)
            .statuses
            .tolerance(kind, params.base_tolerance);
        let chance = resist_chance(
            tolerance,
            self.total(target, Stat::StatusResistance),
            self.total(condition.inflicter, Stat::StatusApplication),
        );
        let luck = self.luck_delta(condition.inflicter, target);
        let draw = self.rng.luck_skewed(luck);
        let text = format!(
            "{} has a {:.0}% chance to resist {kind}.",
            self.name(target),
            chance * 100.0
        );
        self.message(MessageTag::Probability, text);

        if draw < chance {
            self.entity_mut(target).statuses.wear_tolerance(
                kind,
                params.base_tolerance,
                params.resist_tolerance_loss,
            );
            let text = format!("{} resists {kind}.", self.name(target));
            self.message(MessageTag::Status, text);
            return StatusApplication::Resisted;
        }

        self.entity_mut(target).statuses.insert(condition);
        self.add_effect(
            target,
            Arc::new(StatusEffect::new(kind, condition.duration)),
        );
        let text = format!("{} is {}.", self.name(target), kind.adjective());
        self.message(MessageTag::Status, text);
        self.status_applied(target, condition, false);
        StatusApplication::Applied
    }

    fn status_applied(&mut self, target: EntityId, condition: StatusCondition, amplified: bool) {
        let event = StatusEvent {
            target,
            inflicter: condition.inflicter,
            kind: condition.kind,
            amplified,
        };
        let mut owners = vec![target];
        if condition.inflicter != target {
            owners.push(condition.inflicter);
        }
        for owner in owners {
            for effect in self.hooks(owner, HookPhase::OnStatusApplied) {
                effect.on_status_applied(self, owner, &event);
            }
        }
    }

    /// Merge a second application into the active instance and extend its
    /// remaining duration.
    fn amplify_status(&mut self, target: EntityId, incoming: StatusCondition) {
        let kind = incoming.kind;
        let key = EffectKey::Status(kind);
        let Some(existing) = self.entity(target).statuses.get(kind).copied() else {
            return;
        };
        let remaining = self
            .entity(target)
            .effects
            .get(key)
            .and_then(|active| active.remaining())
            .unwrap_or(0)
            .max(0);
        let refresh = incoming
            .duration
            .saturating_sub(u32::try_from(remaining).unwrap_or(u32::MAX));

        let (strength, extension) = match kind.amplify() {
            Amplify::Stack => (existing.strength + incoming.strength, refresh),
            Amplify::Strongest => (existing.strength.max(incoming.strength), refresh),
            Amplify::Average => ((existing.strength + incoming.strength) / 2.0, refresh),
            Amplify::Extend => {
                let chance = extension_chance(self.config.status.extension_probability);
                let luck = self.luck_delta(incoming.inflicter, target);
                let ticks = (0..incoming.duration)
                    .filter(|_| self.rng.luck_check(chance, luck))
                    .count() as u32;
                (existing.strength, ticks)
            }
        };

        let old_mods = kind.stat_mods(existing.strength);
        if let Some(old) = &old_mods {
            self.revert_mult(target, old);
        }
        if let Some(payload) = self.entity_mut(target).statuses.get_mut(kind) {
            payload.strength = strength;
            payload.inflicter = incoming.inflicter;
        }
        if old_mods.is_some() {
            if let Some(new) = kind.stat_mods(strength) {
                self.apply_mult(target, &new);
            }
        }
        self.entity_mut(target).effects.extend(key, extension);

        let text = format!(
            "{}'s {kind} intensifies (+{extension} turns).",
            self.name(target)
        );
        self.message(MessageTag::Status, text);
    }

    /// Remove a status early. Returns false if it was not active.
    pub fn cure_status(&mut self, target: EntityId, kind: StatusKind) -> bool {
        self.remove_effect(target, EffectKey::Status(kind))
    }

    pub fn has_status(&self, target: EntityId, kind: StatusKind) -> bool {
        self.entity(target).statuses.contains(kind)
    }

    pub fn status(&self, target: EntityId, kind: StatusKind) -> Option<&StatusCondition> {
        self.entity(target).statuses.get(kind)
    }

    /// Stat multipliers the active `kind` currently applies to `owner`.
    pub(crate) fn status_mods(&self, owner: EntityId, kind: StatusKind) -> Option<StatMods> {
        let condition = self.entity(owner).statuses.get(kind)?;
        kind.stat_mods(condition.strength)
    }

    /// Drop the payload and let tolerance recover. Runs after the status
    /// effect's own teardown.
    pub(crate) fn teardown_status(&mut self, owner: EntityId, kind: StatusKind) {
        let params = self.config.status.clone();
        let state = self.entity_mut(owner);
        if state.statuses.remove(kind).is_none() {
            return;
        }
        state
            .statuses
            .grow_tolerance(kind, params.base_tolerance, params.tolerance_growth);
        if state.is_alive() {
            let text = format!("{} is no longer {}.", self.name(owner), kind.adjective());
            self.message(MessageTag::Status, text);
        }
    }

    /// Deal one tick of a damage-over-time status and notify the
    /// inflicter's team.
    pub(crate) fn tick_damage_over_time(&mut self, owner: EntityId, kind: StatusKind) {
        let Some(condition) = self.entity(owner).statuses.get(kind).copied() else {
            return;
        };
        if !self.is_alive(owner) {
            return;
        }
        let amount = condition.strength.ceil() as u32;
        let dealt = self.apply_damage(condition.inflicter, owner, amount);
        let text = format!("{} takes {dealt} {kind} damage.", self.name(owner));
        self.message(MessageTag::Status, text);
        self.announce_if_fallen(owner);

        let team = self.team_of(owner).opposite();
        for id in self.living(team) {
            for effect in self.hooks(id, HookPhase::OnOpponentDot) {
                effect.on_opponent_dot(self, id, owner, dealt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::RngOracle;
    use crate::state::{CombatEntity, Team};
    use crate::stats::BaseStats;

    /// Always draws the same value.
    struct Fixed(f64);

    impl RngOracle for Fixed {
        fn next_u32(&mut self) -> u32 {
            (self.0 * f64::from(u32::MAX)) as u32
        }

        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn pair(draw: f64) -> (CombatEngine, EntityId, EntityId) {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        let a = builder.join(
            Team::Players,
            CombatEntity::new("Hexer", BaseStats::defaults().with(Stat::Atk, 10.0)),
        );
        let b = builder.join(
            Team::Opponents,
            CombatEntity::new("Mark", BaseStats::defaults().with(Stat::Atk, 10.0)),
        );
        builder.rng(Box::new(Fixed(draw)));
        (builder.build(), a, b)
    }

    #[test]
    fn low_draw_is_resisted_and_wears_tolerance() {
        // default resist chance at full tolerance: 1 × 0.5 × 1 = 0.5
        let (mut engine, a, b) = pair(0.1);
        let outcome = engine.apply_status(b, StatusCondition::new(StatusKind::Poison, a, 3.0, 2));
        assert_eq!(outcome, StatusApplication::Resisted);
        let tolerance = engine.entity(b).statuses.tolerance(StatusKind::Poison, 100.0);
        assert_eq!(tolerance.current, 75.0);
    }

    #[test]
    fn amplify_always_lands() {
        let (mut engine, a, b) = pair(0.9);
        let first = engine.apply_status(b, StatusCondition::new(StatusKind::Poison, a, 3.0, 2));
        assert_eq!(first, StatusApplication::Applied);
        let second = engine.apply_status(b, StatusCondition::new(StatusKind::Poison, a, 2.0, 2));
        assert_eq!(second, StatusApplication::Amplified);
        assert_eq!(engine.status(b, StatusKind::Poison).unwrap().strength, 5.0);
    }

    #[test]
    fn weaken_averages_and_reverts_cleanly() {
        let (mut engine, a, b) = pair(0.9);
        engine.apply_status(b, StatusCondition::new(StatusKind::Weaken, a, 0.5, 3));
        assert_eq!(engine.total(b, Stat::Atk), 5.0);
        engine.apply_status(b, StatusCondition::new(StatusKind::Weaken, a, 0.7, 3));
        assert_eq!(engine.total(b, Stat::Atk), 6.0);
        assert!(engine.cure_status(b, StatusKind::Weaken));
        assert_eq!(engine.total(b, Stat::Atk), 10.0);
        assert!(!engine.has_status(b, StatusKind::Weaken));
    }

    #[test]
    fn removal_grows_tolerance() {
        let (mut engine, a, b) = pair(0.9);
        engine.apply_status(b, StatusCondition::new(StatusKind::Root, a, 1.0, 1));
        engine.cure_status(b, StatusKind::Root);
        let tolerance = engine.entity(b).statuses.tolerance(StatusKind::Root, 100.0);
        assert_eq!(tolerance.max, 125.0);
        assert_eq!(tolerance.current, 125.0);
    }

    #[test]
    fn extend_amplify_adds_ticks_on_success() {
        // draw 0.9 ≥ 1 − 0.159, so every extension trial succeeds
        let (mut engine, a, b) = pair(0.9);
        engine.apply_status(b, StatusCondition::new(StatusKind::Burn, a, 2.0, 2));
        engine.apply_status(b, StatusCondition::new(StatusKind::Burn, a, 4.0, 3));
        let key = EffectKey::Status(StatusKind::Burn);
        assert_eq!(engine.entity(b).effects.get(key).unwrap().remaining(), Some(5));
        assert_eq!(engine.status(b, StatusKind::Burn).unwrap().strength, 2.0);
    }
}
