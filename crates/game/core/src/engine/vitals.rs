//! HP, MP and action-timer bookkeeping.

use crate::effect::{HealEvent, HookPhase};
use crate::state::EntityId;

use super::{CombatEngine, MessageTag};

impl CombatEngine {
    /// Remove up to `amount` HP from `target` on behalf of `source`,
    /// crediting the source in the target's aggro map. Returns HP removed.
    pub(crate) fn apply_damage(&mut self, source: EntityId, target: EntityId, amount: u32) -> u32 {
        if !self.is_alive(target) {
            return 0;
        }
        let per_damage = self.config.aggro.per_damage;
        let state = self.entity_mut(target);
        let dealt = state.stats.take_damage(amount);
        if source != target {
            state.aggro.add(source, f64::from(dealt) * per_damage);
        }
        dealt
    }

    /// Direct damage outside the attack pipeline (reflected damage, effects).
    pub fn deal_damage(&mut self, source: EntityId, target: EntityId, amount: u32) -> u32 {
        let dealt = self.apply_damage(source, target, amount);
        if dealt > 0 {
            let text = format!("{} takes {dealt} damage.", self.name(target));
            self.message(MessageTag::Damage, text);
            self.announce_if_fallen(target);
        }
        dealt
    }

    pub(crate) fn announce_if_fallen(&mut self, id: EntityId) {
        if !self.is_alive(id) {
            let text = format!("{} falls.", self.name(id));
            self.message(MessageTag::Damage, text);
        }
    }

    /// Heal `target`. ON_HEAL hooks on the healer may rescale the amount
    /// first. The fallen are not revived. Returns HP restored.
    pub fn heal(&mut self, healer: EntityId, target: EntityId, amount: f64) -> u32 {
        if !self.is_alive(target) {
            return 0;
        }
        let mut event = HealEvent {
            healer,
            target,
            amount,
        };
        for effect in self.hooks(healer, HookPhase::OnHeal) {
            effect.on_heal(self, healer, &mut event);
        }
        let amount = event.amount.max(0.0).round() as u32;
        let healed = self.entity_mut(target).stats.restore_hp(amount);
        if healed > 0 {
            let text = format!("{} recovers {healed} HP.", self.name(target));
            self.message(MessageTag::Resource, text);
        }
        healed
    }

    /// Restore MP, clamped to max. Returns MP restored.
    pub fn restore_mana(&mut self, id: EntityId, amount: u32) -> u32 {
        let restored = self.entity_mut(id).stats.restore_mp(amount);
        if restored > 0 {
            let text = format!("{} recovers {restored} MP.", self.name(id));
            self.message(MessageTag::Resource, text);
        }
        restored
    }

    pub fn action_timer(&self, id: EntityId) -> f64 {
        self.entity(id).action_timer
    }

    /// Spend action time. The timer floors at zero.
    pub fn spend_action_time(&mut self, id: EntityId, amount: f64) {
        let state = self.entity_mut(id);
        state.action_timer = (state.action_timer - amount.max(0.0)).max(0.0);
    }

    /// Set the action timer, clamped to `[0, max_action_timer]`.
    pub fn set_action_timer(&mut self, id: EntityId, value: f64) {
        let max = self.config.timing.max_action_timer;
        self.entity_mut(id).action_timer = value.clamp(0.0, max);
    }
}
