use crate::effect::{Effect, EffectKey, HookPhases};
use crate::engine::CombatEngine;
use crate::state::EntityId;

use super::StatusKind;

/// Registry entry for an active status. Behaviour is driven by the kind and
/// by the payload stored in the owner's status table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self { kind, duration }
    }
}

impl Effect for StatusEffect {
    fn key(&self) -> EffectKey {
        EffectKey::Status(self.kind)
    }

    fn phases(&self) -> HookPhases {
        if self.kind.is_damage_over_time() {
            HookPhases::END_TURN
        } else if self.kind.skips_turn() {
            HookPhases::START_TURN
        } else if self.kind.stat_mods(1.0).is_some() {
            HookPhases::IMMEDIATE
        } else {
            HookPhases::empty()
        }
    }

    fn duration(&self) -> Option<u32> {
        Some(self.duration)
    }

    fn immediate(&self, engine: &mut CombatEngine, owner: EntityId) {
        if let Some(mods) = engine.status_mods(owner, self.kind) {
            engine.apply_mult(owner, &mods);
        }
    }

    fn on_remove(&self, engine: &mut CombatEngine, owner: EntityId) {
        if let Some(mods) = engine.status_mods(owner, self.kind) {
            engine.revert_mult(owner, &mods);
        }
    }

    fn start_turn(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.skip_turn(owner);
    }

    fn end_turn(&self, engine: &mut CombatEngine, owner: EntityId) {
        engine.tick_damage_over_time(owner, self.kind);
    }
}
