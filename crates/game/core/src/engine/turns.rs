use crate::effect::HookPhase;
use crate::state::EntityId;
use crate::stats::Stat;

use super::{CombatEngine, MessageTag};

/// Relative tolerance when comparing times-to-full for ties.
const TIE_EPSILON: f64 = 1e-9;

/// Outcome of [`CombatEngine::begin_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnStart {
    pub actor: EntityId,
    /// START_TURN hooks consumed the turn (e.g. stun); go straight to
    /// [`CombatEngine::end_turn`].
    pub skipped: bool,
}

/// Turn scheduling methods for CombatEngine.
impl CombatEngine {
    /// Elapsed combat time.
    pub fn clock(&self) -> f64 {
        self.turn.clock
    }

    /// Entity whose turn is in progress, between `advance` and `end_turn`.
    pub fn current_actor(&self) -> Option<EntityId> {
        self.turn.current
    }

    pub fn previous_actor(&self) -> Option<EntityId> {
        self.turn.previous
    }

    pub fn turns_taken(&self) -> u64 {
        self.turn.turns_taken
    }

    fn root_speed(&self, id: EntityId) -> f64 {
        self.total(id, Stat::Spd).max(1.0).sqrt()
    }

    /// Time until `id`'s action timer fills: `(MAX − timer) / √SPD`.
    pub fn time_to_full(&self, id: EntityId) -> f64 {
        let max = self.config.timing.max_action_timer;
        (max - self.entity(id).action_timer).max(0.0) / self.root_speed(id)
    }

    /// Advance time to the next actor and make it current.
    ///
    /// The previous actor goes again if its timer is still full. Otherwise
    /// every living entity's timer advances by `Δ·√SPD`, where `Δ` is the
    /// smallest time-to-full; ties are broken uniformly at random. Every
    /// other living entity then receives ADVANCE_TURN.
    ///
    /// # Panics
    ///
    /// Panics if a turn is already in progress or nobody is alive.
    pub fn advance(&mut self) -> EntityId {
        if let Some(current) = self.turn.current {
            panic!("advance called while {current} is mid-turn");
        }
        let living = self.living_ids();
        assert!(!living.is_empty(), "advance called with no living entities");

        let repeat = self
            .turn
            .previous
            .filter(|&p| self.is_alive(p) && self.time_to_full(p) <= TIE_EPSILON);

        let (next, elapsed) = match repeat {
            Some(previous) => (previous, 0.0),
            None => self.pick_next(&living),
        };

        if elapsed > 0.0 {
            let max = self.config.timing.max_action_timer;
            for &id in &living {
                let gain = elapsed * self.root_speed(id);
                let state = self.entity_mut(id);
                state.action_timer = (state.action_timer + gain).min(max);
            }
        }
        let max = self.config.timing.max_action_timer;
        self.entity_mut(next).action_timer = max;
        self.turn.clock += elapsed;
        self.turn.current = Some(next);

        let text = format!("{}'s turn.", self.name(next));
        self.message(MessageTag::Turn, text);

        let previous = self.turn.previous;
        for id in living.into_iter().filter(|&id| id != next) {
            for effect in self.hooks(id, HookPhase::AdvanceTurn) {
                effect.advance_turn(self, id, previous, next);
            }
        }
        next
    }

    fn pick_next(&mut self, living: &[EntityId]) -> (EntityId, f64) {
        let times: Vec<(EntityId, f64)> = living
            .iter()
            .map(|&id| (id, self.time_to_full(id)))
            .collect();
        let min = times
            .iter()
            .map(|&(_, t)| t)
            .fold(f64::INFINITY, f64::min);
        let tolerance = TIE_EPSILON * min.max(1.0);
        let tied: Vec<EntityId> = times
            .iter()
            .filter(|&&(_, t)| t - min <= tolerance)
            .map(|&(id, _)| id)
            .collect();
        let next = match tied.len() {
            1 => tied[0],
            n => tied[self.rng.choose_index(n)],
        };
        (next, min)
    }

    /// Start the current actor's turn: drop its defend stance and fire
    /// START_TURN. A skipped turn spends a basic action's worth of time.
    ///
    /// # Panics
    ///
    /// Panics if no turn is in progress.
    pub fn begin_turn(&mut self) -> TurnStart {
        let Some(actor) = self.turn.current else {
            panic!("begin_turn called outside a turn");
        };
        self.entity_mut(actor).defending = false;
        self.turn.skip_requested = false;

        for effect in self.hooks(actor, HookPhase::StartTurn) {
            effect.start_turn(self, actor);
        }

        let skipped = self.turn.skip_requested || !self.is_alive(actor);
        if skipped {
            let usage = self.config.timing.basic_action_usage;
            self.spend_action_time(actor, usage);
            if self.is_alive(actor) {
                let text = format!("{} cannot act.", self.name(actor));
                self.message(MessageTag::Status, text);
            }
        }
        TurnStart { actor, skipped }
    }

    /// Ask for the current turn to be skipped. Only meaningful from a
    /// START_TURN hook of the current actor.
    pub fn skip_turn(&mut self, id: EntityId) {
        if self.turn.current == Some(id) {
            self.turn.skip_requested = true;
        }
    }

    /// End the current turn: END_TURN hooks, one duration tick for the
    /// actor's effects (expired ones are removed) and aggro decay.
    ///
    /// # Panics
    ///
    /// Panics if no turn is in progress.
    pub fn end_turn(&mut self) {
        let Some(actor) = self.turn.current else {
            panic!("end_turn called outside a turn");
        };

        for effect in self.hooks(actor, HookPhase::EndTurn) {
            effect.end_turn(self, actor);
        }

        let expired = self.entity_mut(actor).effects.tick_end_of_turn();
        for key in expired {
            self.expire_effect(actor, key);
        }

        let (decay, floor) = (self.config.aggro.decay, self.config.aggro.floor);
        self.entity_mut(actor).aggro.decay(decay, floor);

        self.turn.previous = Some(actor);
        self.turn.current = None;
        self.turn.turns_taken += 1;
    }
}
