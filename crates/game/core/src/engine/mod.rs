//! Encounter engine: owns every entity and runs the hook-driven pipelines.
//!
//! [`CombatEngine`] is the composition root. It owns the entity table, the
//! pairwise position map, the RNG and the message log, and exposes the
//! encounter operations split across submodules:
//!
//! - `turns`: scheduler, turn begin and end-of-turn cleanup
//! - `attack`: attack resolution and the bonus-attack queue
//! - `status`: status application, amplification and teardown
//! - `vitals`: damage, healing, mana and action-time bookkeeping
//! - `actions`: validated decisions (attack, skill, reposition, defend)
//!
//! Hooks receive `&mut CombatEngine`. Hook lists are snapshotted before
//! dispatch, so a hook may register or remove effects freely.
mod actions;
mod attack;
mod errors;
mod log;
mod status;
mod turns;
mod vitals;

pub use actions::{ActionOutcome, RepositionOutcome, SkillOutcome, TurnSummary};
pub use attack::AttackRequest;
pub use errors::ActionError;
pub use log::{CombatLog, CombatMessage, MessageTag};
pub use turns::TurnStart;

use std::sync::Arc;

use crate::config::CombatConfig;
use crate::effect::{Effect, EffectKey, HookPhase};
use crate::env::{PcgRng, RngOracle};
use crate::state::{
    CombatEntity, EntityCombatState, EntityId, ParryRegistration, PositionMap, Team,
};
use crate::stats::{Stat, StatBonus, StatMods};
use crate::status::StatusKind;

#[derive(Clone, Debug, Default)]
struct TurnState {
    clock: f64,
    current: Option<EntityId>,
    previous: Option<EntityId>,
    skip_requested: bool,
    turns_taken: u64,
}

/// Read-only summary of one entity for presentation layers.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub team: Team,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub action_timer: f64,
    pub statuses: Vec<StatusKind>,
    pub enchantment: Option<String>,
    pub defending: bool,
}

pub struct CombatEngine {
    config: CombatConfig,
    entities: Vec<EntityCombatState>,
    positions: PositionMap,
    rng: Box<dyn RngOracle>,
    log: CombatLog,
    turn: TurnState,
    next_transient: u64,
    in_stat_change: bool,
}

impl CombatEngine {
    pub fn builder(config: CombatConfig) -> EncounterBuilder {
        EncounterBuilder::new(config)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// # Panics
    ///
    /// Panics on an id that is not part of this encounter.
    pub fn entity(&self, id: EntityId) -> &EntityCombatState {
        match self.entities.get(id.index()) {
            Some(state) => state,
            None => panic!("unknown entity {id}"),
        }
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut EntityCombatState {
        match self.entities.get_mut(id.index()) {
            Some(state) => state,
            None => panic!("unknown entity {id}"),
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityCombatState> {
        self.entities.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(|e| e.id)
    }

    pub fn living_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.id)
            .collect()
    }

    pub fn living(&self, team: Team) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.team == team && e.is_alive())
            .map(|e| e.id)
            .collect()
    }

    /// Living members of `id`'s team other than `id`.
    pub fn allies_of(&self, id: EntityId) -> Vec<EntityId> {
        let team = self.team_of(id);
        self.living(team).into_iter().filter(|&a| a != id).collect()
    }

    pub fn opponents_of(&self, id: EntityId) -> Vec<EntityId> {
        self.living(self.team_of(id).opposite())
    }

    pub fn team_of(&self, id: EntityId) -> Team {
        self.entity(id).team
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entity(id).is_alive()
    }

    pub fn total(&self, id: EntityId, stat: Stat) -> f64 {
        self.entity(id).stats.total(stat)
    }

    pub fn distance(&self, a: EntityId, b: EntityId) -> u8 {
        self.positions.distance(a, b)
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    /// Luck difference used to skew rolls in `a`'s favour against `b`.
    pub fn luck_delta(&self, a: EntityId, b: EntityId) -> i32 {
        (self.total(a, Stat::Luck) - self.total(b, Stat::Luck)).round() as i32
    }

    pub fn rng(&mut self) -> &mut dyn RngOracle {
        self.rng.as_mut()
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn drain_messages(&mut self) -> Vec<crate::engine::CombatMessage> {
        self.log.drain()
    }

    pub fn message(&mut self, tag: MessageTag, text: impl Into<String>) {
        self.log.push(self.turn.clock, tag, text.into());
    }

    pub fn name(&self, id: EntityId) -> &str {
        self.entity(id).name()
    }

    pub fn view(&self, id: EntityId) -> EntityView {
        let state = self.entity(id);
        EntityView {
            id,
            name: state.name().to_owned(),
            team: state.team,
            hp: state.stats.hp(),
            max_hp: state.stats.max_hp(),
            mp: state.stats.mp(),
            max_mp: state.stats.max_mp(),
            action_timer: state.action_timer,
            statuses: state.statuses.iter().map(|s| s.kind).collect(),
            enchantment: state
                .enchantments
                .last()
                .and_then(|&key| state.effects.get(key))
                .and_then(|active| active.effect.as_enchantment().map(|e| e.name.clone())),
            defending: state.defending,
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn hooks(&self, owner: EntityId, phase: HookPhase) -> Vec<Arc<dyn Effect>> {
        let hooks = self.entity(owner).effects.hooks_for(phase);
        if !hooks.is_empty() {
            tracing::trace!(owner = owner.0, %phase, count = hooks.len(), "dispatching hooks");
        }
        hooks
    }

    /// Fresh key for a short-lived engine-managed effect.
    pub fn next_transient_key(&mut self) -> EffectKey {
        self.next_transient += 1;
        EffectKey::Transient(self.next_transient)
    }

    /// Register `effect` on `owner` and run its IMMEDIATE hook.
    ///
    /// Returns false (and does nothing) if the key is already registered.
    /// Enchantments are pushed onto the owner's stack: the previous top has
    /// its bonus reverted and its counter frozen until it is exposed again.
    pub fn add_effect(&mut self, owner: EntityId, effect: Arc<dyn Effect>) -> bool {
        let key = effect.key();
        if !self.entity_mut(owner).effects.insert(Arc::clone(&effect)) {
            tracing::trace!(owner = owner.0, %key, "effect already registered");
            return false;
        }

        if let Some(enchantment) = effect.as_enchantment() {
            if let Some(&bottom) = self.entity(owner).enchantments.first() {
                if self.entity(owner).enchantments.is_full() {
                    self.expire_effect(owner, bottom);
                }
            }
            if let Some(&previous) = self.entity(owner).enchantments.last() {
                self.suspend_enchantment(owner, previous);
            }
            self.entity_mut(owner).enchantments.push(key);
            self.apply_bonus(owner, &enchantment.bonus);
            let text = format!(
                "{}'s attacks are imbued with {} ({}).",
                self.name(owner),
                enchantment.name,
                enchantment.attribute
            );
            self.message(MessageTag::Effect, text);
        }

        if effect.phases().has(HookPhase::Immediate) {
            effect.immediate(self, owner);
        }
        true
    }

    /// Remove an effect and run its teardown. Returns false if absent.
    pub fn remove_effect(&mut self, owner: EntityId, key: EffectKey) -> bool {
        let Some(effect) = self.entity_mut(owner).effects.take(key) else {
            return false;
        };
        effect.on_remove(self, owner);

        if let Some(enchantment) = effect.as_enchantment() {
            let stack = &mut self.entity_mut(owner).enchantments;
            if let Some(index) = stack.iter().position(|&k| k == key) {
                let was_top = index + 1 == stack.len();
                stack.remove(index);
                if was_top {
                    self.revert_bonus(owner, &enchantment.bonus);
                    if let Some(&exposed) = self.entity(owner).enchantments.last() {
                        self.resume_enchantment(owner, exposed);
                    }
                }
            }
        }

        if let EffectKey::Status(kind) = key {
            self.teardown_status(owner, kind);
        }
        true
    }

    /// Natural expiry: log the effect's message, then remove it.
    fn expire_effect(&mut self, owner: EntityId, key: EffectKey) {
        let message = self
            .entity(owner)
            .effects
            .get(key)
            .and_then(|active| active.effect.expiration_message());
        if let Some(text) = message {
            let text = format!("{}: {text}", self.name(owner));
            self.message(MessageTag::Effect, text);
        }
        self.remove_effect(owner, key);
    }

    /// Remove every effect already at or past its duration without ticking.
    pub(crate) fn cleanup_expired(&mut self) {
        for id in self.ids().collect::<Vec<_>>() {
            for key in self.entity(id).effects.check_expired() {
                self.expire_effect(id, key);
            }
        }
    }

    pub fn has_effect(&self, owner: EntityId, key: EffectKey) -> bool {
        self.entity(owner).effects.contains(key)
    }

    fn enchantment_bonus(&self, owner: EntityId, key: EffectKey) -> Option<StatBonus> {
        self.entity(owner)
            .effects
            .get(key)
            .and_then(|active| active.effect.as_enchantment().map(|e| e.bonus.clone()))
    }

    fn suspend_enchantment(&mut self, owner: EntityId, key: EffectKey) {
        if let Some(bonus) = self.enchantment_bonus(owner, key) {
            self.revert_bonus(owner, &bonus);
        }
        self.entity_mut(owner).effects.set_frozen(key, true);
    }

    fn resume_enchantment(&mut self, owner: EntityId, key: EffectKey) {
        self.entity_mut(owner).effects.set_frozen(key, false);
        if let Some(bonus) = self.enchantment_bonus(owner, key) {
            self.apply_bonus(owner, &bonus);
        }
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub fn apply_bonus(&mut self, id: EntityId, bonus: &StatBonus) {
        self.entity_mut(id).stats.apply_bonus(bonus);
        self.stats_changed(id);
    }

    pub fn revert_bonus(&mut self, id: EntityId, bonus: &StatBonus) {
        self.entity_mut(id).stats.revert_bonus(bonus);
        self.stats_changed(id);
    }

    pub fn apply_flat(&mut self, id: EntityId, mods: &StatMods) {
        self.entity_mut(id).stats.apply_flat(mods);
        self.stats_changed(id);
    }

    pub fn revert_flat(&mut self, id: EntityId, mods: &StatMods) {
        self.entity_mut(id).stats.revert_flat(mods);
        self.stats_changed(id);
    }

    pub fn apply_mult(&mut self, id: EntityId, mods: &StatMods) {
        self.entity_mut(id).stats.apply_mult(mods);
        self.stats_changed(id);
    }

    pub fn revert_mult(&mut self, id: EntityId, mods: &StatMods) {
        self.entity_mut(id).stats.revert_mult(mods);
        self.stats_changed(id);
    }

    /// Fire ON_STAT_CHANGE. Stat changes made from inside an ON_STAT_CHANGE
    /// hook do not re-fire it.
    fn stats_changed(&mut self, id: EntityId) {
        if self.in_stat_change {
            return;
        }
        self.in_stat_change = true;
        for effect in self.hooks(id, HookPhase::OnStatChange) {
            effect.on_stat_change(self, id);
        }
        self.in_stat_change = false;
    }

    // ========================================================================
    // Counters and reactions
    // ========================================================================

    pub fn stacks(&self, id: EntityId, counter: &str) -> i64 {
        self.entity(id).stacks(counter)
    }

    pub fn add_stacks(&mut self, id: EntityId, counter: &str, amount: i64) -> i64 {
        self.entity_mut(id).add_stacks(counter, amount)
    }

    pub fn reset_stacks(&mut self, id: EntityId, counter: &str) {
        self.entity_mut(id).reset_stacks(counter);
    }

    /// Arm a parry, replacing any parry already registered.
    pub fn register_parry(&mut self, id: EntityId, parry: ParryRegistration) {
        let text = format!("{} readies {}.", self.name(id), parry.name);
        self.entity_mut(id).parry = Some(parry);
        self.message(MessageTag::Effect, text);
    }
}

/// Assembles an encounter: teams, distances and the RNG.
pub struct EncounterBuilder {
    config: CombatConfig,
    rng: Option<Box<dyn RngOracle>>,
    seed: u64,
    members: Vec<(Team, Arc<CombatEntity>)>,
    default_distance: u8,
    distances: Vec<(EntityId, EntityId, u8)>,
}

impl EncounterBuilder {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            rng: None,
            seed: 0,
            members: Vec::new(),
            default_distance: 1,
            distances: Vec::new(),
        }
    }

    /// Seed for the default [`PcgRng`]. Ignored if an RNG is injected.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    pub fn rng(&mut self, rng: Box<dyn RngOracle>) -> &mut Self {
        self.rng = Some(rng);
        self
    }

    /// Distance assigned to every opposing pair not set explicitly.
    pub fn default_distance(&mut self, distance: u8) -> &mut Self {
        self.default_distance = distance;
        self
    }

    /// Add an entity and return the id it will have in the encounter.
    ///
    /// # Panics
    ///
    /// Panics once `MAX_ENTITIES` have joined.
    pub fn join(&mut self, team: Team, entity: impl Into<Arc<CombatEntity>>) -> EntityId {
        assert!(
            self.members.len() < CombatConfig::MAX_ENTITIES,
            "encounter is full ({} entities)",
            CombatConfig::MAX_ENTITIES
        );
        let id = EntityId(self.members.len() as u32);
        self.members.push((team, entity.into()));
        id
    }

    pub fn distance(&mut self, a: EntityId, b: EntityId, distance: u8) -> &mut Self {
        self.distances.push((a, b, distance));
        self
    }

    /// Build the engine and register every passive skill's effects.
    pub fn build(&mut self) -> CombatEngine {
        let members = std::mem::take(&mut self.members);
        let entities: Vec<EntityCombatState> = members
            .into_iter()
            .enumerate()
            .map(|(index, (team, template))| {
                EntityCombatState::new(EntityId(index as u32), team, template)
            })
            .collect();

        let mut positions = PositionMap::new();
        for a in &entities {
            for b in &entities {
                if a.team == Team::Players && b.team == Team::Opponents {
                    positions.set(a.id, b.id, self.default_distance);
                }
            }
        }
        for &(a, b, distance) in &self.distances {
            assert_ne!(
                entities[a.index()].team,
                entities[b.index()].team,
                "distance is only defined between opponents"
            );
            positions.set(a, b, distance);
        }

        let rng = self
            .rng
            .take()
            .unwrap_or_else(|| Box::new(PcgRng::new(self.seed)));

        let mut engine = CombatEngine {
            config: self.config.clone(),
            entities,
            positions,
            rng,
            log: CombatLog::new(),
            turn: TurnState::default(),
            next_transient: 0,
            in_stat_change: false,
        };

        for id in engine.ids().collect::<Vec<_>>() {
            let passives = engine.entity(id).template.passives.clone();
            for passive in passives {
                for effect in passive.effects(id) {
                    engine.add_effect(id, effect);
                }
            }
        }
        tracing::debug!(entities = engine.entities.len(), "encounter built");
        engine
    }
}
