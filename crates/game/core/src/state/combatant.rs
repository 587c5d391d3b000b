//! Mutable per-entity state for the duration of one encounter.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::effect::{BonusAttackOptions, EffectKey, EffectRegistry};
use crate::skill::SkillId;
use crate::stats::StatTable;
use crate::status::StatusTable;

use super::{AggroMap, AttackType, Attribute, CombatEntity, EntityId, Team};

/// A one-shot reaction armed against the next attack of a given type.
///
/// Consumed by the first attack the owner receives, whether or not the
/// attack type matches.
#[derive(Clone, Debug)]
pub struct ParryRegistration {
    pub name: String,
    pub attack_type: AttackType,
    /// Multiplier applied to the parried attack's damage.
    pub damage_multiplier: f64,
    /// Parrying also guarantees the attack misses.
    pub dodge: bool,
    /// Riposte queued against the attacker on a successful parry.
    pub counter: Option<BonusAttackOptions>,
}

impl ParryRegistration {
    pub fn new(name: impl Into<String>, attack_type: AttackType) -> Self {
        Self {
            name: name.into(),
            attack_type,
            damage_multiplier: 1.0,
            dodge: false,
            counter: None,
        }
    }

    pub fn with_damage_multiplier(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_dodge(mut self) -> Self {
        self.dodge = true;
        self
    }

    pub fn with_counter(mut self, options: BonusAttackOptions) -> Self {
        self.counter = Some(options);
        self
    }
}

/// Everything the engine tracks about one entity during an encounter.
#[derive(Clone, Debug)]
pub struct EntityCombatState {
    pub id: EntityId,
    pub team: Team,
    pub template: Arc<CombatEntity>,
    pub stats: StatTable,
    /// Progress towards the next turn, in `[0, max_action_timer]`.
    pub action_timer: f64,
    pub effects: EffectRegistry,
    /// Toggle skills currently switched on.
    pub toggles: BTreeSet<SkillId>,
    /// Named stack counters maintained by effects.
    pub counters: BTreeMap<String, i64>,
    /// Enchantment keys, bottom to top. Only the top one is live.
    pub enchantments: ArrayVec<EffectKey, { CombatConfig::MAX_ENCHANTMENTS }>,
    pub weaknesses: Vec<Attribute>,
    pub resistances: Vec<Attribute>,
    pub statuses: StatusTable,
    pub aggro: AggroMap,
    pub defending: bool,
    pub parry: Option<ParryRegistration>,
}

impl EntityCombatState {
    pub fn new(id: EntityId, team: Team, template: Arc<CombatEntity>) -> Self {
        let stats = StatTable::new(template.base.clone());
        let weaknesses = template.weaknesses.clone();
        let resistances = template.resistances.clone();
        Self {
            id,
            team,
            template,
            stats,
            action_timer: 0.0,
            effects: EffectRegistry::new(),
            toggles: BTreeSet::new(),
            counters: BTreeMap::new(),
            enchantments: ArrayVec::new(),
            weaknesses,
            resistances,
            statuses: StatusTable::new(),
            aggro: AggroMap::new(),
            defending: false,
            parry: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn attack_type(&self) -> AttackType {
        self.template.attack_type
    }

    /// Attack attribute: the top enchantment's if any, else the template's.
    pub fn attribute(&self) -> Attribute {
        self.enchantments
            .last()
            .and_then(|&key| self.effects.get(key))
            .and_then(|active| active.effect.as_enchantment().map(|e| e.attribute))
            .unwrap_or(self.template.attribute)
    }

    pub fn weakness_stacks(&self, attribute: Attribute) -> usize {
        self.weaknesses.iter().filter(|&&a| a == attribute).count()
    }

    pub fn resistance_stacks(&self, attribute: Attribute) -> usize {
        self.resistances.iter().filter(|&&a| a == attribute).count()
    }

    pub fn stacks(&self, counter: &str) -> i64 {
        self.counters.get(counter).copied().unwrap_or(0)
    }

    pub fn add_stacks(&mut self, counter: &str, amount: i64) -> i64 {
        let entry = self.counters.entry(counter.to_owned()).or_insert(0);
        *entry += amount;
        *entry
    }

    pub fn reset_stacks(&mut self, counter: &str) {
        self.counters.remove(counter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;

    fn sample() -> EntityCombatState {
        let template = CombatEntity::new("Knight", BaseStats::defaults())
            .with_attribute(Attribute::Light)
            .with_weakness(Attribute::Dark)
            .with_weakness(Attribute::Dark)
            .with_resistance(Attribute::Fire);
        EntityCombatState::new(EntityId(0), Team::Players, Arc::new(template))
    }

    #[test]
    fn starts_idle_at_full_health() {
        let state = sample();
        assert_eq!(state.action_timer, 0.0);
        assert!(state.is_alive());
        assert_eq!(state.stats.hp(), state.stats.max_hp());
        assert_eq!(state.attribute(), Attribute::Light);
    }

    #[test]
    fn weaknesses_stack_by_repetition() {
        let state = sample();
        assert_eq!(state.weakness_stacks(Attribute::Dark), 2);
        assert_eq!(state.resistance_stacks(Attribute::Fire), 1);
        assert_eq!(state.weakness_stacks(Attribute::Ice), 0);
    }

    #[test]
    fn stack_counters() {
        let mut state = sample();
        assert_eq!(state.add_stacks("combo", 1), 1);
        assert_eq!(state.add_stacks("combo", 2), 3);
        state.reset_stacks("combo");
        assert_eq!(state.stacks("combo"), 0);
    }
}
