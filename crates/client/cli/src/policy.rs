//! Automatic decision providers for headless runs.
//!
//! Policies own their RNG so they never disturb the engine's roll sequence:
//! the same encounter seed and policy seed replay the same fight.

use combat_core::skill::TargetSide;
use combat_core::{
    CombatEngine, Decision, DecisionProvider, EntityId, PcgRng, RngOracle, Stat, StatusKind, Team,
};

/// Chance per turn that a policy tries a skill before attacking.
const SKILL_CHANCE: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyKind {
    /// Random targets, random affordable skills.
    Random,
    /// Focus whoever built the most aggro, else the weakest opponent.
    Aggro,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn DecisionProvider> {
        match self {
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Aggro => Box::new(AggroPolicy::new(seed)),
        }
    }
}

pub struct RandomPolicy {
    rng: PcgRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: PcgRng::new(seed),
        }
    }
}

impl DecisionProvider for RandomPolicy {
    fn decide(&mut self, engine: &CombatEngine, actor: EntityId) -> Decision {
        let opponents = engine.opponents_of(actor);
        if opponents.is_empty() {
            return Decision::Defend;
        }
        if self.rng.next_f64() < SKILL_CHANCE {
            if let Some(decision) = skill_decision(engine, actor, &mut self.rng) {
                return decision;
            }
        }
        let target = opponents[self.rng.choose_index(opponents.len())];
        approach_or_attack(engine, actor, target)
    }
}

pub struct AggroPolicy {
    rng: PcgRng,
}

impl AggroPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: PcgRng::new(seed),
        }
    }
}

impl DecisionProvider for AggroPolicy {
    fn decide(&mut self, engine: &CombatEngine, actor: EntityId) -> Decision {
        let opponents = engine.opponents_of(actor);
        if opponents.is_empty() {
            return Decision::Defend;
        }
        if self.rng.next_f64() < SKILL_CHANCE {
            if let Some(decision) = skill_decision(engine, actor, &mut self.rng) {
                return decision;
            }
        }
        let aggro = &engine.entity(actor).aggro;
        let target = aggro
            .target(opponents.iter().copied(), &mut self.rng)
            .or_else(|| {
                opponents
                    .iter()
                    .copied()
                    .min_by_key(|&id| engine.entity(id).stats.hp())
            })
            .unwrap_or(opponents[0]);
        approach_or_attack(engine, actor, target)
    }
}

/// Routes each actor to its team's policy.
pub struct TeamPolicies {
    pub players: Box<dyn DecisionProvider>,
    pub opponents: Box<dyn DecisionProvider>,
}

impl DecisionProvider for TeamPolicies {
    fn decide(&mut self, engine: &CombatEngine, actor: EntityId) -> Decision {
        match engine.team_of(actor) {
            Team::Players => self.players.decide(engine, actor),
            Team::Opponents => self.opponents.decide(engine, actor),
        }
    }
}

/// Attack `target`, or close in first when it is out of reach.
fn approach_or_attack(engine: &CombatEngine, actor: EntityId, target: EntityId) -> Decision {
    let distance = f64::from(engine.distance(actor, target));
    let range = engine.total(actor, Stat::Range);
    if distance > range && !engine.has_status(actor, StatusKind::Root) {
        let gap = (distance - range).ceil() as i8;
        return Decision::Reposition {
            targets: vec![target],
            amount: -gap.min(combat_core::CombatConfig::MAX_REPOSITION_STEP),
        };
    }
    Decision::Attack { target }
}

/// A random affordable skill with a random valid target set.
fn skill_decision(
    engine: &CombatEngine,
    actor: EntityId,
    rng: &mut dyn RngOracle,
) -> Option<Decision> {
    let state = engine.entity(actor);
    let mana = state.stats.mp();
    let usable: Vec<usize> = state
        .template
        .actives
        .iter()
        .enumerate()
        .filter(|(_, skill)| skill.mana_cost() <= mana)
        .map(|(index, _)| index)
        .collect();
    if usable.is_empty() {
        return None;
    }
    let index = usable[rng.choose_index(usable.len())];
    let targeting = state.template.actives[index].targeting();

    let mut pool = match targeting.side {
        TargetSide::User => Vec::new(),
        TargetSide::Ally => engine.living(engine.team_of(actor)),
        TargetSide::Enemy => engine.opponents_of(actor),
    };
    let targets = if targeting.side == TargetSide::User {
        Vec::new()
    } else {
        if pool.len() < targeting.min.max(1) {
            return None;
        }
        let most = targeting.max.min(pool.len());
        let count = targeting.min.max(1) + rng.choose_index(most - targeting.min.max(1) + 1);
        (0..count)
            .map(|_| pool.swap_remove(rng.choose_index(pool.len())))
            .collect()
    };
    Some(Decision::Skill {
        index,
        targets,
        parameter: 0,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use combat_core::{BaseStats, CombatConfig, CombatEntity};

    fn encounter(distance: u8) -> (CombatEngine, EntityId, EntityId) {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        let stats = BaseStats::defaults()
            .with(Stat::Atk, 10.0)
            .with(Stat::Spd, 10.0);
        let a = builder.join(Team::Players, Arc::new(CombatEntity::new("Hero", stats)));
        let b = builder.join(Team::Opponents, Arc::new(CombatEntity::new("Foe", stats)));
        builder.seed(3).default_distance(distance);
        (builder.build(), a, b)
    }

    #[test]
    fn attacks_in_range() {
        let (engine, a, b) = encounter(1);
        let mut policy = RandomPolicy::new(1);
        for _ in 0..10 {
            assert_eq!(policy.decide(&engine, a), Decision::Attack { target: b });
        }
    }

    #[test]
    fn closes_distance_when_out_of_range() {
        let (engine, a, b) = encounter(4);
        let decision = AggroPolicy::new(1).decide(&engine, a);
        assert_eq!(
            decision,
            Decision::Reposition {
                targets: vec![b],
                amount: -2,
            }
        );
    }

    #[test]
    fn team_policies_route_by_team() {
        let (engine, a, b) = encounter(1);
        let mut policies = TeamPolicies {
            players: Box::new(|_: &CombatEngine, _: EntityId| Decision::Defend),
            opponents: PolicyKind::Aggro.build(9),
        };
        assert_eq!(policies.decide(&engine, a), Decision::Defend);
        assert_eq!(policies.decide(&engine, b), Decision::Attack { target: a });
    }
}
