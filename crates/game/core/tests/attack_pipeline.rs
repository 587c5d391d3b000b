mod common;

use std::sync::Arc;

use combat_core::effect::kinds::{CounterAttack, FollowUpAttack};
use combat_core::{
    AttackRequest, CombatConfig, CombatEngine, EffectKey, MessageTag, Stat, Team,
};
use common::{Script, entity};

#[test]
fn point_blank_hit_deals_expected_damage() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let a = builder.join(
        Team::Players,
        entity(
            "Archer",
            &[(Stat::Acc, 100.0), (Stat::Atk, 50.0), (Stat::Spd, 9.0)],
        ),
    );
    let b = builder.join(
        Team::Opponents,
        entity(
            "Golem",
            &[(Stat::Avo, 50.0), (Stat::Def, 10.0), (Stat::MaxHp, 100.0)],
        ),
    );
    builder.distance(a, b, 0);
    // hit, variance (exactly 1.0), crit (fails at 0% crit rate)
    builder.rng(Script::boxed(&[0.99, 0.5, 0.0]));
    let mut engine = builder.build();

    assert_eq!(engine.advance(), a);
    engine.begin_turn();
    let chain = engine.perform_attack(a, b).expect("a is the current actor");

    let result = chain.primary().expect("one attack resolved");
    assert!(result.in_range);
    assert!(result.hit);
    assert!(!result.crit);
    // the formula exceeds 1 at point blank when ACC ≥ AVO
    assert!(result.hit_chance > 1.0);
    // ratio 5 → damage factor 1 − 0.5^25, rounded up to the full 50
    assert_eq!(result.damage, 50);
    assert_eq!(engine.entity(b).stats.hp(), 50);
    assert_eq!(engine.action_timer(a), 0.0);

    let damage: Vec<_> = engine
        .log()
        .with_tag(MessageTag::Damage)
        .map(|m| m.text.clone())
        .collect();
    assert_eq!(damage, vec!["Archer hits Golem for 50 damage.".to_owned()]);
}

#[test]
fn out_of_range_attack_misses_without_rolling() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let a = builder.join(Team::Players, entity("Brawler", &[(Stat::Acc, 100.0)]));
    let b = builder.join(Team::Opponents, entity("Sniper", &[]));
    builder.distance(a, b, 3);
    let mut engine = builder.build();

    let chain = engine.resolve_attack(AttackRequest::basic(a, b));
    let result = chain.primary().expect("one attack resolved");
    assert!(!result.in_range);
    assert!(!result.hit);
    assert_eq!(result.damage, 0);
    assert_eq!(engine.log().with_tag(MessageTag::Positioning).count(), 1);
}

#[test]
fn bonus_queue_is_bounded_per_action() {
    let mut config = CombatConfig::default();
    config.max_bonus_attacks = 5;
    let mut builder = CombatEngine::builder(config);
    let tank = [(Stat::MaxHp, 100_000.0), (Stat::Acc, 50.0), (Stat::Atk, 5.0)];
    let a = builder.join(Team::Players, entity("Flurry", &tank));
    let b = builder.join(Team::Opponents, entity("Wall", &tank));
    let mut engine = builder.build();

    engine.add_effect(
        a,
        Arc::new(FollowUpAttack::new(EffectKey::Transient(900), 1.0).chained()),
    );
    engine.add_effect(b, Arc::new(CounterAttack::new(EffectKey::Transient(901), 1.0)));

    let chain = engine.resolve_attack(AttackRequest::basic(a, b));
    assert_eq!(chain.bonus_count(), 5);
    assert_eq!(chain.len(), 6);
    assert!(chain.dropped_bonus_attacks > 0);

    // the bound is per action: the next action starts fresh
    let again = engine.resolve_attack(AttackRequest::basic(a, b));
    assert_eq!(again.bonus_count(), 5);
}

#[test]
fn bonus_attacks_resolve_in_fifo_order() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let stats = [(Stat::MaxHp, 1_000.0), (Stat::Acc, 50.0), (Stat::Atk, 5.0)];
    let a = builder.join(Team::Players, entity("Lead", &stats));
    let b = builder.join(Team::Opponents, entity("Target", &stats));
    let mut engine = builder.build();

    // a follows up once (no chain); b counters a's primary attack.
    engine.add_effect(a, Arc::new(FollowUpAttack::new(EffectKey::Transient(1), 1.0)));
    engine.add_effect(b, Arc::new(CounterAttack::new(EffectKey::Transient(2), 1.0)));

    let chain = engine.resolve_attack(AttackRequest::basic(a, b));
    let order: Vec<_> = chain.results.iter().map(|r| r.attacker).collect();
    // AFTER_ATTACK (attacker) queues before AFTER_ATTACKED (defender)
    assert_eq!(order, vec![a, a, b]);
}
