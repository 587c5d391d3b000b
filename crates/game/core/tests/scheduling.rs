mod common;

use combat_core::{AttackRequest, CombatConfig, CombatEngine, Stat, Team};
use common::{Script, entity};

/// Play `turns` turns in which every actor spends a full action.
fn count_turns(engine: &mut CombatEngine, turns: usize) -> Vec<usize> {
    let mut counts = vec![0; engine.ids().count()];
    let max = engine.config().timing.max_action_timer;
    for _ in 0..turns {
        let actor = engine.advance();
        engine.begin_turn();
        engine.spend_action_time(actor, max);
        engine.end_turn();
        counts[actor.0 as usize] += 1;
    }
    counts
}

#[test]
fn turn_share_follows_root_speed() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    builder.join(Team::Players, entity("slow", &[(Stat::Spd, 4.0)]));
    builder.join(Team::Opponents, entity("fast", &[(Stat::Spd, 16.0)]));
    builder.seed(7);
    let mut engine = builder.build();

    let counts = count_turns(&mut engine, 300);
    // √16 : √4 = 2 : 1
    let ratio = counts[1] as f64 / counts[0] as f64;
    assert!((ratio - 2.0).abs() < 0.05, "ratio {ratio}");
}

#[test]
fn clock_is_monotonic() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    builder.join(Team::Players, entity("a", &[(Stat::Spd, 3.0)]));
    builder.join(Team::Players, entity("b", &[(Stat::Spd, 5.0)]));
    builder.join(Team::Opponents, entity("c", &[(Stat::Spd, 12.0)]));
    let mut engine = builder.build();

    let mut last = engine.clock();
    for _ in 0..100 {
        count_turns(&mut engine, 1);
        assert!(engine.clock() >= last);
        last = engine.clock();
    }
}

#[test]
fn ties_are_broken_by_the_rng() {
    for (draw, expected) in [(0.0, 0u32), (0.99, 1u32)] {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        builder.join(Team::Players, entity("left", &[(Stat::Spd, 4.0)]));
        builder.join(Team::Opponents, entity("right", &[(Stat::Spd, 4.0)]));
        builder.rng(Script::boxed(&[draw]));
        let mut engine = builder.build();
        assert_eq!(engine.advance().0, expected);
    }
}

#[test]
fn aggro_accumulates_and_decays_on_the_owners_turn() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let stats = [(Stat::Acc, 100.0), (Stat::Atk, 10.0), (Stat::Spd, 1.0)];
    let a = builder.join(Team::Players, entity("Pest", &stats));
    let b = builder.join(
        Team::Opponents,
        entity("Boss", &[(Stat::Spd, 25.0), (Stat::MaxHp, 500.0)]),
    );
    builder.rng(Script::boxed(&[0.99, 0.5, 0.0]));
    let mut engine = builder.build();

    let chain = engine.resolve_attack(AttackRequest::basic(a, b));
    let dealt = chain.results[0].damage;
    assert!(dealt > 0);
    let per_damage = engine.config().aggro.per_damage;
    let weight = engine.entity(b).aggro.weight(a);
    assert!((weight - f64::from(dealt) * per_damage).abs() < 1e-9);

    // the boss acts first and its aggro decays at the end of its turn
    assert_eq!(engine.advance(), b);
    engine.begin_turn();
    engine.end_turn();
    let decay = engine.config().aggro.decay;
    let decayed = engine.entity(b).aggro.weight(a);
    assert!((decayed - weight * decay).abs() < 1e-9 || decayed == 0.0);
}
