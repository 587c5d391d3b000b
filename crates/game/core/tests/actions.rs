mod common;

use std::sync::Arc;

use combat_core::effect::kinds::StatModifier;
use combat_core::engine::SkillOutcome;
use combat_core::skill::{EffectGrant, SkillAttack, SkillUse, TargetSide, Targeting};
use combat_core::{
    ActionError, ActionOutcome, ActiveSkill, AttackRequest, AttackType, CombatConfig,
    CombatEngine, Decision, EffectKey, EntityId, MessageTag, SkillId, Stat, StatBonus, StatMods,
    StatusCondition, StatusKind, Team,
};
use common::{Script, entity};

/// Toggle: +10 ATK while active.
struct Focus;

impl ActiveSkill for Focus {
    fn id(&self) -> SkillId {
        SkillId(1)
    }

    fn name(&self) -> &str {
        "Focus"
    }

    fn targeting(&self) -> Targeting {
        Targeting::user()
    }

    fn mana_cost(&self) -> u32 {
        5
    }

    fn is_toggle(&self) -> bool {
        true
    }

    fn activate(&self, usage: &SkillUse) -> Vec<EffectGrant> {
        let bonus = StatBonus::flat(StatMods::new().with(Stat::Atk, 10.0));
        vec![EffectGrant::new(
            usage.user,
            Arc::new(StatModifier::new(usage.key(0), bonus)),
        )]
    }
}

/// Magic attack on one enemy.
struct Bolt;

impl ActiveSkill for Bolt {
    fn id(&self) -> SkillId {
        SkillId(2)
    }

    fn name(&self) -> &str {
        "Bolt"
    }

    fn targeting(&self) -> Targeting {
        Targeting::single(TargetSide::Enemy)
    }

    fn mana_cost(&self) -> u32 {
        10
    }

    fn attack(&self) -> Option<SkillAttack> {
        Some(SkillAttack {
            is_physical: false,
            attack_type: Some(AttackType::Magic),
        })
    }

    fn activate(&self, _usage: &SkillUse) -> Vec<EffectGrant> {
        Vec::new()
    }
}

/// `hero` (fast, two skills, 8 MP) against `foe`, two apart, with every
/// draw at 0.5. The hero's turn is already in progress.
fn duel() -> (CombatEngine, EntityId, EntityId) {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let hero = builder.join(
        Team::Players,
        entity(
            "Hero",
            &[
                (Stat::Spd, 16.0),
                (Stat::MaxMp, 8.0),
                (Stat::Atk, 10.0),
                (Stat::Acc, 100.0),
            ],
        )
        .with_active(Arc::new(Focus))
        .with_active(Arc::new(Bolt)),
    );
    let foe = builder.join(Team::Opponents, entity("Foe", &[(Stat::Spd, 1.0)]));
    builder.default_distance(2);
    builder.rng(Script::boxed(&[]));
    let mut engine = builder.build();
    assert_eq!(engine.advance(), hero);
    engine.begin_turn();
    (engine, hero, foe)
}

#[test]
fn insufficient_mana_leaves_state_untouched() {
    let (mut engine, hero, foe) = duel();
    let error = engine.perform_active_skill(hero, 1, &[foe], 0).unwrap_err();
    assert_eq!(
        error,
        ActionError::InsufficientMana {
            required: 10,
            available: 8
        }
    );
    assert_eq!(engine.entity(hero).stats.mp(), 8);
    assert_eq!(engine.action_timer(hero), 100.0);
}

#[test]
fn skill_targets_are_validated() {
    let (mut engine, hero, _) = duel();
    assert_eq!(
        engine.perform_active_skill(hero, 1, &[hero], 0),
        Err(ActionError::InvalidTargets)
    );
    assert_eq!(
        engine.perform_active_skill(hero, 7, &[], 0),
        Err(ActionError::UnknownSkill { index: 7 })
    );
}

#[test]
fn toggle_switches_on_then_off() {
    let (mut engine, hero, foe) = duel();
    let outcome = engine.perform_active_skill(hero, 0, &[], 0).unwrap();
    assert!(!outcome.toggled_off);
    assert_eq!(outcome.granted, 1);
    assert_eq!(engine.total(hero, Stat::Atk), 20.0);
    assert_eq!(engine.entity(hero).stats.mp(), 3);
    engine.end_turn();

    // the foe is far slower, so the hero acts again next
    let mut next = engine.advance();
    while next != hero {
        engine.begin_turn();
        engine.perform_defend(foe).unwrap();
        engine.end_turn();
        next = engine.advance();
    }
    engine.begin_turn();
    let outcome = engine.perform_active_skill(hero, 0, &[], 0).unwrap();
    assert_eq!(
        outcome,
        SkillOutcome {
            skill: SkillId(1),
            toggled_off: true,
            granted: 0,
            attack: None,
        }
    );
    assert_eq!(engine.total(hero, Stat::Atk), 10.0);
}

#[test]
fn reposition_changes_distance_and_costs_time() {
    let (mut engine, hero, foe) = duel();
    let outcome = engine.perform_reposition(hero, &[foe], -1).unwrap();
    assert_eq!(engine.distance(hero, foe), 1);
    assert_eq!(outcome.cost, 30.0);
    assert_eq!(engine.action_timer(hero), 70.0);
}

#[test]
fn reposition_errors() {
    let (mut engine, hero, foe) = duel();
    assert_eq!(
        engine.perform_reposition(hero, &[foe], 3),
        Err(ActionError::RepositionOutOfBounds { amount: 3 })
    );
    assert_eq!(
        engine.perform_reposition(hero, &[foe], -3),
        Err(ActionError::RepositionOutOfBounds { amount: -3 })
    );
    assert_eq!(
        engine.perform_reposition(hero, &[hero], 1),
        Err(ActionError::InvalidTargets)
    );

    engine.spend_action_time(hero, 80.0);
    assert_eq!(
        engine.perform_reposition(hero, &[foe], 1),
        Err(ActionError::InsufficientActionTime {
            required: 30.0,
            available: 20.0
        })
    );

    // default draw 0.5 is not below the 0.5 resist chance, so Root lands
    engine.apply_status(hero, StatusCondition::new(StatusKind::Root, foe, 1.0, 2));
    assert_eq!(
        engine.perform_reposition(hero, &[foe], 1),
        Err(ActionError::MovementRestricted)
    );
    assert_eq!(engine.distance(hero, foe), 2);
}

#[test]
fn only_the_current_actor_may_act() {
    let (mut engine, hero, foe) = duel();
    assert_eq!(
        engine.perform_attack(foe, hero),
        Err(ActionError::NotCurrentActor { actor: foe })
    );
}

#[test]
fn rejected_decisions_fall_back_to_defend() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let hero = builder.join(Team::Players, entity("Hero", &[(Stat::Spd, 16.0)]));
    builder.join(Team::Opponents, entity("Foe", &[(Stat::Spd, 1.0)]));
    let mut engine = builder.build();

    let mut provider = |_: &CombatEngine, actor: EntityId| Decision::Attack { target: actor };
    let summary = engine.play_turn(&mut provider);
    assert_eq!(summary.actor, hero);
    assert_eq!(
        summary.rejected.len(),
        CombatConfig::MAX_DECISION_ATTEMPTS
    );
    assert_eq!(summary.outcome, Some(ActionOutcome::Defend));
    assert!(engine.entity(hero).defending);
}

#[test]
fn stunned_actor_loses_its_turn() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let hero = builder.join(Team::Players, entity("Hero", &[(Stat::Spd, 16.0)]));
    let foe = builder.join(Team::Opponents, entity("Foe", &[(Stat::Spd, 1.0)]));
    builder.rng(Script::boxed(&[]));
    let mut engine = builder.build();
    engine.apply_status(hero, StatusCondition::new(StatusKind::Stun, foe, 1.0, 1));

    let mut asked = 0;
    let mut provider = |_: &CombatEngine, _: EntityId| {
        asked += 1;
        Decision::Defend
    };
    let summary = engine.play_turn(&mut provider);
    assert_eq!(summary.actor, hero);
    assert!(summary.skipped);
    assert_eq!(summary.outcome, None);
    assert_eq!(asked, 0);
    assert_eq!(engine.action_timer(hero), 0.0);
    // the one-turn stun ticked away at the end of the skipped turn
    assert!(!engine.has_status(hero, StatusKind::Stun));
}

#[test]
fn run_ends_when_a_team_is_wiped_out() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    builder.join(
        Team::Players,
        entity(
            "Champion",
            &[(Stat::Atk, 60.0), (Stat::Acc, 100.0), (Stat::Spd, 9.0)],
        ),
    );
    builder.join(Team::Opponents, entity("Rat", &[(Stat::MaxHp, 20.0)]));
    builder.join(Team::Opponents, entity("Rat", &[(Stat::MaxHp, 20.0)]));
    builder.seed(11);
    let mut engine = builder.build();

    let mut provider = |engine: &CombatEngine, actor: EntityId| match engine
        .opponents_of(actor)
        .first()
    {
        Some(&target) => Decision::Attack { target },
        None => Decision::Defend,
    };
    assert_eq!(engine.run(&mut provider, 200), Some(Team::Players));
    assert_eq!(
        engine.perform_defend(EntityId(0)),
        Err(ActionError::EncounterOver)
    );
}

#[test]
fn defend_stance_absorbs_only_the_first_hit() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let striker = builder.join(
        Team::Players,
        entity(
            "Striker",
            &[(Stat::Atk, 50.0), (Stat::Acc, 100.0), (Stat::Spd, 1.0)],
        ),
    );
    let guard = builder.join(
        Team::Opponents,
        entity(
            "Guard",
            &[
                (Stat::Def, 10.0),
                (Stat::Avo, 50.0),
                (Stat::Spd, 16.0),
                (Stat::MaxHp, 200.0),
                (Stat::MaxMp, 20.0),
            ],
        ),
    );
    builder.distance(striker, guard, 0);
    // two attacks of: hit, variance (exactly 1.0), no crit
    builder.rng(Script::boxed(&[0.99, 0.5, 0.0, 0.99, 0.5, 0.0]));
    let mut engine = builder.build();

    assert_eq!(engine.advance(), guard);
    engine.begin_turn();
    // raise the cap so the refund has room: 20 of 30 MP
    let reserve = StatBonus::flat(StatMods::new().with(Stat::MaxMp, 10.0));
    engine.add_effect(guard, Arc::new(StatModifier::new(EffectKey::Transient(700), reserve)));
    engine.perform_defend(guard).expect("guard is the current actor");
    assert!(engine.entity(guard).defending);
    assert_eq!(engine.entity(guard).stats.mp(), 20);
    engine.end_turn();

    let first = engine.resolve_attack(AttackRequest::basic(striker, guard));
    assert_eq!(first.primary().map(|r| r.damage), Some(25));
    assert!(!engine.entity(guard).defending);
    assert_eq!(engine.entity(guard).stats.mp(), 25);

    let second = engine.resolve_attack(AttackRequest::basic(striker, guard));
    assert_eq!(second.primary().map(|r| r.damage), Some(50));
    assert_eq!(engine.entity(guard).stats.mp(), 25);
    assert_eq!(engine.entity(guard).stats.hp(), 125);
}

#[test]
fn missed_attacks_leave_the_stance_up() {
    let mut builder = CombatEngine::builder(CombatConfig::default());
    let striker = builder.join(Team::Players, entity("Striker", &[(Stat::Spd, 1.0)]));
    let guard = builder.join(Team::Opponents, entity("Guard", &[(Stat::Spd, 16.0)]));
    builder.distance(striker, guard, 3);
    let mut engine = builder.build();

    assert_eq!(engine.advance(), guard);
    engine.begin_turn();
    engine.perform_defend(guard).expect("guard is the current actor");
    engine.end_turn();

    let chain = engine.resolve_attack(AttackRequest::basic(striker, guard));
    assert!(chain.primary().is_some_and(|r| !r.in_range));
    assert!(engine.entity(guard).defending);
}

/// Play whole turns with no action until `who` has finished one.
fn finish_turn_of(engine: &mut CombatEngine, who: EntityId) {
    loop {
        let actor = engine.advance();
        engine.begin_turn();
        engine.end_turn();
        if actor == who {
            return;
        }
    }
}

#[test]
fn timed_modifier_expires_after_its_owners_turns() {
    let (mut engine, hero, _) = duel();
    let key = EffectKey::Transient(700);
    let rally = StatModifier::new(key, StatBonus::flat(StatMods::new().with(Stat::Atk, 5.0)))
        .with_label("Rally")
        .with_duration(2);
    engine.add_effect(hero, Arc::new(rally));
    assert_eq!(engine.total(hero, Stat::Atk), 15.0);

    let worn_off = |engine: &CombatEngine| {
        engine
            .log()
            .with_tag(MessageTag::Effect)
            .filter(|m| m.text == "Hero: Rally wears off.")
            .count()
    };

    engine.end_turn();
    assert!(engine.has_effect(hero, key));
    assert_eq!(worn_off(&engine), 0);

    finish_turn_of(&mut engine, hero);
    assert!(!engine.has_effect(hero, key));
    assert_eq!(engine.total(hero, Stat::Atk), 10.0);
    assert_eq!(worn_off(&engine), 1);

    finish_turn_of(&mut engine, hero);
    assert_eq!(worn_off(&engine), 1);
}
