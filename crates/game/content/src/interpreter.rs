//! Turns skill specs into engine skills.
//!
//! [`DataActiveSkill`] and [`DataPassiveSkill`] wrap a spec and an assigned
//! [`SkillId`]; every activation maps the spec's effect list onto the
//! engine's building blocks in [`combat_core::effect::kinds`].

use std::sync::Arc;

use combat_core::effect::BonusAttackOptions;
use combat_core::effect::kinds::{
    Ambush, AttackBonus, Cleanse, CounterAttack, DotSiphon, FollowUpAttack, Forewarned, Guardian,
    HealingBoost, InflictOnHit, InflictStatus, ManaOnHit, Meditation, Momentum, ParryStance,
    Regeneration, RepeatAttack, Restore, StatModifier, StatusSurge, Thorns, TimeWarp,
};
use combat_core::skill::{EffectGrant, SkillAttack, SkillUse, Targeting};
use combat_core::state::ParryRegistration;
use combat_core::{
    ActiveSkill, Effect, EffectKey, EntityId, Enchantment, PassiveSkill, SkillId,
    StatusCondition,
};

use crate::specs::{ActiveSpec, EffectSpec, PassiveSpec, Recipient, bonus, mods};

/// What an effect spec needs to know about the use that grants it.
#[derive(Clone, Copy, Debug)]
pub struct Grant {
    pub key: EffectKey,
    /// Entity the effect is credited to (inflicter, healer).
    pub source: EntityId,
    pub duration: Option<u32>,
}

macro_rules! lasting {
    ($block:expr, $duration:expr) => {{
        let block = $block;
        match $duration {
            Some(turns) => Arc::new(block.with_duration(turns)) as Arc<dyn Effect>,
            None => Arc::new(block) as Arc<dyn Effect>,
        }
    }};
}

fn bonus_options(damage_multiplier: Option<f64>) -> BonusAttackOptions {
    BonusAttackOptions {
        damage_multiplier,
        ..BonusAttackOptions::default()
    }
}

impl EffectSpec {
    /// Build the engine effect described by this spec.
    ///
    /// One-shot blocks (`Inflict`, `Cleanse`, `Restore`, `TimeWarp`) carry
    /// their own duration and ignore `grant.duration`.
    pub fn build(&self, grant: Grant) -> Arc<dyn Effect> {
        let Grant {
            key,
            source,
            duration,
        } = grant;
        match self {
            Self::StatModifier { flat, mult, label } => {
                let mut block = StatModifier::new(key, bonus(flat, mult));
                if let Some(label) = label {
                    block = block.with_label(label.clone());
                }
                lasting!(block, duration)
            }
            Self::AttackBonus {
                flat,
                mult,
                damage_multiplier,
                opportunism,
                ignore_range,
                physical_only,
            } => {
                let mut block = AttackBonus::new(key)
                    .with_bonus(bonus(flat, mult))
                    .with_damage_multiplier(*damage_multiplier);
                if *opportunism {
                    block = block.with_opportunism();
                }
                if *ignore_range {
                    block = block.with_ignore_range();
                }
                if *physical_only {
                    block = block.physical_only();
                }
                lasting!(block, duration)
            }
            Self::Momentum {
                counter,
                per_stack,
                max_stacks,
            } => lasting!(
                Momentum::new(key, counter.clone(), mods(per_stack), *max_stacks),
                duration
            ),
            Self::Enchantment {
                name,
                attribute,
                flat,
                mult,
            } => {
                let block = Enchantment::new(key, name.clone(), *attribute)
                    .with_bonus(bonus(flat, mult));
                lasting!(block, duration)
            }
            Self::CounterAttack {
                chance,
                damage_multiplier,
            } => lasting!(
                CounterAttack::new(key, *chance).with_options(bonus_options(*damage_multiplier)),
                duration
            ),
            Self::FollowUp {
                chance,
                chain,
                on_hit,
                damage_multiplier,
            } => {
                let mut block = FollowUpAttack::new(key, *chance)
                    .with_options(bonus_options(*damage_multiplier));
                if *chain {
                    block = block.chained();
                }
                if *on_hit {
                    block = block.on_hit();
                }
                lasting!(block, duration)
            }
            Self::Repeat { chance } => lasting!(RepeatAttack::new(key, *chance), duration),
            Self::Parry {
                name,
                attack_type,
                damage_multiplier,
                dodge,
                riposte,
            } => {
                let mut parry = ParryRegistration::new(name.clone(), *attack_type)
                    .with_damage_multiplier(*damage_multiplier);
                if *dodge {
                    parry = parry.with_dodge();
                }
                if let Some(multiplier) = riposte {
                    parry = parry.with_counter(bonus_options(Some(*multiplier)));
                }
                lasting!(ParryStance::new(key, parry), duration)
            }
            Self::Guardian { damage_multiplier } => {
                lasting!(Guardian::new(key, *damage_multiplier), duration)
            }
            Self::Ambush { damage_multiplier } => lasting!(
                Ambush::new(key).with_options(bonus_options(*damage_multiplier)),
                duration
            ),
            Self::Thorns { fraction } => lasting!(Thorns::new(key, *fraction), duration),
            Self::Forewarned { flat, mult } => {
                lasting!(Forewarned::new(key, bonus(flat, mult)), duration)
            }
            Self::InflictOnHit {
                status,
                strength,
                turns,
                chance,
            } => lasting!(
                InflictOnHit::new(key, *status, *strength, *turns).with_chance(*chance),
                duration
            ),
            Self::Inflict {
                status,
                strength,
                turns,
            } => Arc::new(InflictStatus::new(
                key,
                StatusCondition::new(*status, source, *strength, *turns),
            )),
            Self::Cleanse { statuses } => Arc::new(Cleanse::new(key, statuses.clone())),
            Self::StatusSurge { mana } => lasting!(StatusSurge::new(key, *mana), duration),
            Self::DotSiphon { fraction } => lasting!(DotSiphon::new(key, *fraction), duration),
            Self::Regeneration { flat, fraction } => {
                lasting!(Regeneration::new(key, *flat, *fraction), duration)
            }
            Self::ManaOnHit { mana } => lasting!(ManaOnHit::new(key, *mana), duration),
            Self::Restore { hp, mp } => Arc::new(Restore::new(key, source, *hp, *mp)),
            Self::HealingBoost { multiplier } => {
                lasting!(HealingBoost::new(key, *multiplier), duration)
            }
            Self::Meditation { mana } => lasting!(Meditation::new(key, *mana), duration),
            Self::TimeWarp => Arc::new(TimeWarp::new(key)),
        }
    }
}

/// An active skill backed by an [`ActiveSpec`].
#[derive(Clone, Debug)]
pub struct DataActiveSkill {
    id: SkillId,
    spec: ActiveSpec,
}

impl DataActiveSkill {
    pub fn new(id: SkillId, spec: ActiveSpec) -> Self {
        Self { id, spec }
    }

    pub fn spec(&self) -> &ActiveSpec {
        &self.spec
    }
}

impl ActiveSkill for DataActiveSkill {
    fn id(&self) -> SkillId {
        self.id
    }

    fn name(&self) -> &str {
        &self.spec.name
    }

    fn targeting(&self) -> Targeting {
        self.spec.targeting
    }

    fn mana_cost(&self) -> u32 {
        self.spec.mana_cost
    }

    fn time_multiplier(&self) -> f64 {
        self.spec.time_multiplier
    }

    fn is_toggle(&self) -> bool {
        self.spec.toggle
    }

    fn attack(&self) -> Option<SkillAttack> {
        self.spec.attack.map(|attack| SkillAttack {
            is_physical: !attack.magic,
            attack_type: attack.attack_type,
        })
    }

    fn activate(&self, usage: &SkillUse) -> Vec<EffectGrant> {
        let mut grants = Vec::new();
        let mut slot: u8 = 0;
        for grant in &self.spec.grants {
            let recipients: Vec<EntityId> = match grant.to {
                Recipient::User => vec![usage.user],
                Recipient::Targets => usage.targets.clone(),
                Recipient::FirstTarget => usage.targets.first().copied().into_iter().collect(),
            };
            for recipient in recipients {
                let effect = grant.effect.build(Grant {
                    key: usage.key(slot),
                    source: usage.user,
                    duration: grant.duration,
                });
                grants.push(EffectGrant::new(recipient, effect));
                slot = slot.wrapping_add(1);
            }
        }
        grants
    }
}

/// A passive skill backed by a [`PassiveSpec`].
#[derive(Clone, Debug)]
pub struct DataPassiveSkill {
    id: SkillId,
    spec: PassiveSpec,
}

impl DataPassiveSkill {
    pub fn new(id: SkillId, spec: PassiveSpec) -> Self {
        Self { id, spec }
    }

    pub fn spec(&self) -> &PassiveSpec {
        &self.spec
    }
}

impl PassiveSkill for DataPassiveSkill {
    fn id(&self) -> SkillId {
        self.id
    }

    fn name(&self) -> &str {
        &self.spec.name
    }

    fn effects(&self, owner: EntityId) -> Vec<Arc<dyn Effect>> {
        (0u8..)
            .zip(&self.spec.effects)
            .map(|(slot, effect)| {
                effect.build(Grant {
                    key: EffectKey::Skill {
                        skill: self.id,
                        source: owner,
                        slot,
                    },
                    source: owner,
                    duration: None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::skill::TargetSide;
    use combat_core::testing::ScriptedRng;
    use combat_core::{BaseStats, CombatConfig, CombatEngine, CombatEntity, Stat, Team};

    use crate::specs::{AttackSpec, GrantSpec};

    fn focus() -> ActiveSpec {
        ActiveSpec {
            name: "Focus".into(),
            description: String::new(),
            targeting: Targeting::user(),
            mana_cost: 5,
            time_multiplier: 1.0,
            toggle: false,
            attack: None,
            grants: vec![GrantSpec {
                to: Recipient::User,
                effect: EffectSpec::StatModifier {
                    flat: vec![(Stat::Atk, 10.0)],
                    mult: Vec::new(),
                    label: Some("Focus".into()),
                },
                duration: Some(2),
            }],
        }
    }

    fn hex() -> ActiveSpec {
        ActiveSpec {
            name: "Hex".into(),
            description: String::new(),
            targeting: Targeting::up_to(TargetSide::Enemy, 2),
            mana_cost: 0,
            time_multiplier: 1.0,
            toggle: false,
            attack: Some(AttackSpec {
                magic: true,
                attack_type: None,
            }),
            grants: vec![GrantSpec {
                to: Recipient::Targets,
                effect: EffectSpec::Inflict {
                    status: combat_core::StatusKind::Weaken,
                    strength: 0.8,
                    turns: 2,
                },
                duration: None,
            }],
        }
    }

    #[test]
    fn grants_get_one_slot_per_recipient() {
        let skill = DataActiveSkill::new(SkillId(4), hex());
        let usage = SkillUse {
            skill: SkillId(4),
            user: EntityId(0),
            targets: vec![EntityId(1), EntityId(2)],
            parameter: 0,
        };
        let grants = skill.activate(&usage);
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].recipient, EntityId(1));
        assert_eq!(grants[1].recipient, EntityId(2));
        assert_eq!(grants[1].effect.key(), usage.key(1));
        assert_eq!(grants[0].effect.duration(), Some(0));
    }

    #[test]
    fn attack_spec_maps_to_skill_attack() {
        let skill = DataActiveSkill::new(SkillId(4), hex());
        let attack = skill.attack().map(|a| a.is_physical);
        assert_eq!(attack, Some(false));
        assert!(DataActiveSkill::new(SkillId(1), focus()).attack().is_none());
    }

    #[test]
    fn timed_grant_modifies_stats_until_expiry() {
        let mut builder = CombatEngine::builder(CombatConfig::default());
        let stats = BaseStats::defaults()
            .with(Stat::Atk, 10.0)
            .with(Stat::MaxMp, 20.0)
            .with(Stat::Spd, 16.0);
        let hero = CombatEntity::new("Hero", stats)
            .with_active(Arc::new(DataActiveSkill::new(SkillId(1), focus())));
        let a = builder.join(Team::Players, hero);
        builder.join(
            Team::Opponents,
            CombatEntity::new("Dummy", stats.with(Stat::Spd, 1.0)),
        );
        builder.rng(Box::new(ScriptedRng::new([])));
        let mut engine = builder.build();

        assert_eq!(engine.advance(), a);
        engine.begin_turn();
        engine
            .perform_active_skill(a, 0, &[], 0)
            .expect("focus should activate");
        assert_eq!(engine.total(a, Stat::Atk), 20.0);
        assert_eq!(engine.entity(a).stats.mp(), 15);
    }

    #[test]
    fn passive_effects_are_keyed_per_owner() {
        let spec = PassiveSpec {
            name: "Hardy".into(),
            description: String::new(),
            effects: vec![
                EffectSpec::Regeneration {
                    flat: 1.0,
                    fraction: 0.0,
                },
                EffectSpec::Thorns { fraction: 0.25 },
            ],
        };
        let skill = DataPassiveSkill::new(SkillId(9), spec);
        let effects = skill.effects(EntityId(3));
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[1].key(),
            EffectKey::Skill {
                skill: SkillId(9),
                source: EntityId(3),
                slot: 1,
            }
        );
        assert!(effects.iter().all(|e| e.duration().is_none()));
    }
}
