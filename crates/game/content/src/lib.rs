//! Data-driven combat content and its loaders.
//!
//! Skills and entity templates are authored as RON, tuning as TOML:
//! - `skills.ron`: class → rank → skill specs
//! - `entities.ron`: entity templates referencing those skills
//! - `config.toml`: [`CombatConfig`](combat_core::CombatConfig) overrides
//!
//! The loaders build an immutable [`SkillTable`](combat_core::SkillTable)
//! once; encounters receive templates by reference and never see the specs.

pub mod interpreter;
pub mod specs;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use interpreter::{DataActiveSkill, DataPassiveSkill, Grant};
pub use specs::{
    ActiveSpec, AttackSpec, EffectSpec, EntitySpec, GrantSpec, PassiveSpec, Recipient, SkillSpec,
};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ContentSet, EntityLoader, SkillLoader};
