//! Deterministic turn-based combat simulation.
//!
//! `combat-core` defines the canonical combat rules and exposes a pure,
//! synchronous API: a driver builds an encounter, polls
//! [`engine::CombatEngine::play_turn`] (or steps `advance` / `begin_turn` /
//! `submit` / `end_turn` itself) and drains the message log between turns.
//! The crate performs no I/O; content loading and presentation live in
//! sibling crates.
pub mod combat;
pub mod config;
pub mod decision;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;
pub mod stats;
pub mod status;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use combat::{AttackChain, AttackResult};
pub use config::CombatConfig;
pub use decision::{Decision, DecisionProvider};
pub use effect::{Effect, EffectKey, EffectRegistry, Enchantment, HookPhase, HookPhases};
pub use engine::{
    ActionError, ActionOutcome, AttackRequest, CombatEngine, CombatLog, CombatMessage,
    EncounterBuilder, EntityView, MessageTag, TurnSummary,
};
pub use env::{PcgRng, RngOracle};
pub use error::{CombatError, ErrorSeverity};
pub use skill::{ActiveSkill, PassiveSkill, SkillId, SkillTable};
pub use state::{AttackType, Attribute, CombatEntity, EntityId, Team};
pub use stats::{BaseStats, Stat, StatBonus, StatMods, StatTable};
pub use status::{StatusApplication, StatusCondition, StatusKind};
