//! Decisions and the providers that make them.
//!
//! The engine never decides anything on an entity's behalf. During a turn it
//! asks a [`DecisionProvider`] for a [`Decision`], validates it, and asks
//! again if the decision was rejected.

use crate::engine::CombatEngine;
use crate::state::EntityId;

/// One action chosen for the current actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Decision {
    /// Basic attack against one opponent.
    Attack { target: EntityId },
    /// Use the actor's `index`-th active skill.
    Skill {
        index: usize,
        targets: Vec<EntityId>,
        parameter: i32,
    },
    /// Move relative to one or more opponents by `amount` (negative closes in).
    Reposition { targets: Vec<EntityId>, amount: i8 },
    /// Brace: incoming damage is reduced until the actor's next turn.
    Defend,
}

/// Source of decisions for one side (a player interface, a script, an AI).
pub trait DecisionProvider {
    fn decide(&mut self, engine: &CombatEngine, actor: EntityId) -> Decision;
}

impl<F> DecisionProvider for F
where
    F: FnMut(&CombatEngine, EntityId) -> Decision,
{
    fn decide(&mut self, engine: &CombatEngine, actor: EntityId) -> Decision {
        self(engine, actor)
    }
}
