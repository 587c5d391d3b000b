//! Encounter state: identities, templates and per-entity combat bookkeeping.
//!
//! Entities are addressed by [`EntityId`] and owned by the engine. The
//! pairwise [`PositionMap`] and per-defender [`AggroMap`] are plain data
//! structures that the engine mutates on behalf of actions.
pub mod aggro;
pub mod combatant;
pub mod entity;
pub mod position;

pub use aggro::AggroMap;
pub use combatant::{EntityCombatState, ParryRegistration};
pub use entity::{AttackType, Attribute, CombatEntity};
pub use position::PositionMap;

use std::fmt;

/// Unique identifier for an entity in an encounter.
///
/// Ids are allocated densely from zero in join order and are never reused
/// within an encounter, so they double as indices into the engine's entity
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two sides of an encounter.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Team {
    Players,
    Opponents,
}

impl Team {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Players => Self::Opponents,
            Self::Opponents => Self::Players,
        }
    }
}
