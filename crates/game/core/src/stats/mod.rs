//! Stat system: the closed stat set, modifier maps and per-entity tables.
//!
//! ```text
//! [ BaseStats (template, immutable) ]
//!      ↓  + flat accumulator
//!      ↓  × mult accumulator
//! [ total(stat) ] ──► caps current HP / MP
//! ```
//!
//! Every temporary change to an entity's stats is a [`StatMods`] map applied
//! through [`StatTable`] and later reverted with the identical map.

pub mod modifiers;
pub mod stat;
pub mod table;

pub use modifiers::{StatBonus, StatMods};
pub use stat::{BaseStats, Stat, StatArray};
pub use table::StatTable;
