//! Status conditions and per-entity tolerance.
//!
//! A status condition is a specialised effect with at most one instance per
//! kind per entity. Applying a kind that is already present amplifies the
//! existing instance instead of stacking a second one. Landing a new
//! instance is gated by the target's tolerance for that kind:
//!
//! - resisting an application wears tolerance down, so repeated attempts get
//!   easier;
//! - when an instance wears off, maximum tolerance grows and the current
//!   tolerance refills, so recently suffered conditions are harder to land
//!   again.
//!
//! The mutable payload of an active status ([`StatusCondition`]) lives in the
//! owner's [`StatusTable`]; the registry holds an immutable [`StatusEffect`]
//! that reads it back.
mod effect;

pub use effect::StatusEffect;

use std::collections::BTreeMap;

use crate::state::EntityId;
use crate::stats::{Stat, StatMods};

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
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    /// Damage over time; strength stacks additively.
    Poison,
    /// Damage over time; keeps the stronger burn and may burn longer.
    Burn,
    /// Damage over time; keeps the stronger bleed.
    Bleed,
    /// Loses its turns.
    Stun,
    /// Cannot reposition.
    Root,
    /// ATK and MAG multiplied by strength.
    Weaken,
    /// ACC multiplied by strength.
    Blind,
    /// SPD multiplied by strength.
    Slow,
}

/// How a second application merges into an existing instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Amplify {
    /// Strengths add; duration refreshes to the longer remaining.
    Stack,
    /// Keep the stronger; duration refreshes to the longer remaining.
    Strongest,
    /// Strengths average; duration refreshes to the longer remaining.
    Average,
    /// Strength is kept; duration grows by a random number of ticks.
    Extend,
}

impl StatusKind {
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Poison | Self::Burn | Self::Bleed)
    }

    pub const fn restricts_movement(self) -> bool {
        matches!(self, Self::Root)
    }

    pub const fn skips_turn(self) -> bool {
        matches!(self, Self::Stun)
    }

    pub const fn amplify(self) -> Amplify {
        match self {
            Self::Poison => Amplify::Stack,
            Self::Bleed | Self::Root => Amplify::Strongest,
            Self::Weaken | Self::Slow => Amplify::Average,
            Self::Burn | Self::Stun | Self::Blind => Amplify::Extend,
        }
    }

    /// Multipliers this status applies at the given strength, if it modifies
    /// stats at all.
    pub fn stat_mods(self, strength: f64) -> Option<StatMods> {
        let mods = match self {
            Self::Weaken => StatMods::new()
                .with(Stat::Atk, strength)
                .with(Stat::Mag, strength),
            Self::Blind => StatMods::new().with(Stat::Acc, strength),
            Self::Slow => StatMods::new().with(Stat::Spd, strength),
            _ => return None,
        };
        Some(mods)
    }

    /// Adjective used in combat messages ("X is poisoned").
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::Poison => "poisoned",
            Self::Burn => "burning",
            Self::Bleed => "bleeding",
            Self::Stun => "stunned",
            Self::Root => "rooted",
            Self::Weaken => "weakened",
            Self::Blind => "blinded",
            Self::Slow => "slowed",
        }
    }
}

/// Payload of one active status instance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCondition {
    pub kind: StatusKind,
    pub inflicter: EntityId,
    /// Damage per tick for damage-over-time kinds, multiplier for stat kinds.
    pub strength: f64,
    /// End-of-turn ticks the instance lasts.
    pub duration: u32,
}

impl StatusCondition {
    pub fn new(kind: StatusKind, inflicter: EntityId, strength: f64, duration: u32) -> Self {
        Self {
            kind,
            inflicter,
            strength,
            duration,
        }
    }
}

/// Outcome of an application attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StatusApplication {
    Applied,
    Amplified,
    Resisted,
}

impl StatusApplication {
    /// True if the status is now active on the target.
    pub const fn landed(self) -> bool {
        !matches!(self, Self::Resisted)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    pub current: f64,
    pub max: f64,
}

impl Tolerance {
    pub fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    /// `current / max`, or 0 for a degenerate maximum.
    pub fn fraction(&self) -> f64 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Active statuses and tolerance meters for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTable {
    active: BTreeMap<StatusKind, StatusCondition>,
    tolerance: BTreeMap<StatusKind, Tolerance>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusCondition> {
        self.active.get(&kind)
    }

    pub fn get_mut(&mut self, kind: StatusKind) -> Option<&mut StatusCondition> {
        self.active.get_mut(&kind)
    }

    pub fn contains(&self, kind: StatusKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn insert(&mut self, condition: StatusCondition) {
        self.active.insert(condition.kind, condition);
    }

    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusCondition> {
        self.active.remove(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusCondition> {
        self.active.values()
    }

    pub fn restricts_movement(&self) -> bool {
        self.active.keys().any(|kind| kind.restricts_movement())
    }

    /// Tolerance for `kind`, starting full at `base` if never touched.
    pub fn tolerance(&self, kind: StatusKind, base: f64) -> Tolerance {
        self.tolerance
            .get(&kind)
            .copied()
            .unwrap_or_else(|| Tolerance::full(base))
    }

    /// Wear tolerance down after a resisted application. Floors at zero.
    pub fn wear_tolerance(&mut self, kind: StatusKind, base: f64, loss: f64) {
        let mut tolerance = self.tolerance(kind, base);
        tolerance.current = (tolerance.current - loss).max(0.0);
        self.tolerance.insert(kind, tolerance);
    }

    /// Grow the maximum and refill after an instance wears off.
    pub fn grow_tolerance(&mut self, kind: StatusKind, base: f64, growth: f64) {
        let mut tolerance = self.tolerance(kind, base);
        tolerance.max *= growth;
        tolerance.current = tolerance.max;
        self.tolerance.insert(kind, tolerance);
    }

    pub fn set_tolerance(&mut self, kind: StatusKind, tolerance: Tolerance) {
        self.tolerance.insert(kind, tolerance);
    }
}

/// Probability that an application is resisted, in `[0, 1]`.
pub fn resist_chance(tolerance: Tolerance, resistance: f64, application: f64) -> f64 {
    (tolerance.fraction() * resistance * application).clamp(0.0, 1.0)
}

/// Per-tick success chance for probabilistic duration extension:
/// `1 − exp(−ln(k^0.5)·p)` with `k = 1/(1−p)`.
pub fn extension_chance(p: f64) -> f64 {
    let p = p.clamp(0.0, 0.999);
    let k = 1.0 / (1.0 - p);
    1.0 - (-(k.sqrt().ln()) * p).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_kinds_expose_mods() {
        let mods = StatusKind::Weaken.stat_mods(0.7).unwrap();
        assert_eq!(mods.get(Stat::Atk), Some(0.7));
        assert_eq!(mods.get(Stat::Mag), Some(0.7));
        assert!(StatusKind::Poison.stat_mods(3.0).is_none());
    }

    #[test]
    fn resist_chance_is_bounded() {
        assert_eq!(resist_chance(Tolerance::full(100.0), 3.0, 2.0), 1.0);
        let empty = Tolerance {
            current: 0.0,
            max: 100.0,
        };
        assert_eq!(resist_chance(empty, 1.0, 1.0), 0.0);
        assert_eq!(resist_chance(Tolerance::full(100.0), -1.0, 1.0), 0.0);
    }

    #[test]
    fn tolerance_wears_and_grows() {
        let mut table = StatusTable::new();
        table.wear_tolerance(StatusKind::Stun, 100.0, 25.0);
        assert_eq!(table.tolerance(StatusKind::Stun, 100.0).current, 75.0);
        for _ in 0..10 {
            table.wear_tolerance(StatusKind::Stun, 100.0, 25.0);
        }
        assert_eq!(table.tolerance(StatusKind::Stun, 100.0).current, 0.0);

        table.grow_tolerance(StatusKind::Stun, 100.0, 1.25);
        let grown = table.tolerance(StatusKind::Stun, 100.0);
        assert_eq!(grown.max, 125.0);
        assert_eq!(grown.current, 125.0);
    }

    #[test]
    fn extension_chance_at_half() {
        let expected = 1.0 - (-(2.0_f64.sqrt().ln()) * 0.5).exp();
        assert!((extension_chance(0.5) - expected).abs() < 1e-12);
        assert_eq!(extension_chance(0.0), 0.0);
    }
}
