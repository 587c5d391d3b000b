//! Modifier maps passed to [`StatTable`](super::StatTable) apply/revert calls.
//!
//! A `StatMods` value is the exact unit of symmetry: whatever map was handed
//! to `apply_*` must be handed, unchanged, to the matching `revert_*`. Effects
//! therefore store their maps and never rebuild them at revert time.

use arrayvec::ArrayVec;
use strum::EnumCount;

use super::Stat;

/// Ordered `stat → value` map with at most one entry per stat.
///
/// Used both for flat deltas (identity 0) and multiplicative factors
/// (identity 1); the table method it is passed to decides the meaning.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMods {
    entries: ArrayVec<(Stat, f64), { Stat::COUNT }>,
}

impl StatMods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a stat's value, replacing any previous entry.
    pub fn set(&mut self, stat: Stat, value: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == stat) {
            entry.1 = value;
        } else {
            self.entries.push((stat, value));
        }
    }

    /// Builder: set one stat.
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self.set(stat, value);
        self
    }

    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stat)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if any entry touches HP/MP maxima.
    pub fn touches_resources(&self) -> bool {
        self.entries
            .iter()
            .any(|(s, _)| matches!(s, Stat::MaxHp | Stat::MaxMp))
    }
}

impl FromIterator<(Stat, f64)> for StatMods {
    fn from_iter<I: IntoIterator<Item = (Stat, f64)>>(iter: I) -> Self {
        let mut mods = Self::new();
        for (stat, value) in iter {
            mods.set(stat, value);
        }
        mods
    }
}

/// A paired flat + multiplicative bonus, applied and reverted together.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBonus {
    pub flat: StatMods,
    pub mult: StatMods,
}

impl StatBonus {
    pub fn new(flat: StatMods, mult: StatMods) -> Self {
        Self { flat, mult }
    }

    pub fn flat(flat: StatMods) -> Self {
        Self {
            flat,
            mult: StatMods::new(),
        }
    }

    pub fn mult(mult: StatMods) -> Self {
        Self {
            flat: StatMods::new(),
            mult,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.mult.is_empty()
    }
}
