//! The closed stat set and the fixed-size array indexed by it.

use core::ops::{Index, IndexMut};

use strum::{EnumCount, IntoEnumIterator};

/// Every stat an entity carries during combat.
///
/// The first block holds the integer-valued stats authored on entity
/// templates; their totals are rounded. The second block holds fractional
/// combat coefficients whose totals are used as-is.
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
    strum::EnumCount,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stat {
    MaxHp,
    MaxMp,
    Atk,
    Def,
    Mag,
    Res,
    Acc,
    Avo,
    Spd,
    Range,
    /// Critical chance in percent.
    Crit,
    Luck,

    /// Shift applied to distance before the accuracy falloff.
    AccuracyDistance,
    /// Damage multiplier on a critical hit.
    CritDamage,
    /// Per-stack bonus when hitting a weakness.
    WeaknessModifier,
    /// Per-stack reduction when hitting a resistance (floored at 0).
    ResistanceModifier,
    /// Multiplier on incoming damage.
    DamageReduction,
    /// Multiplier on the chance to resist incoming status conditions.
    StatusResistance,
    /// Multiplier on the target's resist chance when this entity inflicts.
    StatusApplication,
}

impl Stat {
    /// Returns true if the total of this stat is rounded to an integer.
    pub const fn is_integral(self) -> bool {
        !matches!(
            self,
            Self::AccuracyDistance
                | Self::CritDamage
                | Self::WeaknessModifier
                | Self::ResistanceModifier
                | Self::DamageReduction
                | Self::StatusResistance
                | Self::StatusApplication
        )
    }

    /// Base value used when a template does not author this stat.
    pub const fn default_base(self) -> f64 {
        match self {
            Self::MaxHp => 100.0,
            Self::MaxMp => 0.0,
            Self::Range => 1.0,
            Self::CritDamage => 1.5,
            Self::WeaknessModifier | Self::ResistanceModifier => 0.5,
            Self::DamageReduction | Self::StatusApplication => 1.0,
            Self::StatusResistance => 0.5,
            _ => 0.0,
        }
    }
}

/// Fixed-size array with one slot per [`Stat`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatArray<T>([T; Stat::COUNT]);

impl<T: Copy> StatArray<T> {
    /// Array with every slot set to `value`.
    pub const fn splat(value: T) -> Self {
        Self([value; Stat::COUNT])
    }

    /// Iterate `(stat, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, T)> + '_ {
        Stat::iter().map(move |stat| (stat, self[stat]))
    }
}

impl StatArray<f64> {
    /// Array holding each stat's [`Stat::default_base`].
    pub fn defaults() -> Self {
        let mut array = Self::splat(0.0);
        for stat in Stat::iter() {
            array[stat] = stat.default_base();
        }
        array
    }

    /// Builder: set one stat.
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self[stat] = value;
        self
    }
}

impl Default for StatArray<f64> {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<T> Index<Stat> for StatArray<T> {
    type Output = T;

    fn index(&self, stat: Stat) -> &T {
        &self.0[stat as usize]
    }
}

impl<T> IndexMut<Stat> for StatArray<T> {
    fn index_mut(&mut self, stat: Stat) -> &mut T {
        &mut self.0[stat as usize]
    }
}

/// Base stat block of an entity template.
pub type BaseStats = StatArray<f64>;
