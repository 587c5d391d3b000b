//! Per-entity stat table: base values, modifier accumulators and current
//! HP/MP.
//!
//! # Invariants
//!
//! - `total(stat) = (base + flat) * mult`, rounded for integral stats.
//! - Base values never change during an encounter.
//! - After every mutation, current HP/MP are capped to the recomputed maxima
//!   (never raised).

use super::{BaseStats, Stat, StatArray, StatBonus, StatMods};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatTable {
    base: BaseStats,
    flat: StatArray<f64>,
    mult: StatArray<f64>,
    hp: u32,
    mp: u32,
}

impl StatTable {
    /// Create a table at full HP and MP.
    pub fn new(base: BaseStats) -> Self {
        let mut table = Self {
            base,
            flat: StatArray::splat(0.0),
            mult: StatArray::splat(1.0),
            hp: 0,
            mp: 0,
        };
        table.hp = table.max_hp();
        table.mp = table.max_mp();
        table
    }

    // ========================================================================
    // Totals
    // ========================================================================

    /// Total value of a stat after modifiers.
    pub fn total(&self, stat: Stat) -> f64 {
        let raw = (self.base[stat] + self.flat[stat]) * self.mult[stat];
        if stat.is_integral() { raw.round() } else { raw }
    }

    /// Total of an integral stat as an integer.
    pub fn total_int(&self, stat: Stat) -> i64 {
        self.total(stat).round() as i64
    }

    pub fn base(&self, stat: Stat) -> f64 {
        self.base[stat]
    }

    /// Accumulated flat delta for a stat.
    pub fn flat(&self, stat: Stat) -> f64 {
        self.flat[stat]
    }

    /// Accumulated multiplicative factor for a stat.
    pub fn mult(&self, stat: Stat) -> f64 {
        self.mult[stat]
    }

    pub fn max_hp(&self) -> u32 {
        self.total(Stat::MaxHp).max(0.0) as u32
    }

    pub fn max_mp(&self) -> u32 {
        self.total(Stat::MaxMp).max(0.0) as u32
    }

    // ========================================================================
    // Modifier application
    // ========================================================================

    pub fn apply_flat(&mut self, mods: &StatMods) {
        for (stat, delta) in mods.iter() {
            self.flat[stat] += delta;
        }
        self.clamp_resources();
    }

    /// Exact inverse of [`apply_flat`](Self::apply_flat) for the same map.
    pub fn revert_flat(&mut self, mods: &StatMods) {
        for (stat, delta) in mods.iter() {
            self.flat[stat] -= delta;
        }
        self.clamp_resources();
    }

    /// Multiply stat factors. A zero factor cannot be reverted and is a
    /// content bug.
    pub fn apply_mult(&mut self, mods: &StatMods) {
        for (stat, factor) in mods.iter() {
            assert!(
                factor != 0.0 && factor.is_finite(),
                "multiplicative modifier for {stat} must be finite and non-zero, got {factor}"
            );
            self.mult[stat] *= factor;
        }
        self.clamp_resources();
    }

    /// Exact inverse of [`apply_mult`](Self::apply_mult) for the same map.
    pub fn revert_mult(&mut self, mods: &StatMods) {
        for (stat, factor) in mods.iter() {
            assert!(
                factor != 0.0 && factor.is_finite(),
                "multiplicative modifier for {stat} must be finite and non-zero, got {factor}"
            );
            self.mult[stat] /= factor;
        }
        self.clamp_resources();
    }

    /// Apply a paired bonus (flat first, then mult).
    pub fn apply_bonus(&mut self, bonus: &StatBonus) {
        self.apply_flat(&bonus.flat);
        self.apply_mult(&bonus.mult);
    }

    /// Revert a paired bonus (mult first, then flat).
    pub fn revert_bonus(&mut self, bonus: &StatBonus) {
        self.revert_mult(&bonus.mult);
        self.revert_flat(&bonus.flat);
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remove HP, returning the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore HP up to the maximum, returning the amount actually healed.
    pub fn restore_hp(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp().saturating_sub(self.hp));
        self.hp += healed;
        healed
    }

    /// Restore MP up to the maximum, returning the amount actually gained.
    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_mp().saturating_sub(self.mp));
        self.mp += gained;
        gained
    }

    /// Spend MP if enough is available.
    pub fn spend_mp(&mut self, amount: u32) -> bool {
        if self.mp < amount {
            return false;
        }
        self.mp -= amount;
        true
    }

    /// Overwrite current HP (clamped to max). Used by scenario setup.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    /// Overwrite current MP (clamped to max). Used by scenario setup.
    pub fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(self.max_mp());
    }

    fn clamp_resources(&mut self) {
        self.hp = self.hp.min(self.max_hp());
        self.mp = self.mp.min(self.max_mp());
    }
}
