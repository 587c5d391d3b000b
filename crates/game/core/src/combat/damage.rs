//! Damage calculation.
//!
//! The pieces here are pure; the resolver draws the random inputs and
//! multiplies them together.

use crate::config::DamageParams;

/// Fraction of offense that gets through a defense.
///
/// # Formula
///
/// ```text
/// ratio  = offense / defense
/// factor = 1 − exp(ratio^C · ln(1 − K))
/// ```
///
/// With `ratio = 1` the factor is exactly `K`; it tends to 1 as offense
/// outgrows defense and to 0 as offense vanishes.
pub fn damage_factor(offense: f64, defense: f64, params: &DamageParams) -> f64 {
    let ratio = offense.max(0.0) / defense.max(1.0);
    let k = params.parity_fraction.clamp(0.0, 0.999_999);
    1.0 - (ratio.powf(params.ratio_exponent) * (1.0 - k).ln()).exp()
}

/// Random variance factor in `[1 − v, 1 + v)` from a draw in `[0, 1)`.
pub fn variance_factor(draw: f64, variance: f64) -> f64 {
    1.0 - variance + 2.0 * variance * draw
}

/// Elemental multiplier.
///
/// # Formula
///
/// ```text
/// (1 + weakness_mod)^weakness_stacks · (1 + max(resistance_mod, 0))^−resistance_stacks
/// ```
pub fn attribute_multiplier(
    weakness_stacks: usize,
    resistance_stacks: usize,
    weakness_mod: f64,
    resistance_mod: f64,
) -> f64 {
    let weak = (1.0 + weakness_mod).powi(weakness_stacks as i32);
    let resist = (1.0 + resistance_mod.max(0.0)).powi(-(resistance_stacks as i32));
    weak * resist
}

/// Every multiplicative input to a single damage roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub offense: f64,
    pub defense: f64,
    pub variance: f64,
    /// Crit damage multiplier, or 1 when the crit check failed.
    pub crit: f64,
    pub attribute: f64,
    pub reduction: f64,
    pub defend: f64,
    pub hooks: f64,
}

impl DamageRoll {
    /// Final damage: the product of every factor, rounded up and floored at 0.
    pub fn total(&self, params: &DamageParams) -> u32 {
        let raw = self.offense.max(0.0)
            * damage_factor(self.offense, self.defense, params)
            * self.variance
            * self.crit
            * self.attribute
            * self.reduction
            * self.defend
            * self.hooks;
        if raw.is_finite() && raw > 0.0 {
            raw.ceil().min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(offense: f64, defense: f64) -> DamageRoll {
        DamageRoll {
            offense,
            defense,
            variance: 1.0,
            crit: 1.0,
            attribute: 1.0,
            reduction: 1.0,
            defend: 1.0,
            hooks: 1.0,
        }
    }

    #[test]
    fn parity_deals_k() {
        let params = DamageParams::default();
        assert!((damage_factor(40.0, 40.0, &params) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn overwhelming_offense_deals_nearly_all() {
        let params = DamageParams::default();
        let factor = damage_factor(50.0, 10.0, &params);
        assert!((factor - (1.0 - 0.5_f64.powi(25))).abs() < 1e-12);
        assert_eq!(roll(50.0, 10.0).total(&params), 50);
    }

    #[test]
    fn variance_band() {
        assert!((variance_factor(0.5, 0.1) - 1.0).abs() < 1e-12);
        assert!((variance_factor(0.0, 0.1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn attribute_stacks_compound() {
        assert!((attribute_multiplier(2, 0, 0.5, 0.5) - 2.25).abs() < 1e-12);
        assert!((attribute_multiplier(0, 1, 0.5, 0.5) - 1.0 / 1.5).abs() < 1e-12);
        assert!((attribute_multiplier(0, 1, 0.5, -0.3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_offense_deals_nothing() {
        assert_eq!(roll(0.0, 10.0).total(&DamageParams::default()), 0);
    }

    #[test]
    fn multipliers_scale_before_rounding_up() {
        let params = DamageParams::default();
        let mut r = roll(9.0, 9.0);
        assert_eq!(r.total(&params), 5);
        r.defend = 0.5;
        assert_eq!(r.total(&params), 3);
    }
}
