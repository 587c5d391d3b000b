//! Hit chance and accuracy calculations.

use std::f64::consts::PI;

use crate::config::{CombatConfig, HitParams};

/// Effective distance for accuracy purposes.
///
/// The attacker's accuracy-distance shift moves the pair closer (negative)
/// or further (positive); the result is clamped to `[0, MAX_DISTANCE]`.
pub fn effective_distance(distance: u8, accuracy_distance: f64) -> f64 {
    (f64::from(distance) + accuracy_distance).clamp(0.0, f64::from(CombatConfig::MAX_DISTANCE))
}

/// Distance penalty: `1.1 − 0.1 · d^exponent`, floored at zero.
pub fn distance_factor(effective_distance: f64, exponent: f64) -> f64 {
    (1.1 - 0.1 * effective_distance.powf(exponent)).max(0.0)
}

/// Calculate hit chance based on accuracy vs avoidability and distance.
///
/// # Formula
///
/// ```text
/// skew   = 1 − 2^(1 − acc/avo)                  ∈ [−1, 1)
/// chance = 2·√df / (1 + exp(−C · tan(π·skew/2)))
/// ```
///
/// `df` is the [`distance_factor`]. The result is a threshold compared
/// against a uniform draw; values at or above 1 always hit.
///
/// # Arguments
///
/// * `accuracy` - Attacker's ACC total
/// * `avoidability` - Defender's AVO total (treated as at least 1)
/// * `effective_distance` - Output of [`effective_distance`]
/// * `params` - Curve steepness and distance exponent
pub fn hit_chance(
    accuracy: f64,
    avoidability: f64,
    effective_distance: f64,
    params: &HitParams,
) -> f64 {
    let ratio = accuracy.max(0.0) / avoidability.max(1.0);
    let skew = (1.0 - 2f64.powf(1.0 - ratio)).clamp(-1.0, 1.0);
    let slope = (PI * skew / 2.0).tan();
    let df = distance_factor(effective_distance, params.distance_exponent);
    2.0 * df.sqrt() / (1.0 + (-params.steepness * slope).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> HitParams {
        HitParams::default()
    }

    #[test]
    fn equal_stats_at_point_blank() {
        // skew = 0 → sigmoid 1/2 → chance = √1.1
        let chance = hit_chance(50.0, 50.0, 0.0, &params());
        assert!((chance - 1.1_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn double_accuracy_matches_closed_form() {
        let chance = hit_chance(100.0, 50.0, 0.0, &params());
        let expected = 2.0 * 1.1_f64.sqrt() / (1.0 + (-(PI / 4.0).tan()).exp());
        assert!((chance - expected).abs() < 1e-12);
        assert!(chance > 0.0);
    }

    #[test]
    fn zero_accuracy_never_hits() {
        assert!(hit_chance(0.0, 50.0, 0.0, &params()) < 1e-9);
    }

    #[test]
    fn chance_falls_with_distance() {
        let near = hit_chance(60.0, 50.0, 0.0, &params());
        let far = hit_chance(60.0, 50.0, 4.0, &params());
        assert!(far < near);
    }

    #[test]
    fn accuracy_distance_shifts_and_clamps() {
        assert_eq!(effective_distance(2, -1.0), 1.0);
        assert_eq!(effective_distance(1, -3.0), 0.0);
        assert_eq!(effective_distance(3, 5.0), 4.0);
    }

    #[test]
    fn chance_increases_with_accuracy() {
        let mut last = 0.0;
        for acc in [10.0, 30.0, 50.0, 80.0, 150.0] {
            let chance = hit_chance(acc, 50.0, 1.0, &params());
            assert!(chance > last);
            last = chance;
        }
    }
}
