//! Test doubles for deterministic scenarios.
//!
//! Available to this crate's unit tests and, through the `test-utils`
//! feature, to integration tests in other crates.

use std::collections::VecDeque;

use crate::env::RngOracle;

/// Draw returned once the script runs out.
pub const DEFAULT_DRAW: f64 = 0.5;

/// RNG that replays a fixed list of `[0, 1)` draws, then repeats
/// [`DEFAULT_DRAW`].
///
/// Every engine roll goes through `next_f64` (luck-skewed draws consume one
/// value, plus one per extra luck sample), so a script lists draws in the
/// order the pipeline makes them: hit, variance, crit for an attack.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Append more draws to the script.
    pub fn push(&mut self, draw: f64) {
        self.draws.push_back(draw);
    }

    /// Draws consumed so far, scripted or default.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * f64::from(u32::MAX)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.consumed += 1;
        self.draws
            .pop_front()
            .unwrap_or(DEFAULT_DRAW)
            .clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_defaults() {
        let mut rng = ScriptedRng::new([0.1, 0.9]);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), DEFAULT_DRAW);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn choose_index_follows_script() {
        let mut rng = ScriptedRng::new([0.0, 0.99]);
        assert_eq!(rng.choose_index(3), 0);
        assert_eq!(rng.choose_index(3), 2);
    }
}
