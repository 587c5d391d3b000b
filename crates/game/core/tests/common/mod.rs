//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;

use combat_core::{BaseStats, CombatEntity, RngOracle, Stat};

/// Replays scripted draws, then returns 0.5 forever.
pub struct Script(VecDeque<f64>);

impl Script {
    pub fn boxed(draws: &[f64]) -> Box<dyn RngOracle> {
        Box::new(Self(draws.iter().copied().collect()))
    }
}

impl RngOracle for Script {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * f64::from(u32::MAX)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        self.0.pop_front().unwrap_or(0.5)
    }
}

/// A template with every unlisted stat at its default.
pub fn entity(name: &str, stats: &[(Stat, f64)]) -> CombatEntity {
    let base = stats
        .iter()
        .fold(BaseStats::defaults(), |base, &(stat, value)| base.with(stat, value));
    CombatEntity::new(name, base)
}
