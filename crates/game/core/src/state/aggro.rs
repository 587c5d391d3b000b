//! Per-defender threat weights.

use std::collections::BTreeMap;

use crate::env::RngOracle;

use super::EntityId;

/// Attacker → weight map held by one defender.
///
/// Weights grow with damage taken and decay multiplicatively at the end of
/// the owner's turn. Entries that decay below the configured floor are
/// dropped.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggroMap {
    weights: BTreeMap<EntityId, f64>,
}

impl AggroMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attacker: EntityId, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        *self.weights.entry(attacker).or_insert(0.0) += amount;
    }

    pub fn weight(&self, attacker: EntityId) -> f64 {
        self.weights.get(&attacker).copied().unwrap_or(0.0)
    }

    pub fn decay(&mut self, factor: f64, floor: f64) {
        self.weights.retain(|_, w| {
            *w *= factor;
            *w >= floor
        });
    }

    pub fn remove(&mut self, attacker: EntityId) {
        self.weights.remove(&attacker);
    }

    /// Highest-weighted candidate, ties broken uniformly at random.
    ///
    /// Candidates with no recorded weight count as zero. Returns `None` when
    /// `candidates` is empty or nobody has positive weight.
    pub fn target<I>(&self, candidates: I, rng: &mut dyn RngOracle) -> Option<EntityId>
    where
        I: IntoIterator<Item = EntityId>,
    {
        let mut best = 0.0_f64;
        let mut tied: Vec<EntityId> = Vec::new();
        for candidate in candidates {
            let weight = self.weight(candidate);
            if weight <= 0.0 {
                continue;
            }
            if weight > best {
                best = weight;
                tied.clear();
                tied.push(candidate);
            } else if weight == best {
                tied.push(candidate);
            }
        }
        match tied.len() {
            0 => None,
            1 => Some(tied[0]),
            n => Some(tied[rng.choose_index(n)]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, f64)> + '_ {
        self.weights.iter().map(|(&id, &w)| (id, w))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
