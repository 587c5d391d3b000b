//! Pairwise distances between opposing entities.
//!
//! Position is not a coordinate: every (player, opponent) pair carries its
//! own integer distance in `[0, MAX_DISTANCE]`. Same-team pairs have no
//! distance.

use std::collections::BTreeMap;

use crate::config::CombatConfig;

use super::EntityId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionMap {
    distances: BTreeMap<(EntityId, EntityId), u8>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Distance between two opposing entities. Symmetric.
    ///
    /// # Panics
    ///
    /// Panics if the pair was never registered (same-team or unknown ids).
    pub fn distance(&self, a: EntityId, b: EntityId) -> u8 {
        match self.distances.get(&Self::key(a, b)) {
            Some(&d) => d,
            None => panic!("no distance registered between {a} and {b}"),
        }
    }

    pub fn get(&self, a: EntityId, b: EntityId) -> Option<u8> {
        self.distances.get(&Self::key(a, b)).copied()
    }

    /// Set a pair's distance, clamped to `[0, MAX_DISTANCE]`.
    pub fn set(&mut self, a: EntityId, b: EntityId, distance: u8) {
        assert_ne!(a, b, "an entity has no distance to itself");
        self.distances
            .insert(Self::key(a, b), distance.min(CombatConfig::MAX_DISTANCE));
    }

    /// Distance after moving by `delta`, or `None` if it would leave the
    /// valid range.
    pub fn shifted(&self, a: EntityId, b: EntityId, delta: i8) -> Option<u8> {
        let next = i16::from(self.distance(a, b)) + i16::from(delta);
        (0..=i16::from(CombatConfig::MAX_DISTANCE))
            .contains(&next)
            .then_some(next as u8)
    }

    pub fn contains(&self, a: EntityId, b: EntityId) -> bool {
        self.distances.contains_key(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let mut map = PositionMap::new();
        map.set(EntityId(3), EntityId(1), 2);
        assert_eq!(map.distance(EntityId(1), EntityId(3)), 2);
        assert_eq!(map.distance(EntityId(3), EntityId(1)), 2);
    }

    #[test]
    fn set_clamps_to_max_distance() {
        let mut map = PositionMap::new();
        map.set(EntityId(0), EntityId(1), 200);
        assert_eq!(map.distance(EntityId(0), EntityId(1)), CombatConfig::MAX_DISTANCE);
    }

    #[test]
    fn shifted_rejects_out_of_range() {
        let mut map = PositionMap::new();
        map.set(EntityId(0), EntityId(1), 1);
        assert_eq!(map.shifted(EntityId(0), EntityId(1), -1), Some(0));
        assert_eq!(map.shifted(EntityId(0), EntityId(1), -2), None);
        assert_eq!(map.shifted(EntityId(0), EntityId(1), 2), Some(3));
        map.set(EntityId(0), EntityId(1), 3);
        assert_eq!(map.shifted(EntityId(0), EntityId(1), 2), None);
    }

    #[test]
    #[should_panic(expected = "no distance registered")]
    fn unknown_pair_panics() {
        PositionMap::new().distance(EntityId(0), EntityId(1));
    }
}
