//! Rack position <-> logical space number translation.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{ModelError, Reference, UNMOUNTED};

/// Bijection between physical rack positions and logical space numbers.
///
/// Rack position `0` and space number `0` both mean "not mounted" and are
/// never stored. Inserting a pair evicts whatever either side was previously
/// paired with, so every rack position maps to at most one space and every
/// space to at most one rack position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RackMap {
    by_rack: BTreeMap<u32, u32>,
    by_space: BTreeMap<u32, u32>,
}

impl RackMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping implied by a spreadsheet import, which carries no
    /// rack data: distinct space numbers in ascending order occupy rack
    /// positions `1, 2, 3, ...`.
    pub fn synthesize<I>(spaces: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut nums: Vec<u32> = spaces
            .into_iter()
            .filter(|&num| num != UNMOUNTED)
            .collect();
        nums.sort_unstable();
        nums.dedup();

        let mut map = Self::new();
        for (rack_pos, space) in (1u32..).zip(nums) {
            map.insert(rack_pos, space);
        }
        debug!(slots = map.len(), "synthesized rack map from space numbers");
        map
    }

    /// Pair `rack_pos` with `space`, replacing earlier pairings of either.
    ///
    /// Returns `false` (and records nothing) when either side is the
    /// unmounted sentinel.
    pub fn insert(&mut self, rack_pos: u32, space: u32) -> bool {
        if rack_pos == UNMOUNTED || space == UNMOUNTED {
            return false;
        }
        if let Some(old_space) = self.by_rack.insert(rack_pos, space) {
            if old_space != space {
                self.by_space.remove(&old_space);
            }
        }
        if let Some(old_rack) = self.by_space.insert(space, rack_pos) {
            if old_rack != rack_pos {
                self.by_rack.remove(&old_rack);
            }
        }
        true
    }

    /// Logical space mounted at `rack_pos`.
    pub fn to_space(&self, rack_pos: u32) -> Result<u32, ModelError> {
        self.space_at(rack_pos)
            .ok_or(ModelError::NotFound(Reference::RackPosition(rack_pos)))
    }

    /// Rack position holding logical space `space`.
    pub fn to_rack_pos(&self, space: u32) -> Result<u32, ModelError> {
        self.rack_pos_of(space)
            .ok_or(ModelError::NotFound(Reference::Space(space)))
    }

    pub fn space_at(&self, rack_pos: u32) -> Option<u32> {
        self.by_rack.get(&rack_pos).copied()
    }

    pub fn rack_pos_of(&self, space: u32) -> Option<u32> {
        self.by_space.get(&space).copied()
    }

    /// Iterate `(rack_pos, space)` pairs in rack order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.by_rack.iter().map(|(&rack, &space)| (rack, space))
    }

    pub fn len(&self) -> usize {
        self.by_rack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rack.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_rack.clear();
        self.by_space.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijective(map: &RackMap) {
        assert_eq!(map.by_rack.len(), map.by_space.len());
        for (rack, space) in map.iter() {
            assert_eq!(map.to_rack_pos(space).unwrap(), rack);
            assert_eq!(map.to_space(map.to_rack_pos(space).unwrap()).unwrap(), space);
        }
    }

    #[test]
    fn duplicate_rack_position_is_last_wins() {
        let mut map = RackMap::new();
        assert!(map.insert(1, 5));
        assert!(map.insert(1, 6));
        assert_eq!(map.to_space(1).unwrap(), 6);
        assert_eq!(
            map.to_rack_pos(5),
            Err(ModelError::NotFound(Reference::Space(5)))
        );
        assert_bijective(&map);
    }

    #[test]
    fn space_moves_to_new_rack_position() {
        let mut map = RackMap::new();
        map.insert(1, 5);
        map.insert(2, 6);
        map.insert(2, 5);
        assert_eq!(map.to_rack_pos(5).unwrap(), 2);
        assert!(map.space_at(1).is_none());
        assert!(map.rack_pos_of(6).is_none());
        assert_eq!(map.len(), 1);
        assert_bijective(&map);
    }

    #[test]
    fn unmounted_sentinels_are_rejected() {
        let mut map = RackMap::new();
        assert!(!map.insert(0, 3));
        assert!(!map.insert(3, 0));
        assert!(map.is_empty());
        assert_eq!(
            map.to_space(0),
            Err(ModelError::NotFound(Reference::RackPosition(0)))
        );
    }

    #[test]
    fn synthesize_orders_by_space_number() {
        let map = RackMap::synthesize([20, 3, 0, 7, 3]);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(1, 3), (2, 7), (3, 20)]);
        assert_bijective(&map);
    }

    #[test]
    fn random_inserts_keep_bijection() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut map = RackMap::new();
        for _ in 0..2_000 {
            map.insert(rng.u32(0..24), rng.u32(0..40));
            assert_bijective(&map);
        }
        map.clear();
        assert!(map.is_empty());
    }
}
