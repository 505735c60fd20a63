//! Flood-fill connectivity over the grid.
//!
//! Groups (chains of same-owner stones) and empty regions are both computed
//! by a breadth-first fill over 4-adjacent neighbors. Nothing here is
//! persisted; callers recompute from the stone map on demand. The fill is
//! deterministic: the same seed always yields the same group regardless of
//! visit order, because the result sets are ordered.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::board::types::{Coord, PlayerId};

/// A maximal 4-connected chain of same-owner stones, together with its
/// deduplicated liberty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    owner: PlayerId,
    members: BTreeSet<Coord>,
    liberties: BTreeSet<Coord>,
}

impl Group {
    /// the player owning every stone in this group
    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    /// the coordinates of the group's stones
    pub fn members(&self) -> &BTreeSet<Coord> {
        &self.members
    }

    /// the empty coordinates adjacent to the group (deduplicated)
    pub fn liberties(&self) -> &BTreeSet<Coord> {
        &self.liberties
    }

    pub fn liberty_count(&self) -> usize {
        self.liberties.len()
    }

    pub fn stone_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.members.contains(&coord)
    }
}

/// the 4-adjacent neighbors of `coord` that fall inside a width x height grid
pub(crate) fn neighbors(coord: Coord, width: u32, height: u32) -> impl Iterator<Item = Coord> {
    let mut out = Vec::with_capacity(4);
    if coord.x > 0 {
        out.push(Coord::new(coord.x - 1, coord.y));
    }
    if coord.x + 1 < width {
        out.push(Coord::new(coord.x + 1, coord.y));
    }
    if coord.y > 0 {
        out.push(Coord::new(coord.x, coord.y - 1));
    }
    if coord.y + 1 < height {
        out.push(Coord::new(coord.x, coord.y + 1));
    }
    out.into_iter()
}

/// Collect the group containing the stone at `seed`.
///
/// Returns `None` when `seed` is empty or out of bounds.
pub(crate) fn group_at(
    width: u32,
    height: u32,
    stones: &BTreeMap<Coord, PlayerId>,
    seed: Coord,
) -> Option<Group> {
    if seed.x >= width || seed.y >= height {
        return None;
    }
    let owner = stones.get(&seed)?.clone();

    let mut members = BTreeSet::new();
    let mut liberties = BTreeSet::new();
    let mut queue = VecDeque::from([seed]);
    members.insert(seed);

    while let Some(current) = queue.pop_front() {
        for neighbor in neighbors(current, width, height) {
            match stones.get(&neighbor) {
                None => {
                    liberties.insert(neighbor);
                }
                Some(p) if *p == owner => {
                    if members.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
                Some(_) => {}
            }
        }
    }

    Some(Group { owner, members, liberties })
}

/// Collect the maximal empty region containing `seed`, together with the set
/// of players owning stones on its border. A region bordered by exactly one
/// player is that player's territory; a mixed border is dame.
///
/// Returns `None` when `seed` holds a stone or is out of bounds.
pub(crate) fn empty_region(
    width: u32,
    height: u32,
    stones: &BTreeMap<Coord, PlayerId>,
    seed: Coord,
) -> Option<(BTreeSet<Coord>, BTreeSet<PlayerId>)> {
    if seed.x >= width || seed.y >= height || stones.contains_key(&seed) {
        return None;
    }

    let mut region = BTreeSet::new();
    let mut borders = BTreeSet::new();
    let mut queue = VecDeque::from([seed]);
    region.insert(seed);

    while let Some(current) = queue.pop_front() {
        for neighbor in neighbors(current, width, height) {
            match stones.get(&neighbor) {
                None => {
                    if region.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
                Some(owner) => {
                    borders.insert(owner.clone());
                }
            }
        }
    }

    Some((region, borders))
}

/// Remove every opposing group adjacent to `placed` that has no liberties
/// left. Returns the number of stones removed.
pub(crate) fn capture_dead_neighbors(
    width: u32,
    height: u32,
    stones: &mut BTreeMap<Coord, PlayerId>,
    placed: Coord,
    player: &PlayerId,
) -> usize {
    let mut removed = 0;
    for neighbor in neighbors(placed, width, height) {
        let Some(owner) = stones.get(&neighbor) else {
            continue; // empty, or already captured via an earlier neighbor
        };
        if owner == player {
            continue;
        }
        let Some(group) = group_at(width, height, stones, neighbor) else {
            continue;
        };
        if group.liberty_count() == 0 {
            removed += group.stone_count();
            for coord in group.members() {
                stones.remove(coord);
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> PlayerId {
        PlayerId::black()
    }

    fn white() -> PlayerId {
        PlayerId::white()
    }

    #[test]
    fn test_corner_stone_has_two_liberties() {
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(0, 0), black());

        let group = group_at(5, 5, &stones, Coord::new(0, 0)).unwrap();
        assert_eq!(group.stone_count(), 1);
        assert_eq!(group.liberty_count(), 2);
    }

    #[test]
    fn test_center_stone_has_four_liberties() {
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(2, 2), black());

        let group = group_at(5, 5, &stones, Coord::new(2, 2)).unwrap();
        assert_eq!(group.liberty_count(), 4);
    }

    #[test]
    fn test_diagonal_stones_are_separate_groups() {
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(1, 1), black());
        stones.insert(Coord::new(2, 2), black());

        let group = group_at(5, 5, &stones, Coord::new(1, 1)).unwrap();
        assert_eq!(group.stone_count(), 1);
        assert!(!group.contains(Coord::new(2, 2)));
    }

    #[test]
    fn test_chain_liberties_deduplicated() {
        // two adjacent stones share no double-counted liberties
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(1, 1), black());
        stones.insert(Coord::new(2, 1), black());

        let group = group_at(5, 5, &stones, Coord::new(1, 1)).unwrap();
        assert_eq!(group.stone_count(), 2);
        // (0,1) (1,0) (1,2) (2,0) (2,2) (3,1)
        assert_eq!(group.liberty_count(), 6);
    }

    #[test]
    fn test_group_same_from_any_seed() {
        let mut stones = BTreeMap::new();
        for x in 1..4 {
            stones.insert(Coord::new(x, 2), black());
        }

        let a = group_at(5, 5, &stones, Coord::new(1, 2)).unwrap();
        let b = group_at(5, 5, &stones, Coord::new(3, 2)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_group_at_empty_is_none() {
        let stones = BTreeMap::new();
        assert!(group_at(5, 5, &stones, Coord::new(2, 2)).is_none());
        assert!(group_at(5, 5, &stones, Coord::new(9, 9)).is_none());
    }

    #[test]
    fn test_empty_region_single_owner() {
        // black walls off the (0,0) corner point
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(1, 0), black());
        stones.insert(Coord::new(0, 1), black());

        let (region, borders) = empty_region(5, 5, &stones, Coord::new(0, 0)).unwrap();
        assert_eq!(region.len(), 1);
        assert_eq!(borders.len(), 1);
        assert!(borders.contains(&black()));
    }

    #[test]
    fn test_empty_region_mixed_border() {
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(0, 0), black());
        stones.insert(Coord::new(4, 4), white());

        let (region, borders) = empty_region(5, 5, &stones, Coord::new(2, 2)).unwrap();
        assert_eq!(region.len(), 23);
        assert_eq!(borders.len(), 2);
    }

    #[test]
    fn test_capture_removes_whole_group() {
        // two white stones at (1,0),(2,0) surrounded by black except (2,0)'s
        // right side; black plays (3,0) to take the last liberty
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(1, 0), white());
        stones.insert(Coord::new(2, 0), white());
        stones.insert(Coord::new(0, 0), black());
        stones.insert(Coord::new(1, 1), black());
        stones.insert(Coord::new(2, 1), black());
        stones.insert(Coord::new(3, 0), black());

        let removed = capture_dead_neighbors(5, 5, &mut stones, Coord::new(3, 0), &black());
        assert_eq!(removed, 2);
        assert!(!stones.contains_key(&Coord::new(1, 0)));
        assert!(!stones.contains_key(&Coord::new(2, 0)));
        // the capturing stones stay
        assert_eq!(stones.get(&Coord::new(3, 0)), Some(&black()));
    }

    #[test]
    fn test_no_capture_with_liberty_left() {
        let mut stones = BTreeMap::new();
        stones.insert(Coord::new(1, 1), white());
        stones.insert(Coord::new(0, 1), black());
        stones.insert(Coord::new(1, 0), black());
        stones.insert(Coord::new(2, 1), black());
        // (1,2) stays open

        let removed = capture_dead_neighbors(5, 5, &mut stones, Coord::new(2, 1), &black());
        assert_eq!(removed, 0);
        assert!(stones.contains_key(&Coord::new(1, 1)));
    }
}
