//! Bone slot allocation for one mesh part
//!
//! Polygons are placed greedily, in source order: each goes to the existing
//! slot set that needs the fewest new bones (lowest index on ties), or to a
//! new set when none has room. Earlier placements are never revisited, so
//! the number of sets is not minimal; consumers budget against this exact
//! fragmentation pattern.

use super::bones::{BoneDemand, BoneSlotSet};

/// Where a polygon's bones were placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the slot set within the allocator
    pub slot_set: usize,
    /// The polygon needs more distinct bones than a slot set holds; only the
    /// first `capacity` of them were placed
    pub overflow: bool,
}

/// Growable collection of slot sets for one mesh part
#[derive(Debug, Clone)]
pub struct BoneSlotAllocator {
    sets: Vec<BoneSlotSet>,
    capacity: usize,
}

impl BoneSlotAllocator {
    pub fn new(capacity: usize) -> Self {
        Self {
            sets: Vec::new(),
            capacity,
        }
    }

    /// Slot capacity of every set
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, slot_set: usize) -> Option<&BoneSlotSet> {
        self.sets.get(slot_set)
    }

    pub fn sets(&self) -> &[BoneSlotSet] {
        &self.sets
    }

    /// Place a polygon's bone demand
    pub fn place(&mut self, demand: &BoneDemand) -> Placement {
        if demand.len() > self.capacity {
            let mut set = BoneSlotSet::new(self.capacity);
            set.fill_truncated(demand);
            self.sets.push(set);
            return Placement {
                slot_set: self.sets.len() - 1,
                overflow: true,
            };
        }

        let mut best: Option<(usize, usize)> = None;
        for (index, set) in self.sets.iter().enumerate() {
            let Some(cost) = set.cost(demand) else {
                continue;
            };
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((index, cost));
            }
        }

        let slot_set = match best {
            Some((index, _)) => index,
            None => {
                self.sets.push(BoneSlotSet::new(self.capacity));
                self.sets.len() - 1
            }
        };

        let added = self.sets[slot_set].add(demand);
        debug_assert!(added, "chosen slot set must fit the demand");

        Placement {
            slot_set,
            overflow: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand(bones: &[u32]) -> BoneDemand {
        bones.iter().copied().collect()
    }

    #[test]
    fn test_first_polygon_opens_a_set() {
        let mut allocator = BoneSlotAllocator::new(4);
        assert!(allocator.is_empty());
        let placement = allocator.place(&demand(&[1, 2, 3]));
        assert_eq!(placement, Placement { slot_set: 0, overflow: false });
        assert_eq!(allocator.len(), 1);
        assert_eq!(allocator.get(0).unwrap().bones(), &[1, 2, 3]);
    }

    #[test]
    fn test_infeasible_opens_new_set() {
        let mut allocator = BoneSlotAllocator::new(4);
        allocator.place(&demand(&[1, 2, 3]));
        let placement = allocator.place(&demand(&[2, 4, 5]));
        assert_eq!(placement.slot_set, 1);
        assert!(!placement.overflow);
        assert_eq!(allocator.get(1).unwrap().bones(), &[2, 4, 5]);
        // First set untouched
        assert_eq!(allocator.get(0).unwrap().bones(), &[1, 2, 3]);
    }

    #[test]
    fn test_picks_cheapest_set() {
        let mut allocator = BoneSlotAllocator::new(4);
        allocator.place(&demand(&[1, 2, 3, 4]));
        allocator.place(&demand(&[5, 6]));
        allocator.place(&demand(&[7, 8, 9]));
        // Set 0 is full, set 1 needs two new bones, set 2 needs one
        let placement = allocator.place(&demand(&[7, 8, 5]));
        assert_eq!(placement.slot_set, 2);
        assert_eq!(allocator.get(2).unwrap().bones(), &[7, 8, 9, 5]);
        assert_eq!(allocator.get(1).unwrap().bones(), &[5, 6]);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let mut allocator = BoneSlotAllocator::new(4);
        allocator.place(&demand(&[1, 2, 3]));
        allocator.place(&demand(&[4, 5, 6, 7]));
        allocator.place(&demand(&[1, 2, 3, 8]));
        assert_eq!(allocator.len(), 2);

        let mut allocator = BoneSlotAllocator::new(3);
        allocator.place(&demand(&[1, 2]));
        allocator.place(&demand(&[3, 4, 5]));
        allocator.place(&demand(&[6, 7]));
        assert_eq!(allocator.len(), 3);
        // Sets 0 and 2 both need one new bone for {9}
        let placement = allocator.place(&demand(&[9]));
        assert_eq!(placement.slot_set, 0);
    }

    #[test]
    fn test_fully_covered_demand_costs_nothing() {
        let mut allocator = BoneSlotAllocator::new(4);
        allocator.place(&demand(&[1, 2]));
        allocator.place(&demand(&[3, 4, 5, 6]));
        let placement = allocator.place(&demand(&[4, 5]));
        assert_eq!(placement.slot_set, 1);
        assert_eq!(allocator.len(), 2);
    }

    #[test]
    fn test_feasible_demand_never_overflows() {
        let mut allocator = BoneSlotAllocator::new(4);
        for i in 0..64u32 {
            let d = demand(&[i % 7, (i * 3) % 11 + 7, (i * 5) % 13 + 20, i + 40]);
            assert!(d.len() <= 4);
            let placement = allocator.place(&d);
            assert!(!placement.overflow);
            let set = allocator.get(placement.slot_set).unwrap();
            assert!(d.iter().all(|b| set.contains(b)));
        }
        assert!(allocator.sets().iter().all(|s| s.len() <= 4));
    }

    #[test]
    fn test_overflow_is_flagged_not_fatal() {
        let mut allocator = BoneSlotAllocator::new(2);
        allocator.place(&demand(&[1]));
        let placement = allocator.place(&demand(&[4, 5, 6]));
        assert!(placement.overflow);
        assert_eq!(placement.slot_set, 1);
        assert_eq!(allocator.get(1).unwrap().bones(), &[4, 5]);
        // Existing sets are left alone
        assert_eq!(allocator.get(0).unwrap().bones(), &[1]);
    }

    #[test]
    fn test_placements_are_stable() {
        let mut allocator = BoneSlotAllocator::new(4);
        let first = allocator.place(&demand(&[1, 2]));
        let slot = allocator.get(first.slot_set).unwrap().index_of(2);
        for i in 3..20u32 {
            allocator.place(&demand(&[i, i + 1]));
        }
        assert_eq!(allocator.get(first.slot_set).unwrap().index_of(2), slot);
    }
}
