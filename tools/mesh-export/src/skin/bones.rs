//! Bone slot sets
//!
//! A [`BoneSlotSet`] is the fixed-capacity table of bones a mesh part hands
//! to the skinning shader. Vertex blend indices refer to slots in this table,
//! so a bone never changes slot once placed.

use smallvec::SmallVec;

/// Distinct bones required by one polygon, in encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneDemand {
    bones: SmallVec<[u32; 16]>,
}

impl BoneDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bone unless already present
    pub fn push(&mut self, bone: u32) {
        if !self.bones.contains(&bone) {
            self.bones.push(bone);
        }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.bones
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bones.iter().copied()
    }
}

impl FromIterator<u32> for BoneDemand {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut demand = Self::new();
        for bone in iter {
            demand.push(bone);
        }
        demand
    }
}

/// Fixed-capacity set of bones; occupied slots form a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneSlotSet {
    bones: SmallVec<[u32; 16]>,
    capacity: usize,
}

impl BoneSlotSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            bones: SmallVec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Occupied slots
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Free slots
    pub fn available(&self) -> usize {
        self.capacity - self.bones.len()
    }

    pub fn contains(&self, bone: u32) -> bool {
        self.bones.contains(&bone)
    }

    /// Slot holding `bone`
    pub fn index_of(&self, bone: u32) -> Option<usize> {
        self.bones.iter().position(|&b| b == bone)
    }

    /// Bone in `slot`, if occupied
    pub fn get(&self, slot: usize) -> Option<u32> {
        self.bones.get(slot).copied()
    }

    /// Bones in slot order
    pub fn bones(&self) -> &[u32] {
        &self.bones
    }

    /// Number of demanded bones not yet in the set, or `None` when they do not
    /// fit in the free slots
    pub fn cost(&self, demand: &BoneDemand) -> Option<usize> {
        let missing = demand.iter().filter(|&b| !self.contains(b)).count();
        (missing <= self.available()).then_some(missing)
    }

    /// Insert every demanded bone not yet present, in encounter order.
    ///
    /// All-or-nothing: returns `false` and leaves the set untouched when the
    /// demand does not fit.
    pub fn add(&mut self, demand: &BoneDemand) -> bool {
        if self.cost(demand).is_none() {
            return false;
        }
        for bone in demand.iter() {
            if !self.contains(bone) {
                self.bones.push(bone);
            }
        }
        true
    }

    /// Insert demanded bones in encounter order until the set is full.
    /// Returns the number of bones that did not fit.
    pub fn fill_truncated(&mut self, demand: &BoneDemand) -> usize {
        let mut rejected = 0;
        for bone in demand.iter() {
            if self.contains(bone) {
                continue;
            }
            if self.available() == 0 {
                rejected += 1;
            } else {
                self.bones.push(bone);
            }
        }
        rejected
    }
}
