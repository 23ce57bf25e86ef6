//! Skinning: blend weights and bone slot packing

mod allocator;
mod bones;
mod weights;

pub use allocator::{BoneSlotAllocator, Placement};
pub use bones::{BoneDemand, BoneSlotSet};
pub use weights::{BlendWeight, BlendWeights, normalize_point_weights};
