//! Exported mesh model
//!
//! A [`MeshData`] is the engine-ready result of converting one source mesh:
//! a single interleaved float vertex buffer shared by every part, and a list
//! of parts that index into it.
//!
//! # Layout
//! ```text
//! MeshData
//!   attributes   usage list (see `AttributeSet`)
//!   vertex_size  floats per vertex
//!   vertices     vertex_count * vertex_size floats
//!   parts[]      indices into `vertices`, per-UV bounds, slot -> bone table
//! ```

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeSet;

/// Axis-aligned bounds of one UV channel within one mesh part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvBounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvBounds {
    /// Bounds containing a single UV coordinate
    pub fn from_point(uv: [f32; 2]) -> Self {
        Self { min: uv, max: uv }
    }

    /// Grow the bounds to contain `uv`
    pub fn include(&mut self, uv: [f32; 2]) {
        for axis in 0..2 {
            if uv[axis] < self.min[axis] {
                self.min[axis] = uv[axis];
            }
            if uv[axis] > self.max[axis] {
                self.max[axis] = uv[axis];
            }
        }
    }

    /// Grow optional bounds, initializing them on first use
    pub fn extend(bounds: &mut Option<Self>, uv: [f32; 2]) {
        match bounds {
            Some(b) => b.include(uv),
            None => *bounds = Some(Self::from_point(uv)),
        }
    }
}

/// One independently indexed part of a mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPartData {
    /// Part identifier, unique within the model
    pub id: String,
    /// Material index the part's polygons were assigned to
    pub material_index: u32,
    /// Index of the bone slot set within the material (0 when unskinned)
    pub bone_set: u32,
    /// Vertex indices, polygon corners in source order
    pub indices: Vec<u32>,
    /// Polygon sizes, in the same order as `indices`
    pub polygon_sizes: Vec<u32>,
    /// Bounds per UV channel; `None` when the part has no UVs in that channel
    #[serde(default)]
    pub uv_bounds: Vec<Option<UvBounds>>,
    /// Bone table: slot -> source bone identifier
    #[serde(default)]
    pub bones: Vec<u32>,
}

impl MeshPartData {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygon_sizes.len()
    }
}

/// A converted mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub id: String,
    pub attributes: AttributeSet,
    /// Floats per vertex; always `attributes.vertex_size()`
    pub vertex_size: u32,
    pub vertices: Vec<f32>,
    pub parts: Vec<MeshPartData>,
    /// Source UV set names, one per UV channel
    #[serde(default)]
    pub uv_mapping: Vec<String>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        if self.vertex_size == 0 {
            return 0;
        }
        self.vertices.len() / self.vertex_size as usize
    }

    pub fn index_count(&self) -> usize {
        self.parts.iter().map(MeshPartData::index_count).sum()
    }

    /// Floats of vertex `index`, if it exists
    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let size = self.vertex_size as usize;
        let start = index.checked_mul(size)?;
        self.vertices.get(start..start + size)
    }

    pub fn part(&self, id: &str) -> Option<&MeshPartData> {
        self.parts.iter().find(|p| p.id == id)
    }
}
