//! Deduplicating vertex buffer
//!
//! Vertex records are interned: a record equal to one already stored returns
//! the existing index. A masked hash over the raw float bits picks candidate
//! records, then an exact comparison decides.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{ExportError, Result};

/// Low mantissa bits ignored by [`vertex_hash`]
const HASH_MASK: u32 = 0xffff_ff00;

/// Hash of a vertex record.
///
/// Sums each component's bits with the low 8 bits dropped, so records that
/// differ only in mantissa noise share a bucket. Both zeros hash alike, which
/// keeps `-0.0` and `0.0` comparable.
#[inline]
pub fn vertex_hash(record: &[f32]) -> u32 {
    record.iter().fold(0u32, |hash, &v| {
        let bits = if v == 0.0 { 0 } else { v.to_bits() };
        hash.wrapping_add((bits & HASH_MASK) >> 8)
    })
}

/// Component-wise equality: identical bits or IEEE-equal values
#[inline]
pub fn vertices_equal(lhs: &[f32], rhs: &[f32]) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs)
            .all(|(a, b)| a.to_bits() == b.to_bits() || a == b)
}

/// Append-only store of interleaved vertex records
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    vertex_size: usize,
    vertices: Vec<f32>,
    buckets: HashMap<u32, SmallVec<[u32; 2]>>,
}

impl VertexBuffer {
    pub fn new(vertex_size: usize) -> Result<Self> {
        if vertex_size == 0 {
            return Err(ExportError::InvalidVertexSize);
        }
        Ok(Self {
            vertex_size,
            vertices: Vec::new(),
            buckets: HashMap::new(),
        })
    }

    /// Index of `record`, appending it if no equal record is stored
    pub fn intern(&mut self, record: &[f32]) -> u32 {
        debug_assert_eq!(record.len(), self.vertex_size);

        let hash = vertex_hash(record);
        let size = self.vertex_size;
        let bucket = self.buckets.entry(hash).or_default();

        for &index in bucket.iter() {
            let start = index as usize * size;
            if vertices_equal(&self.vertices[start..start + size], record) {
                return index;
            }
        }

        let index = (self.vertices.len() / size) as u32;
        self.vertices.extend_from_slice(record);
        bucket.push(index);
        index
    }

    /// Number of distinct vertices
    pub fn len(&self) -> usize {
        self.vertices.len() / self.vertex_size
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.vertex_size)?;
        self.vertices.get(start..start + self.vertex_size)
    }

    pub fn into_vertices(self) -> Vec<f32> {
        self.vertices
    }
}
