//! Types for mesh conversion

use mesh_common::MeshData;

use crate::diagnostics::Diagnostics;

/// Result of converting one source mesh
#[derive(Debug, Clone)]
pub struct ConvertedMesh {
    /// Deduplicated vertices and their parts
    pub mesh: MeshData,
    /// Data-quality problems found along the way
    pub diagnostics: Diagnostics,
}

impl ConvertedMesh {
    pub fn id(&self) -> &str {
        &self.mesh.id
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }
}
