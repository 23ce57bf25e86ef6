//! Mesh converter (source polygons -> deduplicated, partitioned vertex buffers)

mod builder;
mod parts;
mod types;
mod vertex_buffer;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::source::MeshSource;

// Re-export public API
pub use builder::{MeshBuilder, mesh_id};
pub use parts::{PartKey, PartPlan, plan_parts};
pub use types::ConvertedMesh;
pub use vertex_buffer::{VertexBuffer, vertex_hash, vertices_equal};

/// Convert a single mesh with `config`
pub fn convert_mesh<S: MeshSource + ?Sized>(source: &S, config: &ExportConfig) -> Result<ConvertedMesh> {
    MeshBuilder::new(config.clone()).build(source)
}
