//! mesh-export library
//!
//! Converts polygon meshes into deduplicated, interleaved vertex buffers split
//! into parts, with per-part bone tables sized for shader uniforms.
//!
//! ```no_run
//! use mesh_export::{ExportConfig, MeshBuilder, SourceScene};
//!
//! # fn main() -> mesh_export::Result<()> {
//! let scene = SourceScene::from_reader(std::fs::File::open("scene.json")?)?;
//! let builder = MeshBuilder::new(ExportConfig::default());
//! for source in &scene.meshes {
//!     let converted = builder.build(source)?;
//!     println!("{}: {} vertices", converted.id(), converted.vertex_count());
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod mesh;
pub mod skin;
pub mod source;

pub use batch::{BatchOutput, convert_all};
pub use config::ExportConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ExportError, Result};
pub use mesh::{ConvertedMesh, MeshBuilder, VertexBuffer, convert_mesh};
pub use source::{MeshSource, SourceMesh, SourceScene};

// Re-export the output model from mesh-common
pub use mesh_common::{AttributeSet, MeshData, MeshPartData, ModelData, UvBounds};
