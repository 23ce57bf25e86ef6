//! Parallel conversion of many meshes
//!
//! Meshes are independent, so each one is converted on the rayon pool with
//! its own diagnostics. A shared cancel flag is checked before every mesh;
//! a conversion already running is never interrupted.

use mesh_common::ModelData;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::diagnostics::Diagnostics;
use crate::error::{ExportError, Result};
use crate::mesh::{ConvertedMesh, MeshBuilder, mesh_id};
use crate::source::MeshSource;

/// Output of a batch conversion
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub model: ModelData,
    /// Diagnostics per mesh, in source order
    pub diagnostics: Vec<Diagnostics>,
}

impl BatchOutput {
    /// Total number of diagnostics across all meshes
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.iter().map(Diagnostics::len).sum()
    }
}

/// Mesh ids for a batch: names longer than one character are kept, the rest
/// are numbered `shape1`, `shape2`... in source order
pub fn assign_mesh_ids<S: MeshSource>(sources: &[S]) -> Vec<String> {
    let mut shapes = 0;
    sources
        .iter()
        .map(|source| {
            if source.name().chars().count() > 1 {
                return source.name().to_string();
            }
            shapes += 1;
            mesh_id(source.name(), shapes)
        })
        .collect()
}

/// Convert every mesh in parallel.
///
/// Fails on the first structural error. Setting `cancel` makes every mesh
/// not yet started fail with [`ExportError::Cancelled`].
pub fn convert_all<S: MeshSource + Sync>(
    builder: &MeshBuilder,
    sources: &[S],
    cancel: &AtomicBool,
) -> Result<BatchOutput> {
    let ids = assign_mesh_ids(sources);

    let converted: Result<Vec<ConvertedMesh>> = sources
        .par_iter()
        .zip(ids.par_iter())
        .map(|(source, id)| {
            if cancel.load(Ordering::Relaxed) {
                return Err(ExportError::Cancelled(id.clone()));
            }
            builder.clone().with_mesh_id(id.as_str()).build(source)
        })
        .collect();
    let converted = converted?;

    let mut meshes = Vec::with_capacity(converted.len());
    let mut diagnostics = Vec::with_capacity(converted.len());
    for c in converted {
        meshes.push(c.mesh);
        diagnostics.push(c.diagnostics);
    }

    let output = BatchOutput {
        model: ModelData::new(meshes),
        diagnostics,
    };

    tracing::info!(
        "Converted {} meshes ({} diagnostics)",
        output.model.meshes.len(),
        output.diagnostic_count()
    );

    Ok(output)
}
