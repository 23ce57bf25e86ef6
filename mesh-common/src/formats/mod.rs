//! Exported model formats
//!
//! The converter produces a [`ModelData`] holding one [`MeshData`] per source
//! mesh. Models are stored as JSON; the reader checks the format version.

pub mod mesh;

pub use mesh::*;

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

/// Current model format version
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// File extension for exported models
pub const MODEL_EXT: &str = "ncmesh.json";

/// Errors while reading or writing a model
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported model format version: {0}")]
    UnsupportedVersion(u32),
}

/// A set of converted meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub version: u32,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn new(meshes: Vec<MeshData>) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            meshes,
        }
    }
}

impl Default for ModelData {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Write a model as JSON
pub fn write_model<W: Write>(mut w: W, model: &ModelData, pretty: bool) -> Result<(), FormatError> {
    if pretty {
        serde_json::to_writer_pretty(&mut w, model)?;
    } else {
        serde_json::to_writer(&mut w, model)?;
    }
    w.flush()?;
    Ok(())
}

/// Read a model written by [`write_model`]
pub fn read_model<R: Read>(r: R) -> Result<ModelData, FormatError> {
    let model: ModelData = serde_json::from_reader(r)?;
    if model.version != MODEL_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(model.version));
    }
    Ok(model)
}
