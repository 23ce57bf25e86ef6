//! Error type for mesh export
//!
//! Data-quality problems (zero weights, polygons without a material, bone
//! overflow) are not errors; they are recorded as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s and conversion continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid source JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Format(#[from] mesh_common::FormatError),

    #[error("Vertex size must be greater than zero")]
    InvalidVertexSize,

    #[error("Mesh '{mesh}': polygon {polygon} references control point {point}, but the mesh has {count}")]
    InvalidControlPoint {
        mesh: String,
        polygon: usize,
        point: usize,
        count: usize,
    },

    #[error("Mesh '{mesh}': polygon {polygon} has no corners")]
    EmptyPolygon { mesh: String, polygon: usize },

    #[error("Conversion cancelled before mesh '{0}'")]
    Cancelled(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
