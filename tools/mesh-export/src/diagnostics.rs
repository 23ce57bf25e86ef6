//! Conversion diagnostics
//!
//! Best-effort conversion never aborts on bad source data. Each problem is
//! recorded here and logged as a warning; the caller decides what to do with
//! the list. Every conversion owns its own [`Diagnostics`], so parallel
//! conversions never share a sink.

use thiserror::Error;

/// A data-quality problem found while converting a mesh
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Control point whose blend weights sum to zero; it is left unweighted
    #[error("control point {point} has zero total blend weight, treated as unweighted")]
    ZeroWeights { point: usize },

    /// Polygon with a missing or out-of-range material index; it is dropped
    #[error("polygon {polygon} has no part (material index {material:?}), dropped")]
    NoPolygonPart {
        polygon: usize,
        material: Option<usize>,
    },

    /// Polygon referencing more distinct bones than a part can hold
    #[error("polygon {polygon} needs {required} bones but a part holds {capacity}")]
    BonesOverflow {
        polygon: usize,
        required: usize,
        capacity: usize,
    },
}

/// Diagnostic category, for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    ZeroWeights,
    NoPolygonPart,
    BonesOverflow,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::ZeroWeights { .. } => DiagnosticKind::ZeroWeights,
            Self::NoPolygonPart { .. } => DiagnosticKind::NoPolygonPart,
            Self::BonesOverflow { .. } => DiagnosticKind::BonesOverflow,
        }
    }
}

/// Diagnostics collected for one mesh
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    mesh: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            entries: Vec::new(),
        }
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("Mesh '{}': {}", self.mesh, diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn mesh(&self) -> &str {
        &self.mesh
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }
}
