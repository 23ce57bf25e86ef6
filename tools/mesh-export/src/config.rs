//! Export configuration (`export.toml`)
//!
//! ```toml
//! max_blend_weights = 4
//! force_max_blend_weights = true
//! packed_colors = false
//! max_bones_per_part = 12
//! max_uv_channels = 8
//! ```
//!
//! Every field is optional. Values beyond the hard limits are clamped rather
//! than rejected.

use mesh_common::{MAX_BLEND_WEIGHTS, MAX_BONES_PER_PART, MAX_UV_CHANNELS};
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Mesh export settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Maximum blend weights per vertex.
    /// Zero disables skinning.
    /// Default: 4
    #[serde(default = "default_max_blend_weights")]
    pub max_blend_weights: usize,

    /// Emit `max_blend_weights` slot indices and weights per vertex even
    /// when every control point has fewer influences.
    /// Default: true
    #[serde(default = "default_force_max_blend_weights")]
    pub force_max_blend_weights: bool,

    /// Pack RGBA colors into a single float.
    /// Default: false
    #[serde(default)]
    pub packed_colors: bool,

    /// Bone slots per mesh part (shader uniform capacity, hard limit 64).
    /// Zero disables skinning.
    /// Default: 12
    #[serde(default = "default_max_bones_per_part")]
    pub max_bones_per_part: usize,

    /// UV channels to export (hard limit 8).
    /// Default: 8
    #[serde(default = "default_max_uv_channels")]
    pub max_uv_channels: usize,
}

fn default_max_blend_weights() -> usize {
    4
}

fn default_force_max_blend_weights() -> bool {
    true
}

fn default_max_bones_per_part() -> usize {
    12
}

fn default_max_uv_channels() -> usize {
    MAX_UV_CHANNELS
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_blend_weights: default_max_blend_weights(),
            force_max_blend_weights: default_force_max_blend_weights(),
            packed_colors: false,
            max_bones_per_part: default_max_bones_per_part(),
            max_uv_channels: default_max_uv_channels(),
        }
    }
}

impl ExportConfig {
    /// Parse a TOML config string
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.clamped())
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Apply the hard limits (UV channels, blend weights, bones per part)
    pub fn clamped(mut self) -> Self {
        if self.max_uv_channels > MAX_UV_CHANNELS {
            tracing::debug!(
                "Clamping max_uv_channels {} to {}",
                self.max_uv_channels,
                MAX_UV_CHANNELS
            );
            self.max_uv_channels = MAX_UV_CHANNELS;
        }
        if self.max_blend_weights > MAX_BLEND_WEIGHTS {
            tracing::debug!(
                "Clamping max_blend_weights {} to {}",
                self.max_blend_weights,
                MAX_BLEND_WEIGHTS
            );
            self.max_blend_weights = MAX_BLEND_WEIGHTS;
        }
        if self.max_bones_per_part > MAX_BONES_PER_PART {
            tracing::debug!(
                "Clamping max_bones_per_part {} to {}",
                self.max_bones_per_part,
                MAX_BONES_PER_PART
            );
            self.max_bones_per_part = MAX_BONES_PER_PART;
        }
        self
    }

    /// Whether skinning is enabled at all
    pub fn skinning_enabled(&self) -> bool {
        self.max_blend_weights > 0 && self.max_bones_per_part > 0
    }
}
