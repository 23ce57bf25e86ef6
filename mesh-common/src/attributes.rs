//! Vertex attribute layout
//!
//! An [`AttributeSet`] describes which channels an interleaved vertex record
//! contains and therefore its size in floats. One layout applies to a whole
//! mesh.
//!
//! Channel order inside a record is fixed:
//! Position → Normal → Color | ColorPacked → Tangent → Binormal → UV0..UV7 → Blend
//!
//! The blend channel holds `n` bone slot indices followed by `n` weights,
//! where `n` is the blend weight count.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Attribute Flags
// ============================================================================

/// Attribute flag: Position (3 floats)
pub const ATTR_POSITION: u32 = 1;
/// Attribute flag: Normal (3 floats)
pub const ATTR_NORMAL: u32 = 1 << 1;
/// Attribute flag: RGBA color (4 floats)
pub const ATTR_COLOR: u32 = 1 << 2;
/// Attribute flag: RGBA color packed into a single float
pub const ATTR_COLOR_PACKED: u32 = 1 << 3;
/// Attribute flag: Tangent (3 floats)
pub const ATTR_TANGENT: u32 = 1 << 4;
/// Attribute flag: Binormal (3 floats)
pub const ATTR_BINORMAL: u32 = 1 << 5;
/// Attribute flag: first UV channel; channel `n` is `ATTR_TEXCOORD0 << n`
pub const ATTR_TEXCOORD0: u32 = 1 << 6;
/// Attribute flag: bone slot indices and weights
pub const ATTR_BLEND_INFO: u32 = 1 << 14;

/// Hard limit on UV channels per vertex
pub const MAX_UV_CHANNELS: usize = 8;
/// Hard limit on blend weights per vertex
pub const MAX_BLEND_WEIGHTS: usize = 8;
/// Hard limit on bone slots per mesh part
pub const MAX_BONES_PER_PART: usize = 64;

/// Floats per position
pub const POSITION_SIZE: usize = 3;
/// Floats per normal
pub const NORMAL_SIZE: usize = 3;
/// Floats per unpacked color
pub const COLOR_SIZE: usize = 4;
/// Floats per packed color
pub const COLOR_PACKED_SIZE: usize = 1;
/// Floats per tangent
pub const TANGENT_SIZE: usize = 3;
/// Floats per binormal
pub const BINORMAL_SIZE: usize = 3;
/// Floats per UV channel
pub const UV_SIZE: usize = 2;
/// Floats per blend weight (one in the index block, one in the weight block)
pub const BLEND_WEIGHT_SIZE: usize = 2;

const UV_MASK: u32 = 0xff << 6;

/// Errors produced when decoding an attribute list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Unknown vertex attribute usage: {0}")]
    UnknownUsage(String),

    #[error("COLOR and COLORPACKED are mutually exclusive")]
    ConflictingColors,

    #[error("Vertex attributes must include POSITION")]
    MissingPosition,

    #[error("Vertex attribute {0} is not contiguous")]
    NotContiguous(String),

    #[error("BLENDINDICES and BLENDWEIGHTS must be present together with the same count")]
    MismatchedBlend,
}

/// Set of vertex channels plus the blend weight count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct AttributeSet {
    flags: u32,
    blend_weights: u8,
}

impl AttributeSet {
    /// Layout with only a position channel
    pub const fn position_only() -> Self {
        Self {
            flags: ATTR_POSITION,
            blend_weights: 0,
        }
    }

    /// Raw flag bits
    #[inline]
    pub const fn flags(&self) -> u32 {
        self.flags
    }

    #[inline]
    pub const fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Enable or disable a single flag.
    ///
    /// Color flags go through [`AttributeSet::set_color`] and UV/blend flags
    /// through their dedicated setters so the layout invariants hold.
    pub fn set(&mut self, flag: u32, enabled: bool) {
        debug_assert!(flag & (ATTR_COLOR | ATTR_COLOR_PACKED | UV_MASK | ATTR_BLEND_INFO) == 0);
        if enabled {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Enable a color channel (packed or not), or disable both
    pub fn set_color(&mut self, enabled: bool, packed: bool) {
        self.flags &= !(ATTR_COLOR | ATTR_COLOR_PACKED);
        if enabled {
            self.flags |= if packed { ATTR_COLOR_PACKED } else { ATTR_COLOR };
        }
    }

    /// Enable the first `count` UV channels (clamped to [`MAX_UV_CHANNELS`])
    pub fn set_uv_channels(&mut self, count: usize) {
        let count = count.min(MAX_UV_CHANNELS);
        self.flags &= !UV_MASK;
        for channel in 0..count {
            self.flags |= ATTR_TEXCOORD0 << channel;
        }
    }

    /// Number of UV channels
    pub const fn uv_channels(&self) -> usize {
        ((self.flags & UV_MASK) >> 6).count_ones() as usize
    }

    /// Set the blend weights per vertex (clamped to [`MAX_BLEND_WEIGHTS`]).
    /// Zero disables the blend channel.
    pub fn set_blend_weights(&mut self, count: usize) {
        let count = count.min(MAX_BLEND_WEIGHTS);
        self.blend_weights = count as u8;
        if count > 0 {
            self.flags |= ATTR_BLEND_INFO;
        } else {
            self.flags &= !ATTR_BLEND_INFO;
        }
    }

    /// Blend weights per vertex
    pub const fn blend_weights(&self) -> usize {
        self.blend_weights as usize
    }

    /// Size of one vertex record in floats
    pub const fn vertex_size(&self) -> usize {
        let mut size = 0;

        if self.has(ATTR_POSITION) {
            size += POSITION_SIZE;
        }
        if self.has(ATTR_NORMAL) {
            size += NORMAL_SIZE;
        }
        if self.has(ATTR_COLOR) {
            size += COLOR_SIZE;
        }
        if self.has(ATTR_COLOR_PACKED) {
            size += COLOR_PACKED_SIZE;
        }
        if self.has(ATTR_TANGENT) {
            size += TANGENT_SIZE;
        }
        if self.has(ATTR_BINORMAL) {
            size += BINORMAL_SIZE;
        }
        size += self.uv_channels() * UV_SIZE;
        size += self.blend_weights() * BLEND_WEIGHT_SIZE;

        size
    }

    /// Attribute usage names in record order, e.g. `["POSITION", "TEXCOORD0"]`
    pub fn usages(&self) -> Vec<String> {
        let mut usages = Vec::new();
        let fixed = [
            (ATTR_POSITION, "POSITION"),
            (ATTR_NORMAL, "NORMAL"),
            (ATTR_COLOR, "COLOR"),
            (ATTR_COLOR_PACKED, "COLORPACKED"),
            (ATTR_TANGENT, "TANGENT"),
            (ATTR_BINORMAL, "BINORMAL"),
        ];
        for (flag, name) in fixed {
            if self.has(flag) {
                usages.push(name.to_string());
            }
        }
        for channel in 0..self.uv_channels() {
            usages.push(format!("TEXCOORD{}", channel));
        }
        if self.blend_weights() > 0 {
            usages.push(format!("BLENDINDICES{}", self.blend_weights()));
            usages.push(format!("BLENDWEIGHTS{}", self.blend_weights()));
        }
        usages
    }

    /// Parse a usage list produced by [`AttributeSet::usages`]
    pub fn from_usages<S: AsRef<str>>(usages: &[S]) -> Result<Self, AttributeError> {
        let mut set = Self::default();
        let mut uv_channels = 0;
        let mut blend_indices = None;
        let mut blend_weights = None;

        for usage in usages {
            let usage = usage.as_ref();
            match usage {
                "POSITION" => set.flags |= ATTR_POSITION,
                "NORMAL" => set.flags |= ATTR_NORMAL,
                "COLOR" => set.flags |= ATTR_COLOR,
                "COLORPACKED" => set.flags |= ATTR_COLOR_PACKED,
                "TANGENT" => set.flags |= ATTR_TANGENT,
                "BINORMAL" => set.flags |= ATTR_BINORMAL,
                _ => {
                    if let Some(n) = parse_indexed(usage, "TEXCOORD", MAX_UV_CHANNELS) {
                        if n != uv_channels {
                            return Err(AttributeError::NotContiguous(usage.to_string()));
                        }
                        uv_channels += 1;
                    } else if let Some(n) = parse_blend_count(usage, "BLENDINDICES") {
                        blend_indices = Some(n);
                    } else if let Some(n) = parse_blend_count(usage, "BLENDWEIGHTS") {
                        blend_weights = Some(n);
                    } else {
                        return Err(AttributeError::UnknownUsage(usage.to_string()));
                    }
                }
            }
        }

        if set.has(ATTR_COLOR) && set.has(ATTR_COLOR_PACKED) {
            return Err(AttributeError::ConflictingColors);
        }
        if !set.has(ATTR_POSITION) {
            return Err(AttributeError::MissingPosition);
        }

        let blend_weights = match (blend_indices, blend_weights) {
            (None, None) => 0,
            (Some(i), Some(w)) if i == w => w,
            _ => return Err(AttributeError::MismatchedBlend),
        };

        set.set_uv_channels(uv_channels);
        set.set_blend_weights(blend_weights);
        Ok(set)
    }
}

fn parse_indexed(usage: &str, prefix: &str, limit: usize) -> Option<usize> {
    usage
        .strip_prefix(prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n < limit)
}

fn parse_blend_count(usage: &str, prefix: &str) -> Option<usize> {
    usage
        .strip_prefix(prefix)
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| (1..=MAX_BLEND_WEIGHTS).contains(&n))
}

impl From<AttributeSet> for Vec<String> {
    fn from(set: AttributeSet) -> Self {
        set.usages()
    }
}

impl TryFrom<Vec<String>> for AttributeSet {
    type Error = AttributeError;

    fn try_from(usages: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_usages(&usages)
    }
}
