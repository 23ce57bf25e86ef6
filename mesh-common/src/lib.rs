//! Shared types and utilities for the Nethercore mesh exporter
//!
//! This crate provides the data shared between the exporter and anything that
//! consumes its output:
//!
//! # Modules
//!
//! - [`attributes`] - Vertex attribute layout (channels, record size)
//! - [`packing`] - Vertex channel packing (f32 → unorm8, packed colors)
//! - [`formats`] - Exported model types and their JSON reader/writer

pub mod attributes;
pub mod formats;
pub mod packing;

// Re-export commonly used attribute items
pub use attributes::{
    ATTR_BINORMAL, ATTR_BLEND_INFO, ATTR_COLOR, ATTR_COLOR_PACKED, ATTR_NORMAL, ATTR_POSITION,
    ATTR_TANGENT, ATTR_TEXCOORD0, AttributeError, AttributeSet, MAX_BLEND_WEIGHTS, MAX_BONES_PER_PART,
    MAX_UV_CHANNELS,
};

// Re-export commonly used packing items
pub use packing::{f32_to_unorm8, pack_color_float, pack_color_rgba_unorm8, unpack_color_float};

// Re-export commonly used format items
pub use formats::{
    FormatError, MODEL_EXT, MODEL_FORMAT_VERSION, MeshData, MeshPartData, ModelData, UvBounds,
    read_model, write_model,
};
