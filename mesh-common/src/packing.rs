//! Vertex data packing utilities
//!
//! Converts f32 channel data to the compact representations stored in
//! vertex records:
//! - f32 → unorm8 (unsigned normalized, 0.0 to 1.0)
//! - RGBA f32 → single float holding four unorm8 bytes

/// Mask applied to packed colors so the resulting float is never NaN or
/// infinite (the lowest alpha bit is dropped).
pub const PACKED_COLOR_MASK: u32 = 0xfeff_ffff;

/// Convert f32 to unsigned normalized 8-bit integer (unorm8)
///
/// Maps f32 range [0.0, 1.0] to u8 range [0, 255].
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0) as u8
}

/// Pack an RGBA color (f32x4) to Unorm8x4 format
#[inline]
pub fn pack_color_rgba_unorm8(r: f32, g: f32, b: f32, a: f32) -> [u8; 4] {
    [
        f32_to_unorm8(r),
        f32_to_unorm8(g),
        f32_to_unorm8(b),
        f32_to_unorm8(a),
    ]
}

/// Pack an RGBA color into the bit pattern of a single float.
///
/// Byte order (low to high): red, green, blue, alpha.
#[inline]
pub fn pack_color_float(r: f32, g: f32, b: f32, a: f32) -> f32 {
    let bits = u32::from_le_bytes(pack_color_rgba_unorm8(r, g, b, a));
    f32::from_bits(bits & PACKED_COLOR_MASK)
}

/// Unpack a color produced by [`pack_color_float`] into RGBA bytes
#[inline]
pub fn unpack_color_float(packed: f32) -> [u8; 4] {
    packed.to_bits().to_le_bytes()
}
