// src/common/codec.rs

//! Float layout of the measurement response.
//!
//! The four bytes of a value are gathered in fully reversed order and the
//! result is read back as a little-endian `binary32`, the same bits a
//! byte-reversing copy into a float produces on a little-endian MCU.

/// Number of bytes one encoded float occupies.
pub const FLOAT_LEN: usize = 4;

/// Decodes the float stored in `buffer[offset..offset + 4]`.
///
/// # Panics
///
/// Panics if `offset + 4` exceeds `buffer.len()`. Callers size their buffers
/// for the response they asked for, so this is a programming error.
#[inline]
pub fn decode_float(buffer: &[u8], offset: usize) -> f32 {
    let b = &buffer[offset..offset + FLOAT_LEN];
    f32::from_le_bytes([b[3], b[2], b[1], b[0]])
}

/// Inverse of [`decode_float`]: lays `value` out the way the decoder expects it.
#[inline]
pub fn encode_float(value: f32) -> [u8; FLOAT_LEN] {
    let [b0, b1, b2, b3] = value.to_le_bytes();
    [b3, b2, b1, b0]
}
