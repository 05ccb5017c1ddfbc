//! Bit-shift display transform for integer images.
//!
//! Shifting is always recomputed from the stored original, never from the
//! previously shifted output, so stepping `+1` then `-1` returns exactly to
//! the original view instead of compounding clip loss.
//!
//! ```text
//! shift >= 0:  out = clip(original << shift, 0, 255)
//! shift <  0:  out = clip(original >> -shift, 0, 255)
//! ```

use pixelscope_core::{AnyBuffer, PixelBuffer, Sample};
use tracing::trace;

/// Integer samples that can be bit-shifted.
pub trait ShiftSample: Sample {
    /// Widen to `u64` for shifting.
    fn to_bits(self) -> u64;
}

impl ShiftSample for u8 {
    #[inline]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }
}

impl ShiftSample for u16 {
    #[inline]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }
}

/// Shifts one value and clips it to 8 bits.
#[inline]
pub fn shift_value(value: u64, shift: i32) -> u8 {
    let shifted = if shift >= 0 {
        // Anything non-zero shifted by 32+ saturates regardless.
        let s = shift.unsigned_abs().min(32);
        value << s
    } else {
        value.checked_shr(shift.unsigned_abs()).unwrap_or(0)
    };
    shifted.min(255) as u8
}

/// Shifts every sample of `original` by `shift` bits and clips to 8 bits.
///
/// # Example
///
/// ```rust
/// use pixelscope_core::PixelBuffer;
/// use pixelscope_ops::bitshift::apply_bit_shift;
///
/// let original = PixelBuffer::gray(1, 1, vec![200u8]).unwrap();
/// assert_eq!(apply_bit_shift(&original, 1).data(), &[255]);
/// assert_eq!(apply_bit_shift(&original, -1).data(), &[100]);
/// ```
pub fn apply_bit_shift<T: ShiftSample>(original: &PixelBuffer<T>, shift: i32) -> PixelBuffer<u8> {
    trace!(shift, kind = ?original.kind(), "apply_bit_shift");
    original.map(|v| shift_value(v.to_bits(), shift))
}

/// [`apply_bit_shift`] for a run-time tagged buffer.
///
/// Returns `None` for float buffers, which have no bit representation to
/// shift.
pub fn apply_bit_shift_any(original: &AnyBuffer, shift: i32) -> Option<PixelBuffer<u8>> {
    match original {
        AnyBuffer::U8(b) => Some(apply_bit_shift(b, shift)),
        AnyBuffer::U16(b) => Some(apply_bit_shift(b, shift)),
        AnyBuffer::F32(_) => None,
    }
}
