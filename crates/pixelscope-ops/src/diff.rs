//! Difference images.
//!
//! `out = clip(a - b + offset, 0, 255)` per sample, computed in integer
//! arithmetic. Float samples are truncated toward zero first. With the
//! default offset of 127, equal pixels show as mid gray.

use pixelscope_core::{AnyBuffer, Error, PixelBuffer, Result, Sample, with_buffer};
use tracing::debug;

/// Offset added to every difference unless the caller picks another.
pub const DEFAULT_DIFF_OFFSET: i64 = 127;

/// Subtracts `b` from `a`, adds `offset` and clips to 8 bits.
///
/// # Errors
///
/// Returns [`Error::InvalidBufferShape`] if the buffers differ in width,
/// height or channel count.
///
/// # Example
///
/// ```rust
/// use pixelscope_core::PixelBuffer;
/// use pixelscope_ops::diff::difference;
///
/// let a = PixelBuffer::gray(3, 1, vec![10u8, 200, 0]).unwrap();
/// let b = PixelBuffer::gray(3, 1, vec![10u8, 0, 200]).unwrap();
/// assert_eq!(difference(&a, &b, 127).unwrap().data(), &[127, 255, 0]);
/// ```
pub fn difference<A: Sample, B: Sample>(
    a: &PixelBuffer<A>,
    b: &PixelBuffer<B>,
    offset: i64,
) -> Result<PixelBuffer<u8>> {
    if a.shape() != b.shape() {
        return Err(Error::invalid_shape(format!(
            "cannot diff {:?} against {:?} (height, width, channels)",
            a.shape(),
            b.shape()
        )));
    }
    debug!(shape = ?a.shape(), offset, "difference");
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&va, &vb)| {
            let d = va.to_f64() as i64 - vb.to_f64() as i64 + offset;
            d.clamp(0, 255) as u8
        })
        .collect();
    PixelBuffer::from_vec(a.width(), a.height(), a.channels(), data)
}

/// [`difference`] for run-time tagged buffers of any, possibly different, kinds.
pub fn difference_any(a: &AnyBuffer, b: &AnyBuffer, offset: i64) -> Result<PixelBuffer<u8>> {
    with_buffer!(a, pa => with_buffer!(b, pb => difference(pa, pb, offset)))
}

/// Display name for a difference image of 0-based list positions `a` and `b`.
///
/// ```rust
/// assert_eq!(pixelscope_ops::diff::diff_name(0, 2), "diff:1-3");
/// ```
pub fn diff_name(a: usize, b: usize) -> String {
    format!("diff:{}-{}", a + 1, b + 1)
}
