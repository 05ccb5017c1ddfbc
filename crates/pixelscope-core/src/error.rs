//! Error types for pixelscope-core operations.
//!
//! One error enum covers the faults a display transform can hit:
//! - Buffer shape problems (wrong sample count, zero channels, mismatched sizes)
//! - Degenerate scale factors handed to coordinate math
//! - Region and pixel lookups outside the image
//!
//! Most viewport math guards its inputs instead of failing, so
//! [`Error::DegenerateScale`] only surfaces through the `checked_*` helpers.
//!
//! # Usage
//!
//! ```rust
//! use pixelscope_core::{Error, Result};
//!
//! fn require_channels(channels: usize) -> Result<()> {
//!     if channels == 0 {
//!         return Err(Error::invalid_shape("buffer has no channels"));
//!     }
//!     Ok(())
//! }
//! assert!(require_channels(0).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transforming pixel buffers or viewport state.
///
/// # Categories
///
/// - **Shape errors**: [`InvalidBufferShape`](Error::InvalidBufferShape)
/// - **Scale errors**: [`DegenerateScale`](Error::DegenerateScale)
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds), [`InvalidRegion`](Error::InvalidRegion)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Buffer rank, length or channel count does not fit the operation.
    ///
    /// Covers sample vectors whose length is not `height * width * channels`,
    /// zero-channel buffers and pairs of buffers with different shapes.
    #[error("invalid buffer shape: {reason}")]
    InvalidBufferShape {
        /// What was wrong with the shape
        reason: String,
    },

    /// A scale factor was zero, negative or not finite.
    ///
    /// Coordinate helpers substitute `1.0` instead of returning this; it is
    /// only produced by explicitly checked conversions.
    #[error("degenerate scale factor {scale}")]
    DegenerateScale {
        /// The rejected scale
        scale: f64,
    },

    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i64,
        /// Y coordinate that was out of bounds
        y: i64,
        /// Image width
        width: usize,
        /// Image height
        height: usize,
    },

    /// Region of interest does not overlap the image.
    #[error("region ({rx}, {ry}, {rw}x{rh}) does not overlap image {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: usize,
        /// Image height
        height: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidBufferShape`] error.
    #[inline]
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidBufferShape {
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DegenerateScale`] error.
    #[inline]
    pub fn degenerate_scale(scale: f64) -> Self {
        Self::DegenerateScale { scale }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i64, y: i64, width: usize, height: usize) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rect: crate::Rect, width: usize, height: usize) -> Self {
        Self::InvalidRegion {
            rx: rect.x,
            ry: rect.y,
            rw: rect.width,
            rh: rect.height,
            width,
            height,
        }
    }

    /// Returns `true` if this is a shape error.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::InvalidBufferShape { .. })
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;

    #[test]
    fn test_invalid_shape_message() {
        let err = Error::invalid_shape("expected 12 samples, got 10");
        assert!(err.to_string().contains("12 samples"));
        assert!(err.is_shape_error());
        assert!(!err.is_bounds_error());
    }

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(-1, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("-1"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_region() {
        let err = Error::invalid_region(Rect::new(100, 100, 10, 10), 50, 50);
        assert!(err.to_string().contains("100, 100, 10x10"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_degenerate_scale() {
        let err = Error::degenerate_scale(0.0);
        assert_eq!(err, Error::DegenerateScale { scale: 0.0 });
    }
}
