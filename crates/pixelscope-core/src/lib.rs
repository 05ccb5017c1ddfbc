//! # pixelscope-core
//!
//! Core types shared by the PixelScope crates.
//!
//! - [`PixelBuffer`] - `height x width x channels` sample buffer, generic over [`Sample`]
//! - [`AnyBuffer`] - run-time tagged buffer for images of mixed bit depth
//! - [`Rect`] - region of interest in image coordinates
//! - [`Error`] / [`Result`] - shared error taxonomy
//!
//! ## Crate Structure
//!
//! ```text
//! pixelscope-core (this crate)
//!    ^
//!    +-- pixelscope-ops  (brightness, channels, bit shift, analysis)
//!    +-- pixelscope-view (viewport math, session state)
//!    +-- pixelscope-cli
//! ```
//!
//! Buffers are never mutated in place by the transforms built on top of this
//! crate; every operation returns a new buffer.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod rect;

pub use buffer::{AnyBuffer, PixelBuffer, Sample, SampleKind};
pub use error::{Error, Result};
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// ```
/// use pixelscope_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{AnyBuffer, PixelBuffer, Sample, SampleKind};
    pub use crate::error::{Error, Result};
    pub use crate::rect::Rect;
}
