//! # pixelscope-ops
//!
//! Display transforms and image analysis for the PixelScope viewer.
//!
//! Every function here is pure: it reads a [`PixelBuffer`](pixelscope_core::PixelBuffer)
//! and returns a new one (or plain numbers), so results can be recomputed
//! freely from the stored original whenever a parameter changes.
//!
//! # Modules
//!
//! - [`brightness`] - offset / gain / saturation remap to 8-bit display range
//! - [`channels`] - channel visibility, reconciliation and colour composite
//! - [`bitshift`] - bit-shift view of integer images
//! - [`analysis`] - histograms, intensity profiles, statistics, CSV export
//! - [`diff`] - `a - b + offset` difference images
//!
//! # Example
//!
//! ```rust
//! use pixelscope_core::PixelBuffer;
//! use pixelscope_ops::{apply_brightness, select_channels, BrightnessParams, ChannelSelection};
//!
//! let rgb = PixelBuffer::from_vec(1, 1, 3, vec![10u16, 500, 1023]).unwrap();
//! let rb = select_channels(&rgb, &ChannelSelection::from(vec![true, false, true])).unwrap();
//! let shown = apply_brightness(&rb, &BrightnessParams::new(0.0, 1.0, 1023.0));
//! assert_eq!(shown.as_u8().unwrap().data(), &[2, 255]);
//! ```
//!
//! # Features
//!
//! - `parallel` - run the brightness remap over rows with rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod bitshift;
pub mod brightness;
pub mod channels;
pub mod diff;

pub use analysis::{ChannelStats, Orientation, Series, Summary};
pub use bitshift::{apply_bit_shift, apply_bit_shift_any};
pub use brightness::{
    BrightnessMemory, BrightnessParams, apply_brightness, apply_brightness_any, brightness_lut,
};
pub use channels::{ChannelColors, ChannelSelection, composite_channels, select_channels};
pub use diff::{DEFAULT_DIFF_OFFSET, difference, difference_any};
