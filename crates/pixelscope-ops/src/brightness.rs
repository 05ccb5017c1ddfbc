//! Linear brightness remapping for display.
//!
//! Every sample is mapped to 8-bit display range with
//!
//! ```text
//! out = clip(gain * (in - offset) / saturation * 255, 0, 255)
//! ```
//!
//! rounded to the nearest integer. `saturation` is the input level that
//! lands on full white at unit gain, `offset` the level that lands on black.
//!
//! A saturation of exactly zero disables the remap: the input buffer is
//! returned unchanged, whatever its sample type.
//!
//! Defaults depend on the sample kind, and the last parameters used for a
//! kind are remembered by [`BrightnessMemory`] so switching between an 8-bit
//! and a 16-bit image restores sensible settings for each.

use std::collections::HashMap;

use pixelscope_core::{AnyBuffer, PixelBuffer, Sample, SampleKind};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Smallest gain exponent reachable by [`snap_gain`] (`2^-7`).
pub const GAIN_LOG2_MIN: i32 = -7;

/// Largest gain exponent reachable by [`snap_gain`] (`2^10`).
pub const GAIN_LOG2_MAX: i32 = 10;

/// Offset / gain / saturation triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrightnessParams {
    /// Input level mapped to black.
    pub offset: f64,
    /// Multiplier applied after the offset.
    pub gain: f64,
    /// Input span mapped to full white at unit gain. Zero disables the remap.
    pub saturation: f64,
}

impl Default for BrightnessParams {
    fn default() -> Self {
        Self::defaults_for(SampleKind::U8)
    }
}

impl BrightnessParams {
    /// Creates a parameter set.
    pub const fn new(offset: f64, gain: f64, saturation: f64) -> Self {
        Self {
            offset,
            gain,
            saturation,
        }
    }

    /// Starting parameters for a sample kind.
    ///
    /// - `U8`: offset 0, gain 1, saturation 255 (identity)
    /// - `U16`: offset 0, gain 1, saturation 1023 (10-bit sensor range)
    /// - `F32`: offset 0, gain 1, saturation 1.0 (maps `[0, 1]` to full range)
    pub const fn defaults_for(kind: SampleKind) -> Self {
        match kind {
            SampleKind::U8 => Self::new(0.0, 1.0, 255.0),
            SampleKind::U16 => Self::new(0.0, 1.0, 1023.0),
            SampleKind::F32 => Self::new(0.0, 1.0, 1.0),
        }
    }

    /// Returns `true` when saturation is zero and the remap is skipped.
    #[inline]
    pub fn is_passthrough(&self) -> bool {
        self.saturation == 0.0
    }

    /// Returns `true` if applying these params to `kind` would change nothing
    /// a display can see.
    ///
    /// Only 8-bit input at its defaults qualifies; float and 16-bit input
    /// always need the remap to reach display range.
    pub fn is_display_identity(&self, kind: SampleKind) -> bool {
        self.is_passthrough() || (kind == SampleKind::U8 && *self == Self::defaults_for(kind))
    }

    /// Maps one input level to an 8-bit display value.
    ///
    /// Callers must check [`is_passthrough`](Self::is_passthrough) first.
    #[inline]
    pub fn map(&self, value: f64) -> u8 {
        let v = self.gain * (value - self.offset) / self.saturation * 255.0;
        // NaN casts to 0.
        v.clamp(0.0, 255.0).round() as u8
    }

    /// Halves (`amount < 0`) or doubles (`amount >= 0`) the gain.
    pub fn step_gain(&self, amount: i32) -> Self {
        let gain = if amount < 0 { self.gain * 0.5 } else { self.gain * 2.0 };
        Self { gain, ..*self }
    }

    /// Status-bar text, e.g. `Offset: 0 Gain: 2.00 Sat: 255`.
    pub fn status_label(&self, kind: SampleKind) -> String {
        if kind.is_float() {
            format!(
                "Offset: {:.5} Gain: {} Sat: {:.5}",
                self.offset,
                format_gain(self.gain),
                self.saturation
            )
        } else {
            format!(
                "Offset: {} Gain: {} Sat: {}",
                self.offset as i64,
                format_gain(self.gain),
                self.saturation as i64
            )
        }
    }
}

/// Formats a gain with precision that scales with its magnitude.
pub fn format_gain(gain: f64) -> String {
    if gain < 0.01 {
        format!("{gain:.6}")
    } else if gain < 0.1 {
        format!("{gain:.5}")
    } else if gain >= 100.0 {
        format!("{gain:.1}")
    } else {
        format!("{gain:.2}")
    }
}

/// Rounds a gain to the nearest power of two in `2^GAIN_LOG2_MIN ..= 2^GAIN_LOG2_MAX`.
///
/// Non-positive input snaps to 1.0. An exponent exactly half-way between two
/// integers rounds to the even one.
pub fn snap_gain(gain: f64) -> f64 {
    snap_gain_within(gain, GAIN_LOG2_MIN, GAIN_LOG2_MAX)
}

/// [`snap_gain`] with explicit exponent bounds.
pub fn snap_gain_within(gain: f64, log2_min: i32, log2_max: i32) -> f64 {
    if gain <= 0.0 || !gain.is_finite() {
        return 1.0;
    }
    let exp = (gain.log2().round_ties_even() as i32).clamp(log2_min, log2_max);
    2f64.powi(exp)
}

/// Applies the brightness remap to every sample.
///
/// Output is always 8-bit unless `params.saturation == 0`, in which case the
/// input is returned unchanged in its own sample type.
///
/// # Example
///
/// ```rust
/// use pixelscope_core::PixelBuffer;
/// use pixelscope_ops::brightness::{apply_brightness, BrightnessParams};
///
/// let buf = PixelBuffer::gray(2, 1, vec![100u16, 2000]).unwrap();
/// let out = apply_brightness(&buf, &BrightnessParams::new(0.0, 1.0, 1000.0));
/// assert_eq!(out.as_u8().unwrap().data(), &[26, 255]);
/// ```
pub fn apply_brightness<T: Sample>(buffer: &PixelBuffer<T>, params: &BrightnessParams) -> AnyBuffer
where
    PixelBuffer<T>: Into<AnyBuffer>,
{
    let (h, w, c) = buffer.shape();
    trace!(width = w, height = h, channels = c, ?params, "apply_brightness");
    if params.is_passthrough() {
        trace!("zero saturation, passing input through");
        return buffer.clone().into();
    }
    let p = *params;
    #[cfg(feature = "parallel")]
    let out = buffer.par_map(move |v| p.map(v.to_f64()));
    #[cfg(not(feature = "parallel"))]
    let out = buffer.map(move |v| p.map(v.to_f64()));
    AnyBuffer::U8(out)
}

/// [`apply_brightness`] for a run-time tagged buffer.
///
/// 8-bit input goes through a 256-entry lookup table.
pub fn apply_brightness_any(buffer: &AnyBuffer, params: &BrightnessParams) -> AnyBuffer {
    match buffer {
        AnyBuffer::U8(b) if !params.is_passthrough() => {
            let lut = brightness_lut(params);
            AnyBuffer::U8(b.map(|v| lut[usize::from(v)]))
        }
        AnyBuffer::U8(b) => apply_brightness(b, params),
        AnyBuffer::U16(b) => apply_brightness(b, params),
        AnyBuffer::F32(b) => apply_brightness(b, params),
    }
}

/// Precomputes the remap for every 8-bit input level.
///
/// With zero saturation the table is the identity.
pub fn brightness_lut(params: &BrightnessParams) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = if params.is_passthrough() {
            i as u8
        } else {
            params.map(i as f64)
        };
    }
    lut
}

/// Last brightness parameters used for each sample kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrightnessMemory {
    by_kind: HashMap<SampleKind, BrightnessParams>,
}

impl BrightnessMemory {
    /// Creates an empty memory; every kind starts at its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored params for `kind`, or [`BrightnessParams::defaults_for`].
    pub fn get(&self, kind: SampleKind) -> BrightnessParams {
        self.by_kind
            .get(&kind)
            .copied()
            .unwrap_or_else(|| BrightnessParams::defaults_for(kind))
    }

    /// Records `params` as the latest for `kind`.
    pub fn remember(&mut self, kind: SampleKind, params: BrightnessParams) {
        self.by_kind.insert(kind, params);
    }

    /// Forgets the stored params for `kind`, returning its defaults.
    pub fn reset(&mut self, kind: SampleKind) -> BrightnessParams {
        self.by_kind.remove(&kind);
        BrightnessParams::defaults_for(kind)
    }
}
