//! Channel selection and colour compositing.
//!
//! A [`ChannelSelection`] is the list of per-channel visibility checkboxes.
//! It outlives any single image, so before it is applied it is reconciled
//! to the channel count of the current buffer: missing entries become
//! visible and extra entries are dropped.
//!
//! [`ChannelColors`] assigns a display colour to each channel. The default
//! is red/green/blue for 3-channel images and white otherwise.
//! [`composite_channels`] tints every visible channel with its colour and
//! sums the results into an RGB buffer.

use pixelscope_core::{Error, PixelBuffer, Result, Sample};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Per-channel visibility flags.
///
/// # Example
///
/// ```rust
/// use pixelscope_ops::channels::ChannelSelection;
///
/// let sel = ChannelSelection::from(vec![true, false, true]);
/// assert_eq!(sel.reconciled(4).flags(), &[true, false, true, true]);
/// assert_eq!(sel.reconciled(2).flags(), &[true, false]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    flags: Vec<bool>,
}

impl ChannelSelection {
    /// Selection with every one of `channels` channels visible.
    pub fn all(channels: usize) -> Self {
        Self {
            flags: vec![true; channels],
        }
    }

    /// The raw flags.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Number of flags currently held.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if no flags are held.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether channel `c` is visible. Channels past the end count as visible.
    pub fn is_selected(&self, c: usize) -> bool {
        self.flags.get(c).copied().unwrap_or(true)
    }

    /// Sets the flag for channel `c`, growing the list with `true` if needed.
    pub fn set(&mut self, c: usize, visible: bool) {
        if c >= self.flags.len() {
            self.flags.resize(c + 1, true);
        }
        self.flags[c] = visible;
    }

    /// Resizes in place to `channels` entries: pad with `true`, truncate longer.
    pub fn reconcile(&mut self, channels: usize) {
        self.flags.resize(channels, true);
    }

    /// Reconciled copy.
    pub fn reconciled(&self, channels: usize) -> Self {
        let mut out = self.clone();
        out.reconcile(channels);
        out
    }

    /// Indices of visible channels for a `channels`-channel buffer.
    ///
    /// Falls back to `[0]` when nothing is visible.
    pub fn effective_indices(&self, channels: usize) -> Vec<usize> {
        let indices: Vec<usize> = (0..channels).filter(|&c| self.is_selected(c)).collect();
        if indices.is_empty() && channels > 0 {
            vec![0]
        } else {
            indices
        }
    }
}

impl From<Vec<bool>> for ChannelSelection {
    fn from(flags: Vec<bool>) -> Self {
        Self { flags }
    }
}

/// Keeps the channels flagged in `selection`, in increasing index order.
///
/// The selection is reconciled to the buffer's channel count first. If no
/// channel is flagged the result is a single-channel copy of channel 0.
///
/// # Errors
///
/// Returns [`Error::InvalidBufferShape`] if the buffer has no channels.
pub fn select_channels<T: Sample>(
    buffer: &PixelBuffer<T>,
    selection: &ChannelSelection,
) -> Result<PixelBuffer<T>> {
    let channels = buffer.channels();
    if channels == 0 {
        return Err(Error::invalid_shape("cannot select channels of a 0-channel buffer"));
    }
    let indices = selection.effective_indices(channels);
    trace!(channels, ?indices, "select_channels");
    if indices.len() == channels {
        return Ok(buffer.clone());
    }
    buffer.gather_channels(&indices)
}

/// An RGB display colour for one channel.
pub type Rgb = [u8; 3];

/// Pure red.
pub const RED: Rgb = [255, 0, 0];
/// Pure green.
pub const GREEN: Rgb = [0, 255, 0];
/// Pure blue.
pub const BLUE: Rgb = [0, 0, 255];
/// White, the colour of any channel without an explicit assignment.
pub const WHITE: Rgb = [255, 255, 255];

/// Display colour per channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelColors {
    colors: Vec<Rgb>,
}

impl ChannelColors {
    /// Default colours for a `channels`-channel image.
    ///
    /// Three channels get red/green/blue; anything else is all white.
    pub fn defaults_for(channels: usize) -> Self {
        let colors = if channels == 3 {
            vec![RED, GREEN, BLUE]
        } else {
            vec![WHITE; channels]
        };
        Self { colors }
    }

    /// The colours, one per channel.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Colour of channel `c`, white past the end.
    pub fn get(&self, c: usize) -> Rgb {
        self.colors.get(c).copied().unwrap_or(WHITE)
    }

    /// Resizes in place to `channels` entries: pad with white, truncate longer.
    pub fn reconcile(&mut self, channels: usize) {
        self.colors.resize(channels, WHITE);
    }
}

impl From<Vec<Rgb>> for ChannelColors {
    fn from(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }
}

/// Tints each visible channel with its colour and sums into RGB.
///
/// For every visible channel `c` with colour `(r, g, b)` the sample `v`
/// contributes `v * r / 255` to red and likewise to green and blue. Sums are
/// clipped to 255. An all-hidden selection shows channel 0 only.
///
/// # Errors
///
/// Returns [`Error::InvalidBufferShape`] if the buffer has no channels.
pub fn composite_channels(
    buffer: &PixelBuffer<u8>,
    selection: &ChannelSelection,
    colors: &ChannelColors,
) -> Result<PixelBuffer<u8>> {
    let channels = buffer.channels();
    if channels == 0 {
        return Err(Error::invalid_shape("cannot composite a 0-channel buffer"));
    }
    let indices = selection.effective_indices(channels);
    let tints: Vec<[f64; 3]> = indices
        .iter()
        .map(|&c| colors.get(c).map(|v| f64::from(v) / 255.0))
        .collect();
    trace!(channels, visible = indices.len(), "composite_channels");

    let mut data = Vec::with_capacity(buffer.pixel_count() * 3);
    for px in buffer.data().chunks_exact(channels) {
        let mut acc = [0.0f64; 3];
        for (&c, tint) in indices.iter().zip(&tints) {
            let v = f64::from(px[c]);
            for (a, t) in acc.iter_mut().zip(tint) {
                *a += v * t;
            }
        }
        data.extend(acc.iter().map(|v| v.clamp(0.0, 255.0).round() as u8));
    }
    PixelBuffer::from_vec(buffer.width(), buffer.height(), 3, data)
}
