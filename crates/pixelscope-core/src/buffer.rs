//! Interleaved pixel buffers.
//!
//! [`PixelBuffer<T>`] stores `height x width x channels` samples in row-major
//! order with channels interleaved, matching the layout image loaders hand
//! over. A grayscale (2-D) buffer is simply a buffer with one channel.
//!
//! Buffers are immutable by convention: every transform in this workspace
//! reads a buffer and returns a new one. [`AnyBuffer`] erases the sample
//! type for places where it is only known at run time, such as a list of
//! opened images with mixed bit depths.
//!
//! # Layout
//!
//! ```text
//! index(x, y, c) = (y * width + x) * channels + c
//! ```
//!
//! # Example
//!
//! ```rust
//! use pixelscope_core::PixelBuffer;
//!
//! let buf = PixelBuffer::from_vec(2, 1, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(buf.pixel(1, 0), &[4, 5, 6]);
//! assert_eq!(buf.channel_plane(2), vec![3, 6]);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Rect, Result};

/// Run-time tag for the sample type of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleKind {
    /// 8-bit unsigned integer samples.
    U8,
    /// 16-bit unsigned integer samples.
    U16,
    /// 32-bit float samples.
    F32,
}

impl SampleKind {
    /// Returns `true` for floating-point samples.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32)
    }

    /// Short label used in status text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::F32 => "float",
        }
    }
}

/// Scalar sample type a [`PixelBuffer`] can hold.
pub trait Sample: Copy + Default + PartialOrd + Send + Sync + std::fmt::Debug + 'static {
    /// Run-time tag for this type.
    const KIND: SampleKind;

    /// Widen to `f64` without normalisation.
    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::U8;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for u16 {
    const KIND: SampleKind = SampleKind::U16;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

/// Owned `height x width x channels` sample buffer.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer<T: Sample> {
    data: Vec<T>,
    width: usize,
    height: usize,
    channels: usize,
}

impl<T: Sample> PixelBuffer<T> {
    /// Creates a buffer with every sample set to `T::default()`.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: vec![T::default(); width * height * channels],
            width,
            height,
            channels,
        }
    }

    /// Creates a buffer from interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferShape`] when `channels` is zero or the
    /// sample count is not `width * height * channels`.
    pub fn from_vec(width: usize, height: usize, channels: usize, data: Vec<T>) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid_shape("buffer must have at least one channel"));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(Error::invalid_shape(format!(
                "{width}x{height}x{channels} needs {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates a single-channel (2-D) buffer.
    pub fn gray(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        Self::from_vec(width, height, 1, data)
    }

    /// Creates a buffer where every pixel equals `pixel`.
    pub fn filled(width: usize, height: usize, pixel: &[T]) -> Result<Self> {
        if pixel.is_empty() {
            return Err(Error::invalid_shape("fill pixel has no channels"));
        }
        let mut data = Vec::with_capacity(width * height * pixel.len());
        for _ in 0..width * height {
            data.extend_from_slice(pixel);
        }
        Ok(Self {
            data,
            width,
            height,
            channels: pixel.len(),
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(height, width, channels)`, the order loaders report shapes in.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Sample kind of this buffer.
    #[inline]
    pub fn kind(&self) -> SampleKind {
        T::KIND
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns `true` if the buffer has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Full-image rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as u32, self.height as u32)
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the buffer, returning its samples.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Samples of one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[T] {
        let idx = (y * self.width + x) * self.channels;
        &self.data[idx..idx + self.channels]
    }

    /// Samples of one pixel, or `None` outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<&[T]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// One sample.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> T {
        self.data[(y * self.width + x) * self.channels + c]
    }

    /// One row of interleaved samples.
    pub fn row(&self, y: usize) -> &[T] {
        let stride = self.width * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Copies channel `c` out as a row-major plane.
    ///
    /// # Panics
    ///
    /// Panics if `c >= channels`.
    pub fn channel_plane(&self, c: usize) -> Vec<T> {
        assert!(c < self.channels, "channel {c} out of range");
        self.data.iter().skip(c).step_by(self.channels).copied().collect()
    }

    /// Builds a new buffer from the listed channels, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferShape`] if `indices` is empty or names a
    /// channel that does not exist.
    pub fn gather_channels(&self, indices: &[usize]) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::invalid_shape("no channels to gather"));
        }
        if let Some(&bad) = indices.iter().find(|&&c| c >= self.channels) {
            return Err(Error::invalid_shape(format!(
                "channel {bad} requested from a {}-channel buffer",
                self.channels
            )));
        }
        let mut data = Vec::with_capacity(self.pixel_count() * indices.len());
        for px in self.data.chunks_exact(self.channels) {
            data.extend(indices.iter().map(|&c| px[c]));
        }
        Ok(Self {
            data,
            width: self.width,
            height: self.height,
            channels: indices.len(),
        })
    }

    /// Applies `f` to every sample, producing a buffer of another type.
    pub fn map<U: Sample, F>(&self, f: F) -> PixelBuffer<U>
    where
        F: Fn(T) -> U,
    {
        PixelBuffer {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Parallel [`map`](Self::map) over rows, available with the `parallel` feature.
    #[cfg(feature = "parallel")]
    pub fn par_map<U: Sample, F>(&self, f: F) -> PixelBuffer<U>
    where
        F: Fn(T) -> U + Sync,
    {
        use rayon::prelude::*;

        let stride = (self.width * self.channels).max(1);
        let mut data = vec![U::default(); self.data.len()];
        data.par_chunks_mut(stride)
            .zip(self.data.par_chunks(stride))
            .for_each(|(dst, src)| {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d = f(s);
                }
            });
        PixelBuffer {
            data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    /// Copies the part of the image covered by `rect`.
    ///
    /// The rectangle is clipped to the image first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if `rect` does not overlap the image.
    pub fn crop(&self, rect: Rect) -> Result<Self> {
        let clipped = rect
            .intersect(&self.bounds())
            .ok_or_else(|| Error::invalid_region(rect, self.width, self.height))?;
        let (x0, y0) = (clipped.x as usize, clipped.y as usize);
        let (w, h) = (clipped.width as usize, clipped.height as usize);
        let mut data = Vec::with_capacity(w * h * self.channels);
        for y in y0..y0 + h {
            let start = (y * self.width + x0) * self.channels;
            data.extend_from_slice(&self.data[start..start + w * self.channels]);
        }
        Ok(Self {
            data,
            width: w,
            height: h,
            channels: self.channels,
        })
    }

    /// Smallest and largest sample as `f64`, `None` for an empty buffer.
    ///
    /// NaN samples are skipped.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .map(|v| v.to_f64())
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl<T: Sample> std::fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("kind", &T::KIND)
            .finish()
    }
}

/// A pixel buffer whose sample type is chosen at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyBuffer {
    /// 8-bit samples.
    U8(PixelBuffer<u8>),
    /// 16-bit samples.
    U16(PixelBuffer<u16>),
    /// Float samples.
    F32(PixelBuffer<f32>),
}

/// Runs `$body` with `$buf` bound to the inner [`PixelBuffer`], whatever its type.
#[macro_export]
macro_rules! with_buffer {
    ($any:expr, $buf:ident => $body:expr) => {
        match $any {
            $crate::AnyBuffer::U8($buf) => $body,
            $crate::AnyBuffer::U16($buf) => $body,
            $crate::AnyBuffer::F32($buf) => $body,
        }
    };
}

impl AnyBuffer {
    /// Sample kind of the wrapped buffer.
    pub fn kind(&self) -> SampleKind {
        match self {
            Self::U8(_) => SampleKind::U8,
            Self::U16(_) => SampleKind::U16,
            Self::F32(_) => SampleKind::F32,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        with_buffer!(self, b => b.width())
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        with_buffer!(self, b => b.height())
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        with_buffer!(self, b => b.channels())
    }

    /// Full-image rectangle.
    pub fn bounds(&self) -> Rect {
        with_buffer!(self, b => b.bounds())
    }

    /// Samples of one pixel widened to `f64`, or `None` outside the image.
    pub fn pixel_f64(&self, x: usize, y: usize) -> Option<Vec<f64>> {
        with_buffer!(self, b => b.get_pixel(x, y).map(|px| px.iter().map(|v| v.to_f64()).collect()))
    }

    /// [`pixel_f64`](Self::pixel_f64) for signed coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the image.
    pub fn checked_pixel_f64(&self, x: i64, y: i64) -> Result<Vec<f64>> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(ix), Ok(iy)) => self.pixel_f64(ix, iy),
            _ => None,
        }
        .ok_or_else(|| Error::out_of_bounds(x, y, self.width(), self.height()))
    }

    /// Copies the region covered by `rect`, keeping the sample type.
    pub fn crop(&self, rect: Rect) -> Result<Self> {
        Ok(match self {
            Self::U8(b) => Self::U8(b.crop(rect)?),
            Self::U16(b) => Self::U16(b.crop(rect)?),
            Self::F32(b) => Self::F32(b.crop(rect)?),
        })
    }

    /// Borrows the 8-bit buffer, if that is what this holds.
    pub fn as_u8(&self) -> Option<&PixelBuffer<u8>> {
        match self {
            Self::U8(b) => Some(b),
            _ => None,
        }
    }

    /// Takes the 8-bit buffer, if that is what this holds.
    pub fn into_u8(self) -> Option<PixelBuffer<u8>> {
        match self {
            Self::U8(b) => Some(b),
            _ => None,
        }
    }
}

impl From<PixelBuffer<u8>> for AnyBuffer {
    fn from(b: PixelBuffer<u8>) -> Self {
        Self::U8(b)
    }
}

impl From<PixelBuffer<u16>> for AnyBuffer {
    fn from(b: PixelBuffer<u16>) -> Self {
        Self::U16(b)
    }
}

impl From<PixelBuffer<f32>> for AnyBuffer {
    fn from(b: PixelBuffer<f32>) -> Self {
        Self::F32(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_2x2() -> PixelBuffer<u8> {
        PixelBuffer::from_vec(2, 2, 3, (0..12).collect()).unwrap()
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let err = PixelBuffer::from_vec(2, 2, 3, vec![0u8; 11]).unwrap_err();
        assert!(err.is_shape_error());
        assert!(PixelBuffer::<u8>::from_vec(2, 2, 0, vec![]).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let buf = rgb_2x2();
        assert_eq!(buf.shape(), (2, 2, 3));
        assert_eq!(buf.pixel(1, 1), &[9, 10, 11]);
        assert_eq!(buf.sample(0, 1, 2), 8);
        assert!(buf.get_pixel(2, 0).is_none());
        assert_eq!(buf.row(1), &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_gather_channels() {
        let buf = rgb_2x2();
        let out = buf.gather_channels(&[0, 2]).unwrap();
        assert_eq!(out.channels(), 2);
        assert_eq!(out.data(), &[0, 2, 3, 5, 6, 8, 9, 11]);
        assert!(buf.gather_channels(&[3]).is_err());
        assert!(buf.gather_channels(&[]).is_err());
    }

    #[test]
    fn test_crop_clips_to_bounds() {
        let buf = rgb_2x2();
        let out = buf.crop(Rect::new(1, 0, 5, 5)).unwrap();
        assert_eq!(out.shape(), (2, 1, 3));
        assert_eq!(out.data(), &[3, 4, 5, 9, 10, 11]);
        assert!(buf.crop(Rect::new(4, 4, 2, 2)).is_err());
    }

    #[test]
    fn test_min_max() {
        let buf = PixelBuffer::gray(3, 1, vec![0.5f32, f32::NAN, -1.0]).unwrap();
        assert_eq!(buf.min_max(), Some((-1.0, 0.5)));
        assert_eq!(PixelBuffer::<u8>::new(0, 0, 1).min_max(), None);
    }

    #[test]
    fn test_any_buffer_dispatch() {
        let any = AnyBuffer::from(PixelBuffer::filled(4, 3, &[7u16, 9]).unwrap());
        assert_eq!(any.kind(), SampleKind::U16);
        assert_eq!((any.width(), any.height(), any.channels()), (4, 3, 2));
        assert_eq!(any.pixel_f64(3, 2), Some(vec![7.0, 9.0]));
        assert!(any.as_u8().is_none());
    }
}
