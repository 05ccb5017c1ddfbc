//! Histogram, intensity profile and per-channel statistics.
//!
//! Everything here produces plain `(x, y)` series that a plot sink can draw
//! directly. All functions accept an optional region of interest; when given,
//! the buffer is cropped to it (clipped to the image) before analysis.
//!
//! Multi-channel buffers yield one series per channel labelled `C0`, `C1`,
//! ...; single-channel buffers yield one series labelled `I`.

use std::borrow::Cow;
use std::fmt::Write as _;

use pixelscope_core::{PixelBuffer, Rect, Result, Sample};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::channels::ChannelSelection;

/// Direction of an intensity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Mean of every column, plotted left to right.
    #[default]
    Horizontal,
    /// Mean of every row, plotted top to bottom.
    Vertical,
    /// Samples along the top-left to bottom-right diagonal.
    Diagonal,
}

impl Orientation {
    /// Cycles horizontal -> vertical -> diagonal -> horizontal.
    pub fn next(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Diagonal,
            Self::Diagonal => Self::Horizontal,
        }
    }
}

/// One labelled `(x, y)` series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// `C{index}` or `I`.
    pub label: String,
    /// X values.
    pub xs: Vec<f64>,
    /// Y values, same length as `xs`.
    pub ys: Vec<f64>,
}

impl Series {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns `true` if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Moves every x value by `offset`, turning ROI-relative positions into
    /// absolute image positions.
    pub fn shifted(mut self, offset: f64) -> Self {
        for x in &mut self.xs {
            *x += offset;
        }
        self
    }
}

fn series_label(channels: usize, c: usize) -> String {
    if channels > 1 { format!("C{c}") } else { "I".to_string() }
}

fn region<T: Sample>(buffer: &PixelBuffer<T>, roi: Option<Rect>) -> Result<Cow<'_, PixelBuffer<T>>> {
    match roi {
        Some(rect) => Ok(Cow::Owned(buffer.crop(rect)?)),
        None => Ok(Cow::Borrowed(buffer)),
    }
}

fn plane_f64<T: Sample>(buffer: &PixelBuffer<T>, c: usize) -> Vec<f64> {
    buffer
        .data()
        .iter()
        .skip(c)
        .step_by(buffer.channels())
        .map(|v| v.to_f64())
        .collect()
}

/// Histogram bin count for a buffer.
///
/// Float buffers use 256 bins. Integer buffers use one bin per integer value
/// between the smallest and largest sample, at least one.
pub fn histogram_bins<T: Sample>(buffer: &PixelBuffer<T>) -> usize {
    if T::KIND.is_float() {
        return 256;
    }
    match buffer.min_max() {
        Some((lo, hi)) => ((hi - lo) as usize + 1).max(1),
        None => 1,
    }
}

/// Counts `values` into `bins` equal bins spanning their own range.
///
/// Returns `(bin centres, counts)`. The last bin includes the maximum. When
/// every value is equal the range is widened to `value +/- 0.5`. NaN values
/// are not counted.
pub fn histogram_1d(values: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    let bins = bins.max(1);
    let (lo, hi) = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .map(|(lo, hi)| if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) })
        .unwrap_or((0.0, 1.0));

    let width = (hi - lo) / bins as f64;
    let xs = (0..bins).map(|i| lo + width * (i as f64 + 0.5)).collect();
    let mut counts = vec![0.0; bins];
    for &v in values.iter().filter(|v| !v.is_nan()) {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    (xs, counts)
}

/// Per-channel histogram series.
///
/// `bins` defaults to [`histogram_bins`] of the analysed region.
///
/// # Errors
///
/// Returns [`pixelscope_core::Error::InvalidRegion`] if `roi` misses the image.
pub fn histogram_series<T: Sample>(
    buffer: &PixelBuffer<T>,
    bins: Option<usize>,
    roi: Option<Rect>,
) -> Result<Vec<Series>> {
    let cropped = region(buffer, roi)?;
    let buf: &PixelBuffer<T> = &cropped;
    let bins = bins.unwrap_or_else(|| histogram_bins(buf));
    let channels = buf.channels();
    trace!(bins, channels, ?roi, "histogram_series");
    Ok((0..channels)
        .map(|c| {
            let (xs, ys) = histogram_1d(&plane_f64(buf, c), bins);
            Series {
                label: series_label(channels, c),
                xs,
                ys,
            }
        })
        .collect())
}

/// Profile of one row-major `width x height` plane.
///
/// The diagonal walks `min(width, height)` points with integer indices evenly
/// spaced from the first to the last row and column.
pub fn profile_1d(plane: &[f64], width: usize, height: usize, orientation: Orientation) -> Vec<f64> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    match orientation {
        Orientation::Horizontal => (0..width)
            .map(|x| (0..height).map(|y| plane[y * width + x]).sum::<f64>() / height as f64)
            .collect(),
        Orientation::Vertical => plane
            .chunks_exact(width)
            .map(|row| row.iter().sum::<f64>() / width as f64)
            .collect(),
        Orientation::Diagonal => {
            let n = width.min(height);
            if n == 1 {
                return vec![plane[0]];
            }
            (0..n)
                .map(|i| {
                    let y = i * (height - 1) / (n - 1);
                    let x = i * (width - 1) / (n - 1);
                    plane[y * width + x]
                })
                .collect()
        }
    }
}

/// Per-channel profile series. X values are positions relative to the
/// analysed region; shift them with [`profile_offset`] for absolute plots.
///
/// # Errors
///
/// Returns [`pixelscope_core::Error::InvalidRegion`] if `roi` misses the image.
pub fn profile_series<T: Sample>(
    buffer: &PixelBuffer<T>,
    orientation: Orientation,
    roi: Option<Rect>,
) -> Result<Vec<Series>> {
    let cropped = region(buffer, roi)?;
    let buf: &PixelBuffer<T> = &cropped;
    let (h, w, channels) = buf.shape();
    trace!(?orientation, channels, ?roi, "profile_series");
    Ok((0..channels)
        .map(|c| {
            let ys = profile_1d(&plane_f64(buf, c), w, h, orientation);
            Series {
                label: series_label(channels, c),
                xs: (0..ys.len()).map(|i| i as f64).collect(),
                ys,
            }
        })
        .collect())
}

/// X-axis offset of a profile taken over `roi`.
///
/// Horizontal profiles start at `roi.x`, vertical at `roi.y`, diagonal at
/// `min(roi.x, roi.y)`. No ROI means offset 0.
pub fn profile_offset(roi: Option<Rect>, orientation: Orientation) -> u32 {
    match (roi, orientation) {
        (None, _) => 0,
        (Some(r), Orientation::Horizontal) => r.x,
        (Some(r), Orientation::Vertical) => r.y,
        (Some(r), Orientation::Diagonal) => r.x.min(r.y),
    }
}

/// Mean, population standard deviation, median, minimum and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Median; the mean of the two middle values for even counts.
    pub median: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// Summary statistics of `values`, ignoring NaN. All zeros when empty.
pub fn channel_stats(values: &[f64]) -> Summary {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Summary::default();
    }
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    Summary {
        mean,
        std: var.sqrt(),
        median,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    }
}

/// Statistics for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Channel index.
    pub channel: usize,
    /// `true` for integer sample kinds.
    pub is_int: bool,
    /// The numbers.
    pub summary: Summary,
}

fn stats_for<T, F>(
    buffer: &PixelBuffer<T>,
    selection: Option<&ChannelSelection>,
    roi: Option<Rect>,
    values_of: F,
) -> Result<Vec<ChannelStats>>
where
    T: Sample,
    F: Fn(&PixelBuffer<T>, usize) -> Vec<f64>,
{
    let cropped = region(buffer, roi)?;
    let buf: &PixelBuffer<T> = &cropped;
    let channels = buf.channels();
    let is_int = !T::KIND.is_float();
    Ok((0..channels)
        .filter(|&c| channels == 1 || selection.is_none_or(|s| s.is_selected(c)))
        .map(|c| ChannelStats {
            channel: c,
            is_int,
            summary: channel_stats(&values_of(buf, c)),
        })
        .collect())
}

/// Sample statistics per visible channel.
///
/// Single-channel buffers always report their one channel.
///
/// # Errors
///
/// Returns [`pixelscope_core::Error::InvalidRegion`] if `roi` misses the image.
pub fn histogram_stats<T: Sample>(
    buffer: &PixelBuffer<T>,
    selection: Option<&ChannelSelection>,
    roi: Option<Rect>,
) -> Result<Vec<ChannelStats>> {
    stats_for(buffer, selection, roi, plane_f64)
}

/// Statistics of the profile values per visible channel.
///
/// # Errors
///
/// Returns [`pixelscope_core::Error::InvalidRegion`] if `roi` misses the image.
pub fn profile_stats<T: Sample>(
    buffer: &PixelBuffer<T>,
    orientation: Orientation,
    selection: Option<&ChannelSelection>,
    roi: Option<Rect>,
) -> Result<Vec<ChannelStats>> {
    stats_for(buffer, selection, roi, |b, c| {
        profile_1d(&plane_f64(b, c), b.width(), b.height(), orientation)
    })
}

/// CSV text with an `x` column followed by one column per series.
///
/// All series are assumed to share the x values of the first. With
/// `cast_int` the y values are truncated to integers, as histogram counts.
pub fn series_to_csv(series: &[Series], cast_int: bool) -> String {
    let Some(first) = series.first() else {
        return String::new();
    };
    let mut out = String::from("x");
    for s in series {
        out.push(',');
        out.push_str(&s.label);
    }
    for (i, x) in first.xs.iter().enumerate() {
        let _ = write!(out, "\n{x}");
        for s in series {
            let y = s.ys.get(i).copied().unwrap_or(f64::NAN);
            if cast_int {
                let _ = write!(out, ",{}", y as i64);
            } else {
                let _ = write!(out, ",{y}");
            }
        }
    }
    out
}

/// CSV table of channel statistics with a header row.
pub fn stats_to_csv(stats: &[ChannelStats]) -> String {
    let mut out = String::from("ch,mean,std,median,min,max");
    for s in stats {
        let m = &s.summary;
        if s.is_int {
            let _ = write!(
                out,
                "\n{},{:.4},{:.4},{},{},{}",
                s.channel, m.mean, m.std, m.median, m.min as i64, m.max as i64
            );
        } else {
            let _ = write!(
                out,
                "\n{},{:.4},{:.4},{:.4},{:.4},{:.4}",
                s.channel, m.mean, m.std, m.median, m.min, m.max
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp_rgb() -> PixelBuffer<u8> {
        // 3x2, channel c of pixel (x, y) = 10*y + x + 100*c
        let mut data = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                for c in 0..3u8 {
                    data.push(10 * y + x + 100 * c);
                }
            }
        }
        PixelBuffer::from_vec(3, 2, 3, data).unwrap()
    }

    #[test]
    fn test_bins_by_kind() {
        let ints = PixelBuffer::gray(3, 1, vec![10u16, 12, 40]).unwrap();
        assert_eq!(histogram_bins(&ints), 31);
        let flat = PixelBuffer::gray(2, 1, vec![5u8, 5]).unwrap();
        assert_eq!(histogram_bins(&flat), 1);
        let floats = PixelBuffer::gray(2, 1, vec![0.0f32, 1.0]).unwrap();
        assert_eq!(histogram_bins(&floats), 256);
    }

    #[test]
    fn test_histogram_1d_edges() {
        let (xs, counts) = histogram_1d(&[0.0, 1.0, 1.0, 2.0, 3.0], 3);
        assert_eq!(counts, vec![1.0, 2.0, 2.0]);
        assert_relative_eq!(xs[0], 0.5);
        assert_relative_eq!(xs[2], 2.5);

        let (xs, counts) = histogram_1d(&[7.0, 7.0], 1);
        assert_eq!(counts, vec![2.0]);
        assert_relative_eq!(xs[0], 7.0);
    }

    #[test]
    fn test_histogram_series_labels_and_totals() {
        let buf = ramp_rgb();
        let series = histogram_series(&buf, None, None).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].label, "C2");
        for s in &series {
            assert_eq!(s.ys.iter().sum::<f64>(), 6.0);
            assert_eq!(s.len(), 13);
        }

        let gray = PixelBuffer::gray(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        let series = histogram_series(&gray, Some(4), Some(Rect::new(0, 1, 2, 1))).unwrap();
        assert_eq!(series[0].label, "I");
        assert_eq!(series[0].ys.iter().sum::<f64>(), 2.0);
    }

    #[test]
    fn test_histogram_roi_miss() {
        let gray = PixelBuffer::gray(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        let err = histogram_series(&gray, None, Some(Rect::new(5, 5, 1, 1))).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_profiles() {
        let plane = [1.0, 2.0, 3.0, 5.0, 6.0, 7.0];
        assert_eq!(profile_1d(&plane, 3, 2, Orientation::Horizontal), vec![3.0, 4.0, 5.0]);
        assert_eq!(profile_1d(&plane, 3, 2, Orientation::Vertical), vec![2.0, 6.0]);
        assert_eq!(profile_1d(&plane, 3, 2, Orientation::Diagonal), vec![1.0, 7.0]);
        assert_eq!(profile_1d(&[9.0], 1, 1, Orientation::Diagonal), vec![9.0]);
        assert!(profile_1d(&[], 0, 3, Orientation::Horizontal).is_empty());
    }

    #[test]
    fn test_diagonal_uses_linspace_indices() {
        // 5 wide, 3 tall: rows 0,1,2 and columns 0,2,4
        let plane: Vec<f64> = (0..15).map(f64::from).collect();
        assert_eq!(profile_1d(&plane, 5, 3, Orientation::Diagonal), vec![0.0, 7.0, 14.0]);
    }

    #[test]
    fn test_profile_series_roi_and_offset() {
        let buf = ramp_rgb();
        let roi = Rect::new(1, 0, 2, 2);
        let series = profile_series(&buf, Orientation::Horizontal, Some(roi)).unwrap();
        assert_eq!(series[0].ys, vec![6.0, 7.0]);
        let offset = profile_offset(Some(roi), Orientation::Horizontal);
        let abs = series[0].clone().shifted(f64::from(offset));
        assert_eq!(abs.xs, vec![1.0, 2.0]);
        assert_eq!(profile_offset(Some(Rect::new(4, 2, 1, 1)), Orientation::Diagonal), 2);
        assert_eq!(profile_offset(None, Orientation::Vertical), 0);
    }

    #[test]
    fn test_channel_stats() {
        let s = channel_stats(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(s.mean, 2.5);
        assert_relative_eq!(s.std, 1.25f64.sqrt());
        assert_relative_eq!(s.median, 2.5);
        assert_eq!((s.min, s.max), (1.0, 4.0));
        assert_eq!(channel_stats(&[]), Summary::default());
        assert_relative_eq!(channel_stats(&[3.0, f64::NAN, 1.0, 2.0]).median, 2.0);
    }

    #[test]
    fn test_stats_respect_selection() {
        let buf = ramp_rgb();
        let sel = ChannelSelection::from(vec![true, false, true]);
        let stats = histogram_stats(&buf, Some(&sel), None).unwrap();
        assert_eq!(stats.iter().map(|s| s.channel).collect::<Vec<_>>(), vec![0, 2]);
        assert!(stats[0].is_int);
        assert_relative_eq!(stats[1].summary.min, 200.0);

        let prof = profile_stats(&buf, Orientation::Vertical, None, None).unwrap();
        assert_eq!(prof.len(), 3);
        assert_relative_eq!(prof[0].summary.mean, 6.0);

        let gray = PixelBuffer::gray(1, 1, vec![0.25f32]).unwrap();
        let hidden = ChannelSelection::from(vec![false]);
        let stats = histogram_stats(&gray, Some(&hidden), None).unwrap();
        assert_eq!(stats.len(), 1);
        assert!(!stats[0].is_int);
    }

    #[test]
    fn test_csv_export() {
        let series = vec![
            Series {
                label: "C0".into(),
                xs: vec![0.5, 1.5],
                ys: vec![3.0, 1.0],
            },
            Series {
                label: "C1".into(),
                xs: vec![0.5, 1.5],
                ys: vec![0.0, 4.0],
            },
        ];
        assert_eq!(series_to_csv(&series, true), "x,C0,C1\n0.5,3,0\n1.5,1,4");
        assert_eq!(series_to_csv(&[], false), "");

        let stats = vec![ChannelStats {
            channel: 0,
            is_int: true,
            summary: channel_stats(&[1.0, 3.0]),
        }];
        assert_eq!(stats_to_csv(&stats), "ch,mean,std,median,min,max\n0,2.0000,1.0000,2,1,3");
    }
}
