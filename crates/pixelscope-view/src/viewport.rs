//! Viewport geometry: image <-> widget coordinates and zoom.
//!
//! The image is drawn at `scale` inside a scrollable widget. A point in
//! image pixels maps to widget pixels by multiplying with the scale, and the
//! scroll position says which widget pixel sits at the viewport's top-left.
//!
//! ```text
//!  widget = image * scale
//!  visible widget x range = scroll_x .. scroll_x + viewport_width
//!  viewport centre (image) = (scroll + viewport / 2) / scale
//! ```
//!
//! Every zoom operation clamps the requested scale to one [`ZoomLimits`]
//! policy; scales are never rejected. Scroll positions are whole widget
//! pixels and never negative.

use pixelscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Lowest zoom (1/8x) unless configured otherwise.
pub const DEFAULT_MIN_ZOOM: f64 = 0.125;

/// Highest zoom (16x) unless configured otherwise.
pub const DEFAULT_MAX_ZOOM: f64 = 16.0;

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    /// Column, in image pixels.
    pub x: f64,
    /// Row, in image pixels.
    pub y: f64,
}

impl ImagePoint {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in widget (display) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WidgetPoint {
    /// Horizontal position, in widget pixels.
    pub x: f64,
    /// Vertical position, in widget pixels.
    pub y: f64,
}

impl WidgetPoint {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Allowed zoom range, shared by step zoom, fit-to-window and tiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    /// Smallest allowed scale.
    pub min: f64,
    /// Largest allowed scale.
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    /// Creates limits, swapping the bounds if given in the wrong order.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }

    /// Returns `true` if both bounds are positive, finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.min > 0.0 && self.max.is_finite() && self.min <= self.max
    }

    /// Returns `true` if both bounds are exact powers of two.
    ///
    /// Snapped fit scales only stay powers of two when the clamp that
    /// follows snapping lands on such a bound.
    pub fn is_power_of_two(&self) -> bool {
        let exact = |v: f64| v > 0.0 && v.is_finite() && v.log2().fract() == 0.0;
        exact(self.min) && exact(self.max)
    }

    /// Clamps `scale` into range. NaN becomes 1.0 before clamping.
    pub fn clamp(&self, scale: f64) -> f64 {
        let s = if scale.is_nan() { 1.0 } else { scale };
        // Unordered limits must not panic.
        s.max(self.min).min(self.max)
    }

    /// Returns `true` if `scale` is inside the range.
    pub fn contains(&self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

/// Scale and scroll of one image view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Widget pixels per image pixel.
    pub scale: f64,
    /// Horizontal scroll in widget pixels, never negative.
    pub scroll_x: i64,
    /// Vertical scroll in widget pixels, never negative.
    pub scroll_y: i64,
    /// Visible viewport width in widget pixels.
    pub viewport_width: f64,
    /// Visible viewport height in widget pixels.
    pub viewport_height: f64,
    /// Zoom policy every operation on this state obeys.
    pub limits: ZoomLimits,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl ViewportState {
    /// A 1:1 view scrolled to the top-left of a `width x height` viewport.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self::with_limits(viewport_width, viewport_height, ZoomLimits::default())
    }

    /// Like [`new`](Self::new) with a custom zoom policy.
    pub fn with_limits(viewport_width: f64, viewport_height: f64, limits: ZoomLimits) -> Self {
        Self {
            scale: limits.clamp(1.0),
            scroll_x: 0,
            scroll_y: 0,
            viewport_width,
            viewport_height,
            limits,
        }
    }

    /// Centre of the viewport in widget coordinates relative to the viewport.
    pub fn viewport_center(&self) -> WidgetPoint {
        WidgetPoint::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Returns a copy with a new viewport size; scale and scroll are kept.
    pub fn resized(&self, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            ..*self
        }
    }

    /// Returns a copy scrolled to `(x, y)`, clamped to be non-negative.
    pub fn scrolled_to(&self, x: i64, y: i64) -> Self {
        Self {
            scroll_x: x.max(0),
            scroll_y: y.max(0),
            ..*self
        }
    }

    /// Scale as a status-bar string, e.g. `Scale: 2.00x`.
    pub fn scale_label(&self) -> String {
        format!("Scale: {:.2}x", self.scale)
    }
}

fn usable_scale(scale: f64) -> f64 {
    if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        warn!(scale, "degenerate scale, using 1.0");
        1.0
    }
}

/// Maps an image point to widget coordinates: `p * scale`.
#[inline]
pub fn image_point_to_widget_point(p: ImagePoint, scale: f64) -> WidgetPoint {
    WidgetPoint::new(p.x * scale, p.y * scale)
}

/// Maps a widget point to image coordinates: `p / scale`.
///
/// A scale that is not a positive finite number is replaced by 1.0.
#[inline]
pub fn widget_point_to_image_point(p: WidgetPoint, scale: f64) -> ImagePoint {
    let s = usable_scale(scale);
    ImagePoint::new(p.x / s, p.y / s)
}

/// [`widget_point_to_image_point`] that rejects a degenerate scale instead of
/// substituting 1.0.
pub fn checked_widget_point_to_image_point(p: WidgetPoint, scale: f64) -> Result<ImagePoint> {
    if scale > 0.0 && scale.is_finite() {
        Ok(ImagePoint::new(p.x / scale, p.y / scale))
    } else {
        Err(Error::degenerate_scale(scale))
    }
}

/// Image point currently shown at the centre of the viewport.
pub fn viewport_center_in_image_coords(state: &ViewportState) -> ImagePoint {
    let s = usable_scale(state.scale);
    ImagePoint::new(
        (state.scroll_x as f64 + state.viewport_width / 2.0) / s,
        (state.scroll_y as f64 + state.viewport_height / 2.0) / s,
    )
}

/// Image point under a widget position inside the viewport.
pub fn viewport_point_in_image_coords(state: &ViewportState, anchor: WidgetPoint) -> ImagePoint {
    let s = usable_scale(state.scale);
    ImagePoint::new(
        (state.scroll_x as f64 + anchor.x) / s,
        (state.scroll_y as f64 + anchor.y) / s,
    )
}

/// Scroll that puts `image_point` at `target` (viewport-relative) at `new_scale`.
///
/// `image_point * new_scale - target`, rounded to whole pixels and clamped
/// to be non-negative.
pub fn recenter(image_point: ImagePoint, target: WidgetPoint, new_scale: f64) -> (i64, i64) {
    let to_scroll = |img: f64, tgt: f64| ((img * new_scale - tgt).round() as i64).max(0);
    (to_scroll(image_point.x, target.x), to_scroll(image_point.y, target.y))
}

/// Zooms to `new_scale` keeping the current viewport centre in place.
pub fn set_zoom(state: &ViewportState, new_scale: f64) -> ViewportState {
    let center = viewport_center_in_image_coords(state);
    set_zoom_at_point(state, new_scale, center)
}

/// Zooms to `new_scale` and centres the viewport on `image_point`.
pub fn set_zoom_at_point(state: &ViewportState, new_scale: f64, image_point: ImagePoint) -> ViewportState {
    let scale = state.limits.clamp(new_scale);
    let (scroll_x, scroll_y) = recenter(image_point, state.viewport_center(), scale);
    debug!(
        from = state.scale,
        to = scale,
        cx = image_point.x,
        cy = image_point.y,
        "zoom"
    );
    ViewportState {
        scale,
        scroll_x,
        scroll_y,
        ..*state
    }
}

/// Multiplies the scale by `factor`, keeping the image point under `anchor`
/// (a viewport-relative widget position, e.g. the mouse) under it.
pub fn zoom_about(state: &ViewportState, factor: f64, anchor: WidgetPoint) -> ViewportState {
    let image_point = viewport_point_in_image_coords(state, anchor);
    let scale = state.limits.clamp(state.scale * factor);
    let (scroll_x, scroll_y) = recenter(image_point, anchor, scale);
    trace!(factor, scale, "zoom_about");
    ViewportState {
        scale,
        scroll_x,
        scroll_y,
        ..*state
    }
}

/// Doubles the scale around the viewport centre.
pub fn zoom_in(state: &ViewportState) -> ViewportState {
    set_zoom(state, state.scale * 2.0)
}

/// Halves the scale around the viewport centre.
pub fn zoom_out(state: &ViewportState) -> ViewportState {
    set_zoom(state, state.scale / 2.0)
}

/// Largest power-of-two scale (within the default limits) that fits the
/// whole image into the viewport.
///
/// ```rust
/// use pixelscope_view::viewport::fit_to_window;
///
/// assert_eq!(fit_to_window(1000, 1000, 600.0, 800.0), 0.5);
/// assert_eq!(fit_to_window(100, 100, 700.0, 700.0), 8.0);
/// ```
pub fn fit_to_window(image_height: usize, image_width: usize, viewport_height: f64, viewport_width: f64) -> f64 {
    fit_to_window_within(
        image_height,
        image_width,
        viewport_height,
        viewport_width,
        &ZoomLimits::default(),
    )
}

/// [`fit_to_window`] with explicit limits.
///
/// `min(vh / h, vw / w)` is clamped, then snapped to `2^round(log2(fit))`
/// (ties to even), then clamped again in case the limits are not powers of
/// two. A zero image dimension yields 1.0 clamped.
pub fn fit_to_window_within(
    image_height: usize,
    image_width: usize,
    viewport_height: f64,
    viewport_width: f64,
    limits: &ZoomLimits,
) -> f64 {
    if image_height == 0 || image_width == 0 {
        return limits.clamp(1.0);
    }
    let fit = (viewport_height / image_height as f64).min(viewport_width / image_width as f64);
    let clamped = limits.clamp(fit);
    let snapped = 2f64.powi(clamped.log2().round_ties_even() as i32);
    let scale = limits.clamp(snapped);
    trace!(fit, scale, "fit_to_window");
    scale
}
