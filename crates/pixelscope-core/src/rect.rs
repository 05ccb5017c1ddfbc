//! Rectangle type for regions of interest.
//!
//! [`Rect`] is an integer rectangle in image pixel coordinates. It is used
//! for ROI selection, cropping before analysis and projecting a selection
//! between image space and widget space at a given zoom scale.
//!
//! # Coordinate System
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │   ROI    │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! Left/top edges are inclusive, right/bottom edges exclusive.

use serde::{Deserialize, Serialize};

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// # Example
///
/// ```rust
/// use pixelscope_core::Rect;
///
/// let rect = Rect::new(10, 20, 100, 50);
/// assert_eq!(rect.right(), 110);
/// assert_eq!(rect.bottom(), 70);
/// assert!(rect.contains(10, 20));
/// assert!(!rect.contains(110, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin, covering a whole image.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Creates a rectangle from two corners, normalising swapped coordinates.
    ///
    /// Both corners are inclusive, as a rubber-band selection reports them.
    ///
    /// ```rust
    /// use pixelscope_core::Rect;
    ///
    /// assert_eq!(Rect::from_corners(9, 4, 2, 1), Rect::new(2, 1, 8, 4));
    /// ```
    pub fn from_corners(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        let (min_x, max_x) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (min_y, max_y) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    /// Right edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Intersection with another rectangle, `None` if they don't overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Clips the rectangle to a `width x height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Rect> {
        self.intersect(&Rect::from_size(width, height))
    }

    /// Projects a widget-space rectangle into image space at `scale`.
    ///
    /// Each component is divided by the scale and truncated, so a selection
    /// drawn at 4x zoom maps back to whole image pixels. A non-positive scale
    /// is treated as 1.0.
    pub fn from_widget(x: f64, y: f64, width: f64, height: f64, scale: f64) -> Self {
        let s = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        let to_px = |v: f64| (v / s).max(0.0) as u32;
        Self::new(to_px(x), to_px(y), to_px(width), to_px(height))
    }

    /// Projects this image-space rectangle into widget space at `scale`.
    ///
    /// Returns `(x, y, width, height)` truncated to whole widget pixels.
    pub fn to_widget(&self, scale: f64) -> (i64, i64, i64, i64) {
        let p = |v: u32| (f64::from(v) * scale) as i64;
        (p(self.x), p(self.y), p(self.width), p(self.height))
    }

    /// Human-readable status line, e.g. `(2, 3) - (9, 7), w: 8, h: 5`.
    ///
    /// Corner coordinates are inclusive.
    pub fn status_label(&self) -> String {
        let x1 = (self.right()).saturating_sub(1);
        let y1 = (self.bottom()).saturating_sub(1);
        format!(
            "({}, {}) - ({}, {}), w: {}, h: {}",
            self.x, self.y, x1, y1, self.width, self.height
        )
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}x{}]", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
        assert_eq!(rect.area(), 5000);
        assert!(!rect.is_empty());
        assert!(Rect::new(0, 0, 0, 10).is_empty());
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        assert_eq!(a.intersect(&b), Some(Rect::new(50, 50, 50, 50)));
        assert_eq!(a.intersect(&Rect::new(200, 200, 5, 5)), None);
    }

    #[test]
    fn test_rect_clamp() {
        let rect = Rect::new(90, 90, 20, 20);
        assert_eq!(rect.clamp_to(100, 100), Some(Rect::new(90, 90, 10, 10)));
        assert_eq!(rect.clamp_to(50, 50), None);
    }

    #[test]
    fn test_edges_saturate_near_u32_max() {
        let rect = Rect::new(u32::MAX - 1, 0, 10, 2);
        assert_eq!(rect.right(), u32::MAX);
        assert_eq!(rect.clamp_to(4, 4), None);
        let huge = Rect::new(2, 1, u32::MAX, u32::MAX);
        assert_eq!(huge.clamp_to(4, 4), Some(Rect::new(2, 1, 2, 3)));
        assert!(huge.contains(3, 3));
    }

    #[test]
    fn test_widget_projection() {
        let rect = Rect::from_widget(40.0, 20.0, 17.0, 9.0, 4.0);
        assert_eq!(rect, Rect::new(10, 5, 4, 2));
        assert_eq!(rect.to_widget(4.0), (40, 20, 16, 8));
        assert_eq!(Rect::from_widget(8.0, 8.0, 8.0, 8.0, 0.0), Rect::new(8, 8, 8, 8));
        assert_eq!(Rect::from_widget(-3.0, 2.0, 4.0, 4.0, 1.0).x, 0);
    }

    #[test]
    fn test_status_label() {
        assert_eq!(Rect::new(2, 3, 8, 5).status_label(), "(2, 3) - (9, 7), w: 8, h: 5");
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "[1, 2, 3x4]");
    }
}
