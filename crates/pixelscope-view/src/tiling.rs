//! Synchronised zoom and scroll across comparison tiles.
//!
//! In tiling mode several images are shown side by side at one shared
//! scale. Zooming in any tile zooms all of them, and scrolling one tile moves
//! the others so the same relative part of each image stays visible, even
//! when the images differ in size.

use tracing::{debug, trace};

use crate::viewport::{WidgetPoint, ZoomLimits};

/// Geometry and scroll of one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Image width in pixels.
    pub image_width: usize,
    /// Image height in pixels.
    pub image_height: usize,
    /// Visible area width in widget pixels.
    pub viewport_width: f64,
    /// Visible area height in widget pixels.
    pub viewport_height: f64,
    /// Horizontal scroll in widget pixels.
    pub scroll_x: i64,
    /// Vertical scroll in widget pixels.
    pub scroll_y: i64,
}

impl Tile {
    /// A tile showing a `width x height` image in a `vw x vh` viewport.
    pub fn new(image_width: usize, image_height: usize, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            image_width,
            image_height,
            viewport_width,
            viewport_height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    /// Largest scroll position at `scale` on each axis.
    pub fn max_scroll(&self, scale: f64) -> (i64, i64) {
        let max = |img: usize, vp: f64| ((img as f64 * scale - vp).round() as i64).max(0);
        (
            max(self.image_width, self.viewport_width),
            max(self.image_height, self.viewport_height),
        )
    }

    fn scroll_clamped(&mut self, x: i64, y: i64, scale: f64) {
        let (mx, my) = self.max_scroll(scale);
        self.scroll_x = x.clamp(0, mx);
        self.scroll_y = y.clamp(0, my);
    }
}

/// Which scroll axis moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal scroll.
    Horizontal,
    /// Vertical scroll.
    Vertical,
}

/// Shared zoom and scroll state for a group of tiles.
#[derive(Debug, Clone)]
pub struct TileSync {
    tiles: Vec<Tile>,
    scale: f64,
    limits: ZoomLimits,
    active: usize,
    at_fit: bool,
    previous_scale: f64,
}

impl TileSync {
    /// Groups `tiles` at scale 1.0 with tile 0 active.
    pub fn new(tiles: Vec<Tile>, limits: ZoomLimits) -> Self {
        Self {
            tiles,
            scale: limits.clamp(1.0),
            limits,
            active: 0,
            at_fit: false,
            previous_scale: 1.0,
        }
    }

    /// The shared scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// All tiles.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Index of the active tile.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Whether the last zoom action was a fit.
    pub fn is_at_fit(&self) -> bool {
        self.at_fit
    }

    /// Makes tile `index` active. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.tiles.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Multiplies the shared scale by `factor`.
    ///
    /// The image point under `anchor` in the active tile (or its viewport
    /// centre when `anchor` is `None`) stays under that widget position. The
    /// resulting scroll is clamped per tile; the active tile's scroll is
    /// returned.
    pub fn adjust_zoom(&mut self, factor: f64, anchor: Option<WidgetPoint>) -> Option<(i64, i64)> {
        let src = *self.tiles.get(self.active)?;
        let anchor = anchor.unwrap_or(WidgetPoint::new(src.viewport_width / 2.0, src.viewport_height / 2.0));
        let image_x = (src.scroll_x as f64 + anchor.x) / self.scale;
        let image_y = (src.scroll_y as f64 + anchor.y) / self.scale;

        self.scale = self.limits.clamp(self.scale * factor);
        self.at_fit = false;

        let sx = (image_x * self.scale - anchor.x).round() as i64;
        let sy = (image_y * self.scale - anchor.y).round() as i64;
        let scale = self.scale;
        for tile in &mut self.tiles {
            tile.scroll_clamped(sx, sy, scale);
        }
        let active = self.tiles.get(self.active)?;
        debug!(factor, scale, scroll_x = active.scroll_x, scroll_y = active.scroll_y, "tiles zoomed");
        Some((active.scroll_x, active.scroll_y))
    }

    /// Toggles between fit-to-window of the active tile and the previous scale.
    ///
    /// Fit never zooms past 1:1 and snaps to a power of two.
    pub fn toggle_fit(&mut self) {
        let Some(src) = self.tiles.get(self.active).or_else(|| self.tiles.first()).copied() else {
            return;
        };
        if self.at_fit {
            self.scale = self.previous_scale;
            self.at_fit = false;
        } else {
            self.previous_scale = self.scale;
            let fit_w = if src.image_width > 0 { src.viewport_width / src.image_width as f64 } else { 1.0 };
            let fit_h = if src.image_height > 0 { src.viewport_height / src.image_height as f64 } else { 1.0 };
            let fit = self.limits.clamp(fit_w.min(fit_h).min(1.0));
            self.scale = self.limits.clamp(2f64.powi(fit.log2().round_ties_even() as i32));
            self.at_fit = true;
        }
        debug!(scale = self.scale, at_fit = self.at_fit, "tiles fit toggled");
        self.sync_scroll(self.active, Axis::Horizontal);
        self.sync_scroll(self.active, Axis::Vertical);
    }

    /// Scrolls tile `index` and propagates the move to the others.
    pub fn set_scroll(&mut self, index: usize, x: i64, y: i64) {
        let scale = self.scale;
        let Some(tile) = self.tiles.get_mut(index) else {
            return;
        };
        tile.scroll_clamped(x, y, scale);
        self.sync_scroll(index, Axis::Horizontal);
        self.sync_scroll(index, Axis::Vertical);
    }

    /// Copies tile `from`'s scroll on `axis` to every other tile.
    ///
    /// Positions are matched by the relative location of the viewport centre
    /// within the scaled image, so images of different sizes stay aligned.
    pub fn sync_scroll(&mut self, from: usize, axis: Axis) {
        let Some(src) = self.tiles.get(from).copied() else {
            return;
        };
        let scale = self.scale;
        let (value, page, content) = axis_of(&src, axis, scale);
        if content <= 0.0 {
            return;
        }
        let ratio = ((value as f64 + page / 2.0) / content).clamp(0.0, 1.0);
        trace!(from, ?axis, ratio, "sync_scroll");

        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if i == from {
                continue;
            }
            let (_, page, content) = axis_of(tile, axis, scale);
            if content <= 0.0 {
                continue;
            }
            let target = (ratio * content - page / 2.0).round() as i64;
            let (mx, my) = tile.max_scroll(scale);
            match axis {
                Axis::Horizontal => tile.scroll_x = target.clamp(0, mx),
                Axis::Vertical => tile.scroll_y = target.clamp(0, my),
            }
        }
    }
}

/// `(scroll, viewport extent, scaled image extent)` along one axis.
fn axis_of(tile: &Tile, axis: Axis, scale: f64) -> (i64, f64, f64) {
    match axis {
        Axis::Horizontal => (tile.scroll_x, tile.viewport_width, tile.image_width as f64 * scale),
        Axis::Vertical => (tile.scroll_y, tile.viewport_height, tile.image_height as f64 * scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TileSync {
        TileSync::new(
            vec![Tile::new(1000, 800, 200.0, 200.0), Tile::new(500, 400, 200.0, 200.0)],
            ZoomLimits::default(),
        )
    }

    #[test]
    fn test_adjust_zoom_keeps_anchor_and_shares_scroll() {
        let mut sync = pair();
        sync.set_scroll(0, 100, 100);
        let scroll = sync.adjust_zoom(2.0, Some(WidgetPoint::new(50.0, 50.0))).unwrap();
        assert_eq!(sync.scale(), 2.0);
        // image point (150, 150) stays under widget (50, 50)
        assert_eq!(scroll, (250, 250));
        assert_eq!((sync.tiles()[0].scroll_x, sync.tiles()[0].scroll_y), (250, 250));
        assert_eq!((sync.tiles()[1].scroll_x, sync.tiles()[1].scroll_y), (250, 250));
    }

    #[test]
    fn test_adjust_zoom_returns_clamped_scroll() {
        let mut sync = TileSync::new(
            vec![Tile::new(100, 100, 200.0, 200.0), Tile::new(100, 100, 200.0, 200.0)],
            ZoomLimits::default(),
        );
        // anchor asks for 600 but a 400px image in a 200px viewport stops at 200
        let scroll = sync.adjust_zoom(4.0, Some(WidgetPoint::new(200.0, 200.0))).unwrap();
        assert_eq!(scroll, (200, 200));
        for tile in sync.tiles() {
            assert_eq!((tile.scroll_x, tile.scroll_y), scroll);
        }
    }

    #[test]
    fn test_zoom_clamped_to_limits() {
        let mut sync = pair();
        for _ in 0..10 {
            sync.adjust_zoom(2.0, None);
        }
        assert_eq!(sync.scale(), 16.0);
        for _ in 0..20 {
            sync.adjust_zoom(0.5, None);
        }
        assert_eq!(sync.scale(), 0.125);
    }

    #[test]
    fn test_toggle_fit_round_trip() {
        let mut sync = pair();
        sync.adjust_zoom(4.0, None);
        sync.toggle_fit();
        assert!(sync.is_at_fit());
        // 200 / 1000 = 0.2 snaps to 0.25
        assert_eq!(sync.scale(), 0.25);
        sync.toggle_fit();
        assert_eq!(sync.scale(), 4.0);
        assert!(!sync.is_at_fit());
    }

    #[test]
    fn test_fit_never_exceeds_one() {
        let mut sync = TileSync::new(vec![Tile::new(10, 10, 500.0, 500.0)], ZoomLimits::default());
        sync.toggle_fit();
        assert_eq!(sync.scale(), 1.0);
    }

    #[test]
    fn test_sync_scroll_by_relative_centre() {
        let mut sync = pair();
        // tile 0: centre at (400 + 100) / 1000 = 0.5 of its width
        sync.set_scroll(0, 400, 0);
        // tile 1: 0.5 * 500 - 100 = 150
        assert_eq!(sync.tiles()[1].scroll_x, 150);
        assert_eq!(sync.tiles()[1].scroll_y, 0);
    }

    #[test]
    fn test_active_tile_bounds() {
        let mut sync = pair();
        assert!(sync.set_active(1));
        assert!(!sync.set_active(5));
        assert_eq!(sync.active(), 1);
        let mut empty = TileSync::new(Vec::new(), ZoomLimits::default());
        assert!(empty.adjust_zoom(2.0, None).is_none());
        empty.toggle_fit();
        assert_eq!(empty.scale(), 1.0);
    }
}
