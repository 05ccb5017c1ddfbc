//! Viewer session state.
//!
//! [`ViewerSession`] owns everything a viewer window shows: the list of open
//! images, the current index, the viewport, the fit toggle, channel
//! visibility and colours, brightness parameters remembered per sample kind,
//! each image's bit shift and the region of interest. Every mutating method
//! emits a [`ViewerEvent`] to the registered listeners.
//!
//! The session never mutates an opened image. The displayed frame is always
//! recomputed from the stored original: bit shift, then brightness, then the
//! channel colour composite.

use pixelscope_core::{AnyBuffer, Error, PixelBuffer, Rect, Result, SampleKind};
use pixelscope_ops::bitshift::apply_bit_shift_any;
use pixelscope_ops::brightness::snap_gain_within;
use pixelscope_ops::diff::diff_name;
use pixelscope_ops::{
    BrightnessMemory, BrightnessParams, ChannelColors, ChannelSelection, apply_brightness_any,
    composite_channels, difference_any,
};
use tracing::{debug, info, trace};

use crate::config::ViewerConfig;
use crate::events::{ListenerId, Listeners, ViewerEvent};
use crate::viewport::{self, ImagePoint, ViewportState, WidgetPoint};
use crate::zoom::{FitToggle, toggle_fit_zoom};

/// One opened image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    name: String,
    original: AnyBuffer,
    shift: i32,
}

impl ImageEntry {
    /// Wraps a decoded buffer.
    pub fn new(name: impl Into<String>, original: impl Into<AnyBuffer>) -> Self {
        Self {
            name: name.into(),
            original: original.into(),
            shift: 0,
        }
    }

    /// Display name (usually the file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The buffer as loaded, never modified.
    pub fn original(&self) -> &AnyBuffer {
        &self.original
    }

    /// Accumulated bit shift.
    pub fn shift(&self) -> i32 {
        self.shift
    }

    /// Sample kind of the original.
    pub fn kind(&self) -> SampleKind {
        self.original.kind()
    }

    /// `(height, width)` of the original.
    pub fn dims(&self) -> (usize, usize) {
        (self.original.height(), self.original.width())
    }

    /// Buffer that display transforms start from: the bit-shifted view for
    /// integer images with a non-zero shift, otherwise the original.
    pub fn display_source(&self) -> AnyBuffer {
        if self.shift != 0 {
            if let Some(shifted) = apply_bit_shift_any(&self.original, self.shift) {
                return AnyBuffer::U8(shifted);
            }
        }
        self.original.clone()
    }
}

/// Pixel value under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelProbe {
    /// Image column.
    pub x: usize,
    /// Image row.
    pub y: usize,
    /// Sample values of the original image.
    pub values: Vec<f64>,
    /// Kind of the samples, for formatting.
    pub kind: SampleKind,
}

impl PixelProbe {
    /// Status text, e.g. `x=3 y=4 val=(1,2,3)` or `x=0 y=0 val=0.500`.
    pub fn label(&self) -> String {
        let fmt = |v: f64| {
            if self.kind.is_float() {
                format!("{v:.3}")
            } else {
                format!("{}", v as i64)
            }
        };
        let val = match self.values.as_slice() {
            [single] => fmt(*single),
            many => format!("({})", many.iter().map(|&v| fmt(v)).collect::<Vec<_>>().join(",")),
        };
        format!("x={} y={} val={val}", self.x, self.y)
    }
}

/// Status-bar texts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    /// Window title: index, name, size and channel count.
    pub title: String,
    /// Current scale.
    pub scale: String,
    /// Brightness parameters, empty without an image.
    pub brightness: String,
    /// Bit shift, empty without an image.
    pub shift: String,
    /// ROI description, empty without an ROI.
    pub roi: String,
}

/// Explicit application state of one viewer window.
#[derive(Debug)]
pub struct ViewerSession {
    config: ViewerConfig,
    images: Vec<ImageEntry>,
    current: Option<usize>,
    viewport: ViewportState,
    fit: FitToggle,
    selection: ChannelSelection,
    colors: Option<ChannelColors>,
    brightness: BrightnessMemory,
    roi: Option<Rect>,
    listeners: Listeners,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerSession {
    /// Empty session using `config`.
    pub fn new(config: ViewerConfig) -> Self {
        let viewport = ViewportState::with_limits(0.0, 0.0, config.zoom);
        Self {
            config,
            images: Vec::new(),
            current: None,
            viewport,
            fit: FitToggle::AtUserScale,
            selection: ChannelSelection::default(),
            colors: None,
            brightness: BrightnessMemory::new(),
            roi: None,
            listeners: Listeners::new(),
        }
    }

    // === Listeners ===

    /// Registers a callback run after every state change.
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ViewerEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Removes a callback.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&mut self, event: ViewerEvent) {
        self.listeners.emit(&event);
    }

    fn emit_viewport(&mut self) {
        let v = self.viewport;
        self.emit(ViewerEvent::ViewportChanged {
            scale: v.scale,
            scroll_x: v.scroll_x,
            scroll_y: v.scroll_y,
        });
    }

    // === Accessors ===

    /// Active configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// All opened images.
    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    /// Index of the current image.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The current image.
    pub fn current(&self) -> Option<&ImageEntry> {
        self.current.and_then(|i| self.images.get(i))
    }

    /// Viewport of the current view.
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Fit toggle state.
    pub fn fit_toggle(&self) -> FitToggle {
        self.fit
    }

    /// Channel visibility flags.
    pub fn channel_selection(&self) -> &ChannelSelection {
        &self.selection
    }

    /// Channel colours, once an image has been shown.
    pub fn channel_colors(&self) -> Option<&ChannelColors> {
        self.colors.as_ref()
    }

    /// Region of interest in image coordinates.
    pub fn roi(&self) -> Option<Rect> {
        self.roi
    }

    /// Brightness parameters in effect for the current image.
    pub fn brightness(&self) -> BrightnessParams {
        let kind = self.current().map_or(SampleKind::U8, ImageEntry::kind);
        self.brightness.get(kind)
    }

    // === Image list ===

    /// Appends an image and makes it current. Returns its index.
    pub fn add_image(&mut self, name: impl Into<String>, buffer: impl Into<AnyBuffer>) -> usize {
        let entry = ImageEntry::new(name, buffer);
        let index = self.images.len();
        info!(index, name = entry.name(), kind = ?entry.kind(), "image added");
        let name = entry.name.clone();
        self.images.push(entry);
        self.emit(ViewerEvent::ImageAdded { index, name });
        self.switch_to(Some(index));
        index
    }

    /// Moves to the next image, wrapping around.
    pub fn next_image(&mut self) {
        if let Some(i) = self.current {
            let n = self.images.len();
            self.switch_to(Some((i + 1) % n));
        }
    }

    /// Moves to the previous image, wrapping around.
    pub fn prev_image(&mut self) {
        if let Some(i) = self.current {
            let n = self.images.len();
            self.switch_to(Some((i + n - 1) % n));
        }
    }

    /// Makes image `index` current. Out-of-range indices are ignored.
    pub fn show_image(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.switch_to(Some(index));
            true
        } else {
            false
        }
    }

    /// Closes the current image; the next one (or the new last) becomes current.
    pub fn close_current(&mut self) {
        let Some(i) = self.current else {
            return;
        };
        self.images.remove(i);
        debug!(index = i, remaining = self.images.len(), "image closed");
        self.emit(ViewerEvent::ImageClosed { index: i });
        let next = (!self.images.is_empty()).then(|| i.min(self.images.len() - 1));
        self.switch_to(next);
    }

    /// Closes every image.
    pub fn close_all(&mut self) {
        let count = self.images.len();
        self.images.clear();
        debug!(count, "all images closed");
        for index in (0..count).rev() {
            self.emit(ViewerEvent::ImageClosed { index });
        }
        self.switch_to(None);
    }

    /// Common bookkeeping when the current image changes.
    ///
    /// Resets the fit toggle and reconciles channel state to the new image.
    /// Brightness needs no work here: it is looked up per sample kind.
    fn switch_to(&mut self, index: Option<usize>) {
        self.current = index;
        self.fit = FitToggle::AtUserScale;
        if let Some(entry) = index.and_then(|i| self.images.get(i)) {
            let channels = entry.original().channels();
            if channels > 1 {
                if self.selection.is_empty() {
                    self.selection = ChannelSelection::all(channels);
                } else {
                    self.selection.reconcile(channels);
                }
                match &mut self.colors {
                    Some(colors) => colors.reconcile(channels),
                    None => self.colors = Some(ChannelColors::defaults_for(channels)),
                }
            }
            debug!(index = ?index, channels, kind = ?entry.kind(), "current image changed");
        }
        self.emit(ViewerEvent::ImageChanged { index });
    }

    // === Viewport ===

    /// Records the visible area of the image widget.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = self.viewport.resized(width, height);
        self.emit_viewport();
    }

    /// Scrolls the view, clamping to non-negative positions.
    pub fn scroll_to(&mut self, x: i64, y: i64) {
        self.viewport = self.viewport.scrolled_to(x, y);
        self.emit_viewport();
    }

    /// Zooms keeping the viewport centre fixed.
    pub fn set_zoom(&mut self, scale: f64) {
        self.viewport = viewport::set_zoom(&self.viewport, scale);
        self.emit_viewport();
    }

    /// Zooms and centres the view on `image_point`.
    pub fn zoom_at(&mut self, scale: f64, image_point: ImagePoint) {
        self.viewport = viewport::set_zoom_at_point(&self.viewport, scale, image_point);
        self.emit_viewport();
    }

    /// Multiplies the scale by `factor` keeping the point under `anchor` fixed.
    pub fn zoom_about(&mut self, factor: f64, anchor: WidgetPoint) {
        self.viewport = viewport::zoom_about(&self.viewport, factor, anchor);
        self.emit_viewport();
    }

    /// Doubles the scale.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.viewport.scale * 2.0);
    }

    /// Halves the scale.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.viewport.scale / 2.0);
    }

    /// Fits the current image into the viewport at a power-of-two scale.
    pub fn fit_to_window(&mut self) {
        let Some((h, w)) = self.current().map(ImageEntry::dims) else {
            return;
        };
        let v = &self.viewport;
        let fit = viewport::fit_to_window_within(h, w, v.viewport_height, v.viewport_width, &v.limits);
        self.set_zoom(fit);
    }

    /// Flips between the user's zoom and fit-to-window.
    pub fn toggle_fit(&mut self) {
        let Some(dims) = self.current().map(ImageEntry::dims) else {
            return;
        };
        let (viewport, fit) = toggle_fit_zoom(&self.viewport, dims, self.fit);
        self.viewport = viewport;
        self.fit = fit;
        self.emit_viewport();
        let at_fit = matches!(fit, FitToggle::AtFit { .. });
        self.emit(ViewerEvent::FitToggled { at_fit });
    }

    // === Brightness ===

    fn current_kind(&self) -> Option<SampleKind> {
        self.current().map(ImageEntry::kind)
    }

    /// Sets brightness parameters for the current image's sample kind.
    pub fn set_brightness(&mut self, params: BrightnessParams) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        self.brightness.remember(kind, params);
        debug!(?kind, ?params, "brightness set");
        self.emit(ViewerEvent::BrightnessChanged { kind, params });
    }

    /// Halves (`amount < 0`) or doubles the gain, snapped to a power of two
    /// within the configured exponent range.
    pub fn step_gain(&mut self, amount: i32) {
        let current = self.brightness();
        let mut params = current.step_gain(amount);
        let (lo, hi) = self.config.gain_log2_range;
        params.gain = snap_gain_within(params.gain, lo, hi);
        self.set_brightness(params);
    }

    /// Restores the defaults for the current image's sample kind.
    pub fn reset_brightness(&mut self) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let params = self.brightness.reset(kind);
        self.emit(ViewerEvent::BrightnessChanged { kind, params });
    }

    // === Channels ===

    /// Replaces the channel visibility flags.
    pub fn set_channel_selection(&mut self, selection: ChannelSelection) {
        self.selection = selection;
        if let Some(channels) = self.current().map(|e| e.original().channels()) {
            self.selection.reconcile(channels);
        }
        self.emit(ViewerEvent::ChannelsChanged {
            selection: self.selection.clone(),
        });
    }

    /// Replaces the channel colours.
    pub fn set_channel_colors(&mut self, mut colors: ChannelColors) {
        if let Some(channels) = self.current().map(|e| e.original().channels()) {
            colors.reconcile(channels);
        }
        self.colors = Some(colors);
        self.emit(ViewerEvent::ChannelsChanged {
            selection: self.selection.clone(),
        });
    }

    // === Bit shift ===

    /// Adds `amount` to the current image's bit shift.
    ///
    /// Returns the new shift, or `None` when there is no current image or it
    /// holds float samples.
    pub fn bit_shift(&mut self, amount: i32) -> Option<i32> {
        let i = self.current?;
        let entry = self.images.get_mut(i)?;
        if entry.kind().is_float() {
            return None;
        }
        entry.shift = entry.shift.saturating_add(amount);
        let shift = entry.shift;
        debug!(index = i, shift, "bit shift");
        self.emit(ViewerEvent::BitShiftChanged { shift });
        Some(shift)
    }

    // === ROI ===

    /// Sets the ROI from a rectangle drawn in widget coordinates.
    pub fn set_roi_from_widget(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let rect = Rect::from_widget(x, y, width, height, self.viewport.scale);
        self.set_roi(rect);
    }

    /// Sets the ROI in image coordinates, clipped to the current image.
    ///
    /// A rectangle that misses the image clears the ROI.
    pub fn set_roi(&mut self, rect: Rect) {
        let roi = match self.current() {
            Some(entry) => {
                let b = entry.original().bounds();
                rect.clamp_to(b.width, b.height)
            }
            None => Some(rect).filter(|r| !r.is_empty()),
        };
        self.roi = roi;
        self.emit(ViewerEvent::RoiChanged { roi });
    }

    /// Selects the whole current image.
    pub fn select_all(&mut self) {
        if let Some(bounds) = self.current().map(|e| e.original().bounds()) {
            self.set_roi(bounds);
        }
    }

    /// Removes the ROI.
    pub fn clear_roi(&mut self) {
        self.roi = None;
        self.emit(ViewerEvent::RoiChanged { roi: None });
    }

    /// The original pixels under the ROI, or the whole image without one.
    ///
    /// `None` when no image is open.
    pub fn roi_buffer(&self) -> Option<Result<AnyBuffer>> {
        let entry = self.current()?;
        Some(match self.roi {
            Some(rect) => entry.original().crop(rect),
            None => Ok(entry.original().clone()),
        })
    }

    // === Difference ===

    /// Appends `images[a] - images[b] + offset` as a new image and shows it.
    ///
    /// `offset` defaults to the configured diff offset.
    pub fn create_difference(&mut self, a: usize, b: usize, offset: Option<i64>) -> Result<usize> {
        let n = self.images.len();
        let (Some(ea), Some(eb)) = (self.images.get(a), self.images.get(b)) else {
            return Err(Error::invalid_shape(format!(
                "difference needs images {a} and {b}, only {n} open"
            )));
        };
        let offset = offset.unwrap_or(self.config.diff_offset);
        let diff = difference_any(ea.original(), eb.original(), offset)?;
        Ok(self.add_image(diff_name(a, b), diff))
    }

    // === Output ===

    /// Original pixel under a widget position inside the image widget.
    pub fn probe(&self, at: WidgetPoint) -> Option<PixelProbe> {
        let entry = self.current()?;
        let p = viewport::widget_point_to_image_point(at, self.viewport.scale);
        // Truncate toward zero: slightly negative positions still hit pixel 0.
        let (x, y) = (p.x as i64, p.y as i64);
        let values = match entry.original().checked_pixel_f64(x, y) {
            Ok(values) => values,
            Err(err) => {
                trace!(%err, "probe outside image");
                return None;
            }
        };
        Some(PixelProbe {
            x: x as usize,
            y: y as usize,
            values,
            kind: entry.kind(),
        })
    }

    /// The current image as an 8-bit frame ready to draw.
    ///
    /// Single-channel images come out as one channel; anything else as the
    /// RGB colour composite of the visible channels.
    pub fn render(&self) -> Option<Result<PixelBuffer<u8>>> {
        let entry = self.current()?;
        Some(self.render_entry(entry))
    }

    fn render_entry(&self, entry: &ImageEntry) -> Result<PixelBuffer<u8>> {
        let source = entry.display_source();
        let params = self.brightness.get(source.kind());
        let shown = if params.is_display_identity(source.kind()) {
            source
        } else {
            apply_brightness_any(&source, &params)
        };
        let Some(shown) = shown.into_u8() else {
            return Err(Error::invalid_shape(
                "brightness saturation is 0 for a non 8-bit image; nothing to display",
            ));
        };
        if shown.channels() == 1 {
            return Ok(shown);
        }
        let colors = self
            .colors
            .clone()
            .unwrap_or_else(|| ChannelColors::defaults_for(shown.channels()));
        composite_channels(&shown, &self.selection, &colors)
    }

    /// Status-bar texts for the current state.
    pub fn status(&self) -> Status {
        let scale = self.viewport.scale_label();
        let Some(entry) = self.current() else {
            return Status {
                title: "PixelScope".to_string(),
                scale,
                ..Status::default()
            };
        };
        let i = self.current.unwrap_or_default();
        let (h, w) = entry.dims();
        Status {
            title: format!(
                "[{}/{}]  {} - {}x{}, {}ch",
                i + 1,
                self.images.len(),
                entry.name(),
                w,
                h,
                entry.original().channels()
            ),
            scale,
            brightness: self.brightness().status_label(entry.kind()),
            shift: format!("Shift: {:+}", entry.shift()),
            roi: self.roi.map(|r| r.status_label()).unwrap_or_default(),
        }
    }
}
