//! Fit-to-window toggle.
//!
//! One key flips between "whatever zoom the user chose" and "fit the whole
//! image". Going to fit remembers the user's scale and the image point at the
//! viewport centre; coming back restores both.
//!
//! ```text
//!            toggle (remember scale + centre, fit)
//!  AtUserScale ------------------------------------> AtFit
//!       ^                                              |
//!       +----------------------------------------------+
//!            toggle while scale == fit_scale (restore)
//! ```
//!
//! If the user zooms away from the fit scale while in `AtFit`, the next
//! toggle behaves as from `AtUserScale`: the current view is remembered and
//! fit is applied again.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::viewport::{
    ImagePoint, ViewportState, fit_to_window_within, set_zoom, set_zoom_at_point,
    viewport_center_in_image_coords,
};

/// Scales closer than this count as "at fit".
pub const FIT_TOLERANCE: f64 = 1e-6;

/// Two-state fit toggle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FitToggle {
    /// The view is at a scale the user picked.
    #[default]
    AtUserScale,
    /// The view was fitted to the window.
    AtFit {
        /// Scale that fit produced.
        fit_scale: f64,
        /// Scale to return to.
        remembered_scale: f64,
        /// Image point to centre on when returning.
        remembered_center: ImagePoint,
    },
}

impl FitToggle {
    /// Returns `true` if `state` is still showing the fitted view.
    pub fn is_at_fit(&self, state: &ViewportState) -> bool {
        match self {
            Self::AtFit { fit_scale, .. } => (state.scale - fit_scale).abs() < FIT_TOLERANCE,
            Self::AtUserScale => false,
        }
    }
}

/// Flips between the user's zoom and fit-to-window.
///
/// `image_dims` is `(height, width)` in image pixels.
pub fn toggle_fit_zoom(
    state: &ViewportState,
    image_dims: (usize, usize),
    toggle: FitToggle,
) -> (ViewportState, FitToggle) {
    if let FitToggle::AtFit {
        remembered_scale,
        remembered_center,
        ..
    } = toggle
    {
        if toggle.is_at_fit(state) {
            debug!(scale = remembered_scale, "fit toggle: restoring user zoom");
            let restored = set_zoom_at_point(state, remembered_scale, remembered_center);
            return (restored, FitToggle::AtUserScale);
        }
    }

    let remembered_center = viewport_center_in_image_coords(state);
    let (h, w) = image_dims;
    let fit = fit_to_window_within(h, w, state.viewport_height, state.viewport_width, &state.limits);
    let fitted = set_zoom(state, fit);
    debug!(from = state.scale, fit = fitted.scale, "fit toggle: fitting to window");
    (
        fitted,
        FitToggle::AtFit {
            fit_scale: fitted.scale,
            remembered_scale: state.scale,
            remembered_center,
        },
    )
}
