//! # pixelscope-view
//!
//! Viewer state for PixelScope, independent of any GUI toolkit.
//!
//! A front end draws what [`ViewerSession::render`] returns, forwards input
//! to session methods and redraws when a [`ViewerEvent`] arrives. All the
//! arithmetic between mouse positions and image pixels lives in
//! [`viewport`].
//!
//! # Modules
//!
//! - [`viewport`] - coordinate conversion, zoom, fit-to-window
//! - [`zoom`] - fit / user-scale toggle
//! - [`tiling`] - shared zoom and scroll across comparison tiles
//! - [`state`] - the session: images, brightness, channels, bit shift, ROI
//! - [`events`] - state-change events and listeners
//! - [`config`] - RON configuration
//!
//! # Example
//!
//! ```rust
//! use pixelscope_core::PixelBuffer;
//! use pixelscope_view::{ViewerSession, WidgetPoint};
//!
//! let mut session = ViewerSession::default();
//! session.set_viewport_size(256.0, 256.0);
//! session.add_image("ramp", PixelBuffer::gray(4, 1, vec![0u8, 85, 170, 255]).unwrap());
//! session.zoom_in();
//!
//! let probe = session.probe(WidgetPoint::new(5.0, 1.0)).unwrap();
//! assert_eq!(probe.label(), "x=2 y=0 val=170");
//! assert_eq!(session.status().scale, "Scale: 2.00x");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod events;
pub mod state;
pub mod tiling;
pub mod viewport;
pub mod zoom;

pub use config::{ConfigError, ConfigResult, ViewerConfig};
pub use events::{ListenerId, Listeners, ViewerEvent};
pub use state::{ImageEntry, PixelProbe, Status, ViewerSession};
pub use tiling::{Axis, Tile, TileSync};
pub use viewport::{
    ImagePoint, ViewportState, WidgetPoint, ZoomLimits, fit_to_window, image_point_to_widget_point,
    set_zoom, set_zoom_at_point, viewport_center_in_image_coords, widget_point_to_image_point,
};
pub use zoom::{FitToggle, toggle_fit_zoom};
