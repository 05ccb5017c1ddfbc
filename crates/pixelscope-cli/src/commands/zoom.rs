//! Zoom step command

use crate::ZoomArgs;
use anyhow::{Result, bail};
use pixelscope_view::viewport::{set_zoom, viewport_center_in_image_coords, viewport_point_in_image_coords, zoom_about};
use pixelscope_view::{ViewerConfig, ViewportState, WidgetPoint};
use tracing::info;

pub fn run(args: ZoomArgs, config: &ViewerConfig, verbose: u8) -> Result<()> {
    if !(args.to > 0.0 && args.to.is_finite()) {
        bail!("Target scale must be a positive number, got {}", args.to);
    }
    let (vw, vh) = args.viewport;
    let base = ViewportState::with_limits(vw as f64, vh as f64, config.zoom)
        .scrolled_to(args.scroll.0.round() as i64, args.scroll.1.round() as i64);
    let start = ViewportState {
        scale: config.zoom.clamp(args.scale),
        ..base
    };

    let (next, anchor) = match args.at {
        Some((x, y)) => {
            let anchor = WidgetPoint::new(x, y);
            (zoom_about(&start, args.to / start.scale, anchor), anchor)
        }
        None => (set_zoom(&start, args.to), start.viewport_center()),
    };
    if next.scale != args.to {
        info!(requested = args.to, scale = next.scale, "zoom clamped to limits");
    }

    println!("From: {}", super::describe(&start));
    println!("To:   {}", super::describe(&next));

    if verbose > 0 {
        let before = viewport_point_in_image_coords(&start, anchor);
        let after = viewport_point_in_image_coords(&next, anchor);
        let centre = viewport_center_in_image_coords(&next);
        println!(
            "  Anchor {}: image {} -> {}",
            super::format_point(anchor.x, anchor.y),
            super::format_point(before.x, before.y),
            super::format_point(after.x, after.y)
        );
        println!("  Centre: image {}", super::format_point(centre.x, centre.y));
    }

    Ok(())
}
