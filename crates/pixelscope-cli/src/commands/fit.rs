//! Fit-to-window command

use crate::FitArgs;
use anyhow::Result;
use pixelscope_view::viewport::{fit_to_window_within, set_zoom};
use pixelscope_view::{FitToggle, ViewerConfig, ViewportState, toggle_fit_zoom};
use tracing::debug;

pub fn run(args: FitArgs, config: &ViewerConfig, verbose: u8) -> Result<()> {
    let (iw, ih) = args.image;
    let (vw, vh) = args.viewport;
    let limits = config.zoom;

    let scale = fit_to_window_within(ih, iw, vh as f64, vw as f64, &limits);
    debug!(iw, ih, vw, vh, scale, "fit");
    println!("Fit scale: {}", super::trim_float(scale));

    if verbose > 0 {
        if iw > 0 && ih > 0 {
            let raw = (vh as f64 / ih as f64).min(vw as f64 / iw as f64);
            println!("  Unsnapped: {raw:.4}");
        }
        println!("  Limits: [{}, {}]", limits.min, limits.max);
        println!(
            "  Displayed: {}x{}",
            (iw as f64 * scale).round(),
            (ih as f64 * scale).round()
        );
    }

    if let Some(from) = args.from {
        let start = set_zoom(&ViewportState::with_limits(vw as f64, vh as f64, limits), from);
        let (fitted, toggle) = toggle_fit_zoom(&start, (ih, iw), FitToggle::AtUserScale);
        let (back, _) = toggle_fit_zoom(&fitted, (ih, iw), toggle);
        println!("Toggle: {}", super::describe(&start));
        println!("    ->  {}", super::describe(&fitted));
        println!("    ->  {}", super::describe(&back));
    }

    Ok(())
}
