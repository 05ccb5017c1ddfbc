//! Channel selection command

use crate::ChannelsArgs;
use anyhow::{Context, Result, bail};
use pixelscope_core::PixelBuffer;
use pixelscope_ops::{ChannelColors, ChannelSelection, composite_channels, select_channels};

pub fn run(args: ChannelsArgs, verbose: u8) -> Result<()> {
    if args.count == 0 {
        bail!("Channel count must be at least 1");
    }
    let requested = args.select.len();
    let selection = ChannelSelection::from(args.select).reconciled(args.count);
    let colors = ChannelColors::defaults_for(args.count);

    if requested != args.count && verbose > 0 {
        println!(
            "Note: {requested} flags given for {} channels, reconciled",
            args.count
        );
    }

    for c in 0..args.count {
        let [r, g, b] = colors.get(c);
        let state = if selection.is_selected(c) { "shown" } else { "hidden" };
        println!("  C{c}: {state:<6} #{r:02x}{g:02x}{b:02x}");
    }

    let visible = selection.effective_indices(args.count);
    if !selection.flags().iter().any(|&f| f) {
        println!("Nothing selected: showing channel 0");
    }
    println!("Visible: {visible:?}");

    if verbose > 0 {
        // Full-scale pixel through both display paths.
        let white = PixelBuffer::filled(1, 1, &vec![255u8; args.count]).context("Failed to build probe pixel")?;
        let kept = select_channels(&white, &selection)?;
        let rgb = composite_channels(&white, &selection, &colors)?;
        println!("  Selected channels: {}", kept.channels());
        println!("  Composite of full-scale pixel: {:?}", rgb.pixel(0, 0));
    }
    Ok(())
}
