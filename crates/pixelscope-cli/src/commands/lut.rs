//! Brightness remap command

use crate::LutArgs;
use anyhow::{Result, bail};
use pixelscope_core::SampleKind;
use pixelscope_ops::BrightnessParams;
use pixelscope_ops::brightness::{brightness_lut, snap_gain_within};
use pixelscope_view::ViewerConfig;
use tracing::debug;

const RAMP_STEPS: usize = 8;

pub fn run(args: LutArgs, config: &ViewerConfig, verbose: u8) -> Result<()> {
    let kind: SampleKind = args.kind.into();
    let params = resolve_params(&args, kind, config.gain_log2_range)?;
    debug!(?kind, ?params, "lut");

    println!("{} ({})", params.status_label(kind), kind.label());
    if params.is_passthrough() {
        println!("Saturation is 0: input passes through unchanged");
        return Ok(());
    }

    let levels = if args.levels.is_empty() { ramp(kind, &params) } else { args.levels };
    let lut = (kind == SampleKind::U8).then(|| brightness_lut(&params));
    for level in levels {
        let out = match &lut {
            Some(lut) => lut[level.round().clamp(0.0, 255.0) as usize],
            None => params.map(level),
        };
        println!("{:>12} -> {out:>3}", super::trim_float(level));
    }

    if verbose > 0 {
        println!("  Full white at input {}", super::trim_float(white_point(&params)));
    }
    Ok(())
}

/// Params from the flags, falling back to the kind's defaults.
fn resolve_params(args: &LutArgs, kind: SampleKind, gain_range: (i32, i32)) -> Result<BrightnessParams> {
    let defaults = BrightnessParams::defaults_for(kind);
    let mut params = BrightnessParams::new(
        args.offset.unwrap_or(defaults.offset),
        args.gain.unwrap_or(defaults.gain),
        args.saturation.unwrap_or(defaults.saturation),
    );
    if params.saturation < 0.0 || !params.saturation.is_finite() {
        bail!("Saturation must be a non-negative number, got {}", params.saturation);
    }
    if args.snap {
        params.gain = snap_gain_within(params.gain, gain_range.0, gain_range.1);
    }
    Ok(params)
}

/// Input level that maps to 255.
fn white_point(params: &BrightnessParams) -> f64 {
    if params.gain == 0.0 {
        f64::INFINITY
    } else {
        params.offset + params.saturation / params.gain
    }
}

/// Evenly spaced levels from the offset up to the white point.
fn ramp(kind: SampleKind, params: &BrightnessParams) -> Vec<f64> {
    let mut top = white_point(params);
    if kind == SampleKind::U8 || !top.is_finite() {
        top = top.min(255.0);
    }
    let bottom = params.offset.min(top);
    (0..=RAMP_STEPS)
        .map(|i| {
            let v = bottom + (top - bottom) * i as f64 / RAMP_STEPS as f64;
            if kind.is_float() { v } else { v.round() }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_u16_defaults() {
        let params = BrightnessParams::defaults_for(SampleKind::U16);
        let levels = ramp(SampleKind::U16, &params);
        assert_eq!(levels.len(), RAMP_STEPS + 1);
        assert_eq!(levels[0], 0.0);
        assert_eq!(levels[RAMP_STEPS], 1023.0);
        assert_eq!(params.map(levels[RAMP_STEPS]), 255);
    }

    #[test]
    fn test_ramp_float_with_gain() {
        let params = BrightnessParams::new(0.0, 4.0, 1.0);
        let levels = ramp(SampleKind::F32, &params);
        assert_eq!(levels[RAMP_STEPS], 0.25);
        assert_eq!(levels[4], 0.125);
    }

    #[test]
    fn test_white_point() {
        assert_eq!(white_point(&BrightnessParams::new(10.0, 2.0, 100.0)), 60.0);
        assert!(white_point(&BrightnessParams::new(0.0, 0.0, 1.0)).is_infinite());
    }
}
