//! CLI command implementations

pub mod channels;
pub mod config;
pub mod fit;
pub mod lut;
pub mod zoom;

use pixelscope_view::ViewportState;

/// `(x, y)` with up to three decimals, trailing zeros dropped.
pub fn format_point(x: f64, y: f64) -> String {
    format!("({}, {})", trim_float(x), trim_float(y))
}

/// Float with up to three decimals, trailing zeros dropped.
pub fn trim_float(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// One-line summary of a viewport.
pub fn describe(state: &ViewportState) -> String {
    format!(
        "{}  scroll ({}, {})",
        state.scale_label(),
        state.scroll_x,
        state.scroll_y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_float() {
        assert_eq!(trim_float(2.0), "2");
        assert_eq!(trim_float(0.125), "0.125");
        assert_eq!(trim_float(10.5), "10.5");
        assert_eq!(trim_float(-0.0001), "0");
    }

    #[test]
    fn test_describe() {
        let state = ViewportState::new(100.0, 100.0).scrolled_to(12, 3);
        assert_eq!(describe(&state), "Scale: 1.00x  scroll (12, 3)");
        assert_eq!(format_point(1.5, 2.0), "(1.5, 2)");
    }
}
