//! pxs - PixelScope inspection CLI
//!
//! Runs the viewer's zoom, brightness and channel logic without a window,
//! for checking what a given setting will show.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pixelscope_core::SampleKind;
use pixelscope_view::ViewerConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pxs")]
#[command(author, version, about = "PixelScope viewport and display inspector")]
#[command(long_about = "
Evaluates PixelScope's viewer math from the command line.

Examples:
  pxs fit 4000x3000 1280x720               # Fit scale for an image
  pxs zoom 1280x720 --scale 1 --to 4       # Zoom about the viewport centre
  pxs zoom 1280x720 --to 2 --at 100,50     # Zoom about the mouse position
  pxs lut --gain 2 --saturation 1023 -k u16 -l 0,256,512,1023
  pxs channels 4 --select 1,0,1            # Reconcile a channel selection
  pxs config                               # Print the effective config
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Config file (default: <config dir>/pixelscope/config.ron)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit-to-window scale for an image in a viewport
    Fit(FitArgs),

    /// Apply a zoom step and print the resulting scale and scroll
    #[command(visible_alias = "z")]
    Zoom(ZoomArgs),

    /// Print the brightness remap for a set of input levels
    Lut(LutArgs),

    /// Reconcile a channel selection against a channel count
    #[command(visible_alias = "ch")]
    Channels(ChannelsArgs),

    /// Print the effective configuration as RON
    Config(ConfigArgs),
}

/// Arguments for the `fit` command.
#[derive(Args)]
struct FitArgs {
    /// Image size, WIDTHxHEIGHT
    #[arg(value_parser = parse_size)]
    image: (usize, usize),

    /// Viewport size, WIDTHxHEIGHT
    #[arg(value_parser = parse_size)]
    viewport: (usize, usize),

    /// Also toggle back from fit, starting at this scale
    #[arg(long)]
    from: Option<f64>,
}

/// Arguments for the `zoom` command.
#[derive(Args)]
struct ZoomArgs {
    /// Viewport size, WIDTHxHEIGHT
    #[arg(value_parser = parse_size)]
    viewport: (usize, usize),

    /// Starting scale
    #[arg(short, long, default_value = "1.0")]
    scale: f64,

    /// Starting scroll, X,Y
    #[arg(long, value_parser = parse_point, default_value = "0,0")]
    scroll: (f64, f64),

    /// Target scale
    #[arg(short, long)]
    to: f64,

    /// Keep the image point under this viewport position fixed, X,Y
    #[arg(long, value_parser = parse_point)]
    at: Option<(f64, f64)>,
}

/// Sample kind names accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    U8,
    U16,
    F32,
}

impl From<KindArg> for SampleKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::U8 => SampleKind::U8,
            KindArg::U16 => SampleKind::U16,
            KindArg::F32 => SampleKind::F32,
        }
    }
}

/// Arguments for the `lut` command.
#[derive(Args)]
struct LutArgs {
    /// Sample kind of the input; unset parameters take its defaults
    #[arg(short, long, value_enum, default_value = "u8")]
    kind: KindArg,

    /// Black level subtracted before scaling
    #[arg(long)]
    offset: Option<f64>,

    /// Multiplier; snapped to a power of two with --snap
    #[arg(short, long)]
    gain: Option<f64>,

    /// Input level mapped to 255 at gain 1 (0 disables the remap)
    #[arg(long)]
    saturation: Option<f64>,

    /// Snap the gain to the nearest power of two
    #[arg(long)]
    snap: bool,

    /// Input levels to evaluate, comma separated (default: a 9-step ramp)
    #[arg(short, long, value_delimiter = ',')]
    levels: Vec<f64>,
}

/// Arguments for the `channels` command.
#[derive(Args)]
struct ChannelsArgs {
    /// Channel count of the image
    count: usize,

    /// Visibility flags, e.g. 1,0,1
    #[arg(short, long, value_delimiter = ',', value_parser = parse_flag)]
    select: Vec<bool>,
}

/// Arguments for the `config` command.
#[derive(Args)]
struct ConfigArgs {
    /// Write the effective config to this file
    #[arg(short, long)]
    write: Option<PathBuf>,
}

/// Parses `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> std::result::Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<usize>().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h = h.trim().parse::<usize>().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok((w, h))
}

/// Parses `X,Y`.
fn parse_point(s: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok((x, y))
}

/// Parses a visibility flag: `1/0`, `true/false`, `on/off`.
fn parse_flag(s: &str) -> std::result::Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "y" => Ok(true),
        "0" | "false" | "off" | "n" => Ok(false),
        other => Err(format!("expected 1 or 0, got '{other}'")),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    match path {
        Some(p) => ViewerConfig::from_file(p).with_context(|| format!("Failed to load config: {}", p.display())),
        None => ViewerConfig::load_default().context("Failed to load default config"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(cli.verbose.max(config.verbose));

    match cli.command {
        Commands::Fit(args) => commands::fit::run(args, &config, cli.verbose),
        Commands::Zoom(args) => commands::zoom::run(args, &config, cli.verbose),
        Commands::Lut(args) => commands::lut::run(args, &config, cli.verbose),
        Commands::Channels(args) => commands::channels::run(args, cli.verbose),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
