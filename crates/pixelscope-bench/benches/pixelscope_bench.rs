//! Benchmarks for PixelScope display transforms.
//!
//! Run with: `cargo bench -p pixelscope-bench`
//! (add `--features parallel` for the rayon brightness path)

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use pixelscope_core::{AnyBuffer, PixelBuffer};
use pixelscope_ops::analysis::{histogram_series, profile_series};
use pixelscope_ops::{
    BrightnessParams, ChannelColors, ChannelSelection, Orientation, apply_bit_shift,
    apply_brightness, apply_brightness_any, composite_channels, select_channels,
};
use pixelscope_view::{ViewerSession, WidgetPoint};

const SIZES: [usize; 3] = [256, 1024, 2048];

fn ramp_u16(side: usize, channels: usize) -> PixelBuffer<u16> {
    let n = side * side * channels;
    let data = (0..n).map(|i| (i % 1024) as u16).collect();
    PixelBuffer::from_vec(side, side, channels, data).unwrap()
}

fn ramp_u8(side: usize, channels: usize) -> PixelBuffer<u8> {
    let n = side * side * channels;
    let data = (0..n).map(|i| (i % 256) as u8).collect();
    PixelBuffer::from_vec(side, side, channels, data).unwrap()
}

/// Brightness remap: generic path vs 8-bit lookup table.
fn bench_brightness(c: &mut Criterion) {
    let mut group = c.benchmark_group("brightness");
    let params16 = BrightnessParams::new(16.0, 2.0, 1023.0);
    let params8 = BrightnessParams::new(16.0, 2.0, 255.0);

    for side in SIZES {
        group.throughput(Throughput::Elements((side * side * 3) as u64));

        let buf16 = ramp_u16(side, 3);
        group.bench_with_input(BenchmarkId::new("u16_rgb", side), &buf16, |b, buf| {
            b.iter(|| apply_brightness(black_box(buf), black_box(&params16)))
        });

        let buf8 = ramp_u8(side, 3);
        group.bench_with_input(BenchmarkId::new("u8_rgb_generic", side), &buf8, |b, buf| {
            b.iter(|| apply_brightness(black_box(buf), black_box(&params8)))
        });

        let any8 = AnyBuffer::U8(buf8);
        group.bench_with_input(BenchmarkId::new("u8_rgb_lut", side), &any8, |b, buf| {
            b.iter(|| apply_brightness_any(black_box(buf), black_box(&params8)))
        });
    }

    group.finish();
}

/// Channel selection, colour composite and bit shift.
fn bench_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("channels");
    let selection = ChannelSelection::from(vec![true, false, true, true]);
    let colors = ChannelColors::from(vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]]);

    for side in SIZES {
        let buf = ramp_u8(side, 4);
        group.throughput(Throughput::Elements((side * side) as u64));

        group.bench_with_input(BenchmarkId::new("select", side), &buf, |b, buf| {
            b.iter(|| select_channels(black_box(buf), black_box(&selection)))
        });
        group.bench_with_input(BenchmarkId::new("composite", side), &buf, |b, buf| {
            b.iter(|| composite_channels(black_box(buf), black_box(&selection), black_box(&colors)))
        });

        let buf16 = ramp_u16(side, 1);
        group.bench_with_input(BenchmarkId::new("bit_shift_u16", side), &buf16, |b, buf| {
            b.iter(|| apply_bit_shift(black_box(buf), black_box(-2)))
        });
    }

    group.finish();
}

/// Histogram and profile series over a full image.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for side in SIZES {
        let buf = ramp_u16(side, 3);
        group.throughput(Throughput::Elements((side * side * 3) as u64));

        group.bench_with_input(BenchmarkId::new("histogram", side), &buf, |b, buf| {
            b.iter(|| histogram_series(black_box(buf), None, None))
        });
        group.bench_with_input(BenchmarkId::new("profile_diagonal", side), &buf, |b, buf| {
            b.iter(|| profile_series(black_box(buf), Orientation::Diagonal, None))
        });
    }

    group.finish();
}

/// Full session render: bit shift, brightness, composite.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    let mut session = ViewerSession::default();
    session.set_viewport_size(1280.0, 720.0);
    session.add_image("rgb16", ramp_u16(1024, 3));
    group.bench_function("render_u16_rgb_1024", |b| b.iter(|| session.render()));

    session.bit_shift(-2);
    group.bench_function("render_shifted_1024", |b| b.iter(|| session.render()));

    session.zoom_in();
    group.bench_function("probe", |b| {
        b.iter(|| session.probe(black_box(WidgetPoint::new(777.0, 333.0))))
    });

    group.finish();
}

criterion_group!(benches, bench_brightness, bench_channels, bench_analysis, bench_render);
criterion_main!(benches);
