//! Benchmarks for lapsharp operations.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use lapsharp_core::{to_float, Raster};
use lapsharp_ops::boost::{AdaptiveBooster, BoostParams};
use lapsharp_ops::convolve::{separable, BorderMode, ConvolutionKernel};
use lapsharp_ops::{sharpen, Pyramid, SharpenConfig};

fn noise(size: u32, channels: usize) -> Raster<u8> {
    let data = (0..size as usize * size as usize * channels)
        .map(|i| (i.wrapping_mul(40_503) >> 5) as u8)
        .collect();
    Raster::from_data(size, size, channels, data).unwrap()
}

/// Benchmark the separable convolution kernels.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");

    for size in [64u32, 256, 1024] {
        let raw = noise(size, 3);
        let src = to_float(&raw, raw.bounds()).unwrap();
        group.throughput(Throughput::Elements(size as u64 * size as u64));

        let binomial = ConvolutionKernel::binomial5();
        group.bench_with_input(BenchmarkId::new("binomial5", size), &src, |b, s| {
            b.iter(|| separable(black_box(s), &binomial, BorderMode::Repeat).unwrap())
        });

        let blur = ConvolutionKernel::sharpening_blur(0.5).unwrap();
        group.bench_with_input(BenchmarkId::new("sharpening_blur", size), &src, |b, s| {
            b.iter(|| separable(black_box(s), &blur, BorderMode::Repeat).unwrap())
        });
    }

    group.finish();
}

/// Benchmark pyramid construction and reconstruction.
fn bench_pyramid(c: &mut Criterion) {
    let mut group = c.benchmark_group("pyramid");
    let src = noise(512, 3);

    for depth in [1usize, 3, 5] {
        group.bench_with_input(BenchmarkId::new("gaussian", depth), &depth, |b, &d| {
            b.iter(|| Pyramid::gaussian(black_box(&src), d, src.bounds()).unwrap())
        });

        let gaussian = Pyramid::gaussian(&src, depth, src.bounds()).unwrap();
        group.bench_with_input(BenchmarkId::new("laplacian", depth), &gaussian, |b, g| {
            b.iter(|| Pyramid::laplacian(black_box(g)).unwrap())
        });

        let laplacian = Pyramid::laplacian(&gaussian).unwrap();
        group.bench_with_input(BenchmarkId::new("reconstruct", depth), &laplacian, |b, l| {
            b.iter(|| black_box(l).reconstruct().unwrap())
        });
    }

    group.finish();
}

/// Benchmark the booster on a Laplacian level 0.
fn bench_boost(c: &mut Criterion) {
    let src = noise(512, 3);
    let gaussian = Pyramid::gaussian(&src, 1, src.bounds()).unwrap();
    let laplacian = Pyramid::laplacian(&gaussian).unwrap();
    let booster = AdaptiveBooster::new(BoostParams::default()).unwrap();

    c.bench_function("boost_512_rgb", |b| {
        b.iter_batched(
            || laplacian.finest().clone(),
            |mut level| booster.boost(&mut level, src.bounds()).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

/// Benchmark the full filter.
fn bench_sharpen(c: &mut Criterion) {
    let mut group = c.benchmark_group("sharpen");

    for size in [128u32, 512, 1024] {
        let src = noise(size, 4);
        let mut dst = src.clone();
        let config = SharpenConfig::default();
        group.throughput(Throughput::Elements(size as u64 * size as u64));
        group.bench_with_input(BenchmarkId::new("rgba_u8", size), &src, |b, s| {
            b.iter(|| sharpen(black_box(s), &mut dst, &config, s.bounds()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convolve, bench_pyramid, bench_boost, bench_sharpen);
criterion_main!(benches);
