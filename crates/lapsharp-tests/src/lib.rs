//! End-to-end tests for the lapsharp crates.
//!
//! Scenarios run the full pipeline through the public API of
//! `lapsharp-core` and `lapsharp-ops`. Set `RUST_LOG=lapsharp_ops=trace`
//! to see per-stage logging while they run.

use lapsharp_core::{Raster, Sample};

/// Installs a test-friendly tracing subscriber once.
///
/// Honors `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Single-channel `u8` image, zero everywhere except `value` at `(x, y)`.
pub fn impulse(width: u32, height: u32, x: u32, y: u32, value: u8) -> Raster<u8> {
    let mut img = Raster::new(width, height, 1);
    img.set_sample(x, y, 0, value);
    img
}

/// Deterministic textured `f32` image in `[0, 255)` with `channels` channels.
pub fn texture(width: u32, height: u32, channels: usize) -> Raster<f32> {
    let data = (0..width as usize * height as usize * channels)
        .map(|i| ((i * 7919 + i / 3 * 104_729) % 255) as f32)
        .collect();
    Raster::from_data(width, height, channels, data)
        .unwrap_or_else(|_| Raster::new(width, height, channels))
}

/// Single-channel vertical step edge: `lo` left of column `width / 2`, `hi` from it on.
pub fn step_edge<T: Sample>(width: u32, height: u32, lo: f32, hi: f32) -> Raster<T> {
    let data = (0..width * height)
        .map(|i| T::from_working(if i % width < width / 2 { lo } else { hi }))
        .collect();
    Raster::from_data(width, height, 1, data).unwrap_or_else(|_| Raster::new(width, height, 1))
}
