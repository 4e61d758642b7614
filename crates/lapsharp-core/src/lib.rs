//! # lapsharp-core
//!
//! Core types for Laplacian-pyramid image sharpening.
//!
//! This crate provides the foundational buffer types used by `lapsharp-ops`:
//!
//! - [`Raster`] - Multi-channel pixel buffer with a runtime channel count
//! - [`FloatRaster`] - The `f32` working representation used by pyramid math
//! - [`Sample`] - Native sample formats (`u8`, `u16`, `f16`, `f32`)
//! - [`Rect`] - Region of interest
//! - [`convert`] - Native to float (and back) conversion over a region
//! - [`Error`] - Error taxonomy shared by every stage
//!
//! ## Crate Structure
//!
//! ```text
//! lapsharp-core (this crate)
//!    ^
//!    |
//!    +-- lapsharp-ops (convolution, pyramids, booster, filter registry)
//!    +-- lapsharp-tests (end-to-end scenarios)
//!    +-- lapsharp-bench (criterion benchmarks)
//! ```
//!
//! ## Working Values
//!
//! Float buffers hold samples in their native numeric range: a `u8` sample
//! of 100 becomes `100.0`, not `0.39`. Thresholds and rounding in the
//! sharpening stages are therefore expressed in native units.
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for [`Rect`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod error;
pub mod raster;
pub mod rect;
pub mod sample;

pub use convert::{from_float, to_float};
pub use error::{Error, Result};
pub use raster::{FloatRaster, Raster};
pub use rect::Rect;
pub use sample::Sample;

/// Prelude module for convenient imports.
///
/// ```
/// use lapsharp_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::convert::{from_float, to_float};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{FloatRaster, Raster};
    pub use crate::rect::Rect;
    pub use crate::sample::Sample;
}
