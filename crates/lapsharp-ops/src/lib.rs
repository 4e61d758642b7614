//! # lapsharp-ops
//!
//! Laplacian-pyramid sharpening built on `lapsharp-core` buffers.
//!
//! ## Pipeline
//!
//! ```text
//! Raster<T> --to_float--> Gaussian pyramid --> Laplacian pyramid
//!                               |                     |
//!                               |              AdaptiveBooster (level 0)
//!                               |                     |
//!                               +---- Recombiner <----+
//!                                          |
//!                               Raster<T> <--from_float
//! ```
//!
//! ## Modules
//!
//! - [`convolve`] - 1-D fixed-point kernels and border handling
//! - [`pyramid`] - Gaussian and Laplacian pyramids
//! - [`boost`] - Adaptive clipping and high-frequency boost
//! - [`recombine`] - Boost + Gaussian base, written back to native samples
//! - [`config`] - Property bag and typed sharpening configuration
//! - [`filter`] - [`ImageFilter`] trait and [`FilterRegistry`]
//! - [`sharpen`] - The [`PyramidalSharpening`] filter
//! - [`progress`] - Progress events
//!
//! ## Quick Start
//!
//! ```rust
//! use lapsharp_core::Raster;
//! use lapsharp_ops::{sharpen, SharpenConfig};
//!
//! let src: Raster<u16> = Raster::filled(32, 32, &[1000, 2000, 3000]);
//! let mut dst = src.clone();
//! let config = SharpenConfig::default().with_depth(3).with_scale(1.5);
//! sharpen(&src, &mut dst, &config, src.bounds()).unwrap();
//! assert_eq!(dst, src);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for configuration types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod arith;

pub mod boost;
pub mod config;
pub mod convolve;
pub mod filter;
pub mod progress;
pub mod pyramid;
pub mod recombine;
pub mod sharpen;

pub use boost::{AdaptiveBooster, BoostOutput, BoostParams, ThresholdScope};
pub use config::{ConfigValue, FilterConfig, SharpenConfig};
pub use convolve::{BorderMode, ConvolutionKernel, Orientation};
pub use filter::{register_builtin, Capabilities, FilterId, FilterRegistry, ImageFilter};
pub use progress::{NoProgress, Progress, ProgressEvent};
pub use pyramid::{Level, Pyramid, PyramidKind};
pub use recombine::{Recombiner, RoundingPolicy};
pub use sharpen::{sharpen, PyramidalSharpening};
