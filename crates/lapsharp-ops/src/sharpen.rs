//! The pyramidal sharpening filter.
//!
//! ```text
//! src[roi] -> Gaussian G[0..=N] -> Laplacian L[0..=N]
//!          -> boost(L[0]) -> G[0] + boost -> dst[roi]
//! ```
//!
//! Only the finest band is boosted; the coarser Laplacian levels are built
//! for completeness and dropped with the pyramids at the end of the run.

use crate::boost::AdaptiveBooster;
use crate::config::{FilterConfig, SharpenConfig};
use crate::filter::{Capabilities, FilterId, ImageFilter};
use crate::progress::{NoProgress, Progress, ProgressEvent};
use crate::pyramid::Pyramid;
use crate::recombine::Recombiner;
use lapsharp_core::{Raster, Rect, Result, Sample};
use tracing::debug;

/// Laplacian-pyramid sharpening with an adaptive high-frequency boost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyramidalSharpening;

impl PyramidalSharpening {
    /// Registry id and label.
    pub const ID: FilterId = FilterId {
        id: "PyramidalSharpening",
        label: "Pyramidal sharpening",
    };

    /// Menu entry text, `&` marking the accelerator.
    pub const MENU_TEXT: &'static str = "&Pyramidal sharpening...";

    /// Creates the filter.
    pub fn new() -> Self {
        Self
    }

    /// Runs the filter with a typed configuration.
    ///
    /// `dst` must have `src`'s size and channel count. Only `roi` of `dst`
    /// is written, and only once every earlier stage has succeeded.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`](lapsharp_core::Error::InvalidParameter) if `config` is out of range
    /// - [`Error::UnsupportedChannelLayout`](lapsharp_core::Error::UnsupportedChannelLayout) if `src` has no
    ///   channels or `dst` has a different count
    /// - [`Error::SizeMismatch`](lapsharp_core::Error::SizeMismatch) if `dst` isn't `src`'s size
    /// - [`Error::InvalidRegion`](lapsharp_core::Error::InvalidRegion) if `roi` is empty or outside `src`
    /// - [`Error::AllocationFailure`](lapsharp_core::Error::AllocationFailure) if a working buffer can't be allocated
    pub fn run<T: Sample>(
        &self,
        src: &Raster<T>,
        dst: &mut Raster<T>,
        config: &SharpenConfig,
        roi: Rect,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        config.validate()?;
        src.check_channels()?;
        src.check_same_geometry(dst)?;
        src.check_region(roi)?;
        let booster = AdaptiveBooster::new(config.boost_params())?;

        debug!(
            filter = Self::ID.id,
            depth = config.depth,
            roi = %roi,
            channels = src.channels(),
            "sharpen start"
        );

        let mut gaussian = Pyramid::gaussian_with_progress(src, config.depth, roi, progress)?;
        let mut laplacian = Pyramid::laplacian(&gaussian)?;
        let boosted = booster.boost(laplacian.finest_mut(), roi)?;
        drop(laplacian);

        Recombiner::new(config.rounding).recombine(&mut gaussian, &boosted.boost, dst, roi)?;
        progress.report(ProgressEvent::Done);

        debug!(filter = Self::ID.id, peaks = ?boosted.peaks, "sharpen done");
        Ok(())
    }
}

impl<T: Sample> ImageFilter<T> for PyramidalSharpening {
    fn id(&self) -> FilterId {
        Self::ID
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            painting: false,
            preview: false,
            incremental_painting: false,
            adjustment_layers: true,
            color_space_independent: true,
        }
    }

    fn default_config(&self) -> FilterConfig {
        SharpenConfig::default().to_filter_config()
    }

    fn process(
        &self,
        src: &Raster<T>,
        dst: &mut Raster<T>,
        config: &FilterConfig,
        roi: Rect,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let config = SharpenConfig::from_filter_config(config)?;
        self.run(src, dst, &config, roi, progress)
    }
}

/// Sharpens `roi` of `src` into `dst` without progress reporting.
///
/// ```rust
/// use lapsharp_core::Raster;
/// use lapsharp_ops::{sharpen, SharpenConfig};
///
/// let mut src: Raster<u8> = Raster::new(8, 8, 1);
/// src.set_sample(4, 4, 0, 200);
/// let mut dst = src.clone();
/// sharpen(&src, &mut dst, &SharpenConfig::default(), src.bounds()).unwrap();
/// assert!(dst.sample(4, 4, 0) >= 200);
/// ```
pub fn sharpen<T: Sample>(
    src: &Raster<T>,
    dst: &mut Raster<T>,
    config: &SharpenConfig,
    roi: Rect,
) -> Result<()> {
    PyramidalSharpening::new().run(src, dst, config, roi, &mut NoProgress)
}
