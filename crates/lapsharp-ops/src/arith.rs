//! Per-sample buffer arithmetic shared by the pyramid stages.

use lapsharp_core::{FloatRaster, Result};

/// Copies `src` into a freshly allocated buffer, reporting allocation failure.
pub(crate) fn try_clone(src: &FloatRaster) -> Result<FloatRaster> {
    let mut out = FloatRaster::try_new(src.width(), src.height(), src.channels())?;
    out.data_mut().copy_from_slice(src.data());
    Ok(out)
}

/// `dst += src`, per sample.
pub(crate) fn add_assign(dst: &mut FloatRaster, src: &FloatRaster) -> Result<()> {
    dst.check_same_geometry(src)?;
    for (d, s) in dst.data_mut().iter_mut().zip(src.data()) {
        *d += s;
    }
    Ok(())
}

/// `dst = minuend - dst`, per sample.
pub(crate) fn rsub_assign(dst: &mut FloatRaster, minuend: &FloatRaster) -> Result<()> {
    dst.check_same_geometry(minuend)?;
    for (d, m) in dst.data_mut().iter_mut().zip(minuend.data()) {
        *d = m - *d;
    }
    Ok(())
}
