//! Union compositing of two rendered window surfaces
//!
//! A union capture shows a child or modal window together with enough of
//! the window behind it for context. The output spans the bounding union
//! of both surfaces; the background is blitted first and the foreground
//! second, so the foreground wins every overlapping pixel.

use crate::{
    capture::{PixelSurface, constants::UNION_FILL},
    error::{CaptureError, CaptureResult},
};

/// Merges two surfaces into one spanning their bounding union
///
/// Both inputs are consumed; the composite is a fresh surface whose
/// bounds are the union of theirs. Slivers of the union covered by
/// neither surface keep the fixed fill color.
///
/// # Errors
///
/// [`CaptureError::DegenerateBounds`] if the union has non-positive area
/// (cannot happen with two validly rendered inputs, but the invariant is
/// checked rather than assumed).
pub(crate) fn compose(
    background: PixelSurface,
    foreground: PixelSurface,
) -> CaptureResult<PixelSurface> {
    let union = background.bounds().union(&foreground.bounds());
    if union.is_degenerate() {
        return Err(CaptureError::DegenerateBounds {
            width:  union.width(),
            height: union.height(),
        });
    }

    let mut composite = PixelSurface::filled(union, UNION_FILL)?;
    composite.blit(&background);
    composite.blit(&foreground);
    Ok(composite)
}
