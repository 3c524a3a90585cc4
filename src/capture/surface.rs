//! Owned pixel surface paired with its screen-space origin
//!
//! A [`PixelSurface`] is the unit of data flowing between the renderer,
//! the compositor, and the encoder: an owned RGBA buffer plus the screen
//! rect it was captured from. Keeping the rect alongside the pixels is
//! what lets the compositor place two independently rendered windows at
//! their true relative offsets without any extra bookkeeping.

use image::{Rgba, RgbaImage, imageops};

use crate::{
    error::{CaptureError, CaptureResult},
    model::Rect,
};

/// An owned 2-D RGBA buffer tied to the screen rect it covers
///
/// Ownership is exclusive: surfaces are created by the renderer and
/// consumed by the compositor or the encoder. There is no sharing and no
/// interior mutability; blitting takes `&mut self`.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    pixels: RgbaImage,
    bounds: Rect,
}

impl PixelSurface {
    /// Allocates a zeroed surface sized to `bounds`
    ///
    /// # Errors
    ///
    /// [`CaptureError::DegenerateBounds`] if `bounds` has non-positive
    /// width or height.
    pub fn new(bounds: Rect) -> CaptureResult<Self> {
        Self::filled(bounds, Rgba([0, 0, 0, 0]))
    }

    /// Allocates a surface sized to `bounds`, filled with `color`
    ///
    /// # Errors
    ///
    /// [`CaptureError::DegenerateBounds`] if `bounds` has non-positive
    /// width or height.
    pub fn filled(bounds: Rect, color: Rgba<u8>) -> CaptureResult<Self> {
        if bounds.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  bounds.width(),
                height: bounds.height(),
            });
        }

        let pixels = RgbaImage::from_pixel(bounds.width() as u32, bounds.height() as u32, color);
        Ok(Self { pixels, bounds })
    }

    /// Wraps an existing image buffer captured from `bounds`
    ///
    /// # Errors
    ///
    /// [`CaptureError::DegenerateBounds`] for a degenerate rect, or
    /// [`CaptureError::SurfaceUnavailable`] if the buffer's dimensions do
    /// not match the rect.
    pub fn from_image(pixels: RgbaImage, bounds: Rect) -> CaptureResult<Self> {
        if bounds.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  bounds.width(),
                height: bounds.height(),
            });
        }

        if pixels.width() != bounds.width() as u32 || pixels.height() != bounds.height() as u32 {
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!(
                    "buffer is {}x{} but bounds are {}x{}",
                    pixels.width(),
                    pixels.height(),
                    bounds.width(),
                    bounds.height()
                ),
            });
        }

        Ok(Self { pixels, bounds })
    }

    /// The screen rect this surface was captured from
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Surface width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Reads one pixel by surface-local coordinates
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Reads one pixel by absolute screen coordinates
    ///
    /// Returns `None` when the point lies outside this surface's bounds.
    pub fn pixel_at_screen(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        Some(self.pixel((x - self.bounds.left) as u32, (y - self.bounds.top) as u32))
    }

    /// Copies `src` onto this surface at its screen-space position
    ///
    /// The offset is derived from the two surfaces' bounds; any part of
    /// `src` falling outside this surface is clipped.
    pub fn blit(&mut self, src: &PixelSurface) {
        let dx = (src.bounds.left - self.bounds.left) as i64;
        let dy = (src.bounds.top - self.bounds.top) as i64;
        imageops::replace(&mut self.pixels, &src.pixels, dx, dy);
    }

    /// Borrows the underlying image buffer
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Consumes the surface, returning the underlying image buffer
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_dimensions_match_bounds() {
        let surface = PixelSurface::filled(Rect::new(100, 50, 300, 150), Rgba([9, 9, 9, 255]))
            .unwrap();
        assert_eq!(surface.width(), 200);
        assert_eq!(surface.height(), 100);
        assert_eq!(surface.bounds(), Rect::new(100, 50, 300, 150));
        assert_eq!(surface.pixel(0, 0), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        assert!(PixelSurface::new(Rect::new(0, 0, 0, 100)).is_err());
        assert!(PixelSurface::new(Rect::new(0, 0, 100, 0)).is_err());
        assert!(PixelSurface::new(Rect::new(50, 50, 10, 60)).is_err());
    }

    #[test]
    fn test_from_image_dimension_mismatch() {
        let img = RgbaImage::new(10, 10);
        let result = PixelSurface::from_image(img, Rect::new(0, 0, 20, 10));
        assert!(matches!(result, Err(CaptureError::SurfaceUnavailable { .. })));
    }

    #[test]
    fn test_blit_uses_screen_space_offsets() {
        let mut dst = PixelSurface::filled(Rect::new(0, 0, 10, 10), Rgba([0, 0, 0, 255])).unwrap();
        let src = PixelSurface::filled(Rect::new(4, 4, 8, 8), Rgba([255, 0, 0, 255])).unwrap();

        dst.blit(&src);

        assert_eq!(dst.pixel(3, 3), Rgba([0, 0, 0, 255]));
        assert_eq!(dst.pixel(4, 4), Rgba([255, 0, 0, 255]));
        assert_eq!(dst.pixel(7, 7), Rgba([255, 0, 0, 255]));
        assert_eq!(dst.pixel(8, 8), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_blit_clips_source_outside_destination() {
        // Source hangs off the top-left of the destination
        let mut dst = PixelSurface::filled(Rect::new(0, 0, 6, 6), Rgba([0, 0, 0, 255])).unwrap();
        let src = PixelSurface::filled(Rect::new(-3, -3, 3, 3), Rgba([0, 255, 0, 255])).unwrap();

        dst.blit(&src);

        assert_eq!(dst.pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(dst.pixel(2, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(dst.pixel(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_pixel_at_screen() {
        let surface =
            PixelSurface::filled(Rect::new(10, 10, 20, 20), Rgba([1, 2, 3, 255])).unwrap();

        assert_eq!(surface.pixel_at_screen(10, 10), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(surface.pixel_at_screen(19, 19), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(surface.pixel_at_screen(20, 19), None);
        assert_eq!(surface.pixel_at_screen(9, 15), None);
    }
}
