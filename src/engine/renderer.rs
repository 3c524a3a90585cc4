//! Two-pass window surface rendering
//!
//! No single windowing-system primitive yields an image that is both
//! fully decorated and unoccluded: screen copies include the
//! compositor-drawn chrome but also anything covering the window, while
//! direct client rendering is occlusion-proof but blind to the chrome the
//! compositor paints. The renderer therefore seeds the buffer from the
//! screen first and overlays a direct client render second. The order is
//! load-bearing: overlaying first and seeding second would re-introduce
//! the occluder into the client area.

use tracing::debug;

use crate::{
    capture::{PixelSurface, WindowSystem},
    error::{CaptureError, CaptureResult},
    model::{Rect, WindowHandle},
};

/// Renders one window into a surface sized to its extended bounds
///
/// # Errors
///
/// - [`CaptureError::WindowGone`] when the handle is no longer live
/// - [`CaptureError::DegenerateBounds`] when the window reports a
///   zero-area rectangle (minimized, mid-animation)
/// - [`CaptureError::SurfaceUnavailable`] when the screen seed cannot be
///   produced
///
/// A failed client overlay is not an error; the surface then carries the
/// on-screen pixels for the client area, occluders and all.
pub(crate) fn render(ws: &dyn WindowSystem, handle: WindowHandle) -> CaptureResult<PixelSurface> {
    if !ws.is_window(handle) {
        return Err(CaptureError::WindowGone { handle });
    }

    let extended = extended_bounds(ws, handle)?;
    if extended.is_degenerate() {
        return Err(CaptureError::DegenerateBounds {
            width:  extended.width(),
            height: extended.height(),
        });
    }

    // Pass 1: seed with the literal on-screen pixels. Captures title bar,
    // shadows, rounded corners, and any occluding window, corrected below.
    let mut surface = ws.copy_screen_region(extended)?;

    // Pass 2: overlay the window's own client content.
    overlay_client(ws, handle, &mut surface);

    Ok(surface)
}

/// The window's full visual footprint
///
/// Compositor frame bounds when reported (these include the drop shadow
/// and rounded-corner chrome), otherwise the plain window rectangle.
fn extended_bounds(ws: &dyn WindowSystem, handle: WindowHandle) -> CaptureResult<Rect> {
    match ws.frame_bounds(handle) {
        Ok(frame) => Ok(frame),
        Err(err) => {
            debug!(%handle, %err, "no compositor frame bounds, using plain window rect");
            ws.window_bounds(handle)
        }
    }
}

fn overlay_client(ws: &dyn WindowSystem, handle: WindowHandle, surface: &mut PixelSurface) {
    let client = match ws.client_bounds(handle) {
        Ok(client) if !client.is_degenerate() => client,
        Ok(client) => {
            debug!(%handle, ?client, "degenerate client area, keeping screen seed");
            return;
        }
        Err(err) => {
            debug!(%handle, %err, "client area unavailable, keeping screen seed");
            return;
        }
    };

    match ws.render_client(handle) {
        Ok(client_surface) => surface.blit(&client_surface),
        Err(err) => {
            // Accepting the occlusion risk beats leaving a stale or
            // half-drawn client area in the buffer.
            debug!(%handle, %err, "direct client render failed, re-copying screen");
            match ws.copy_screen_region(client) {
                Ok(fallback) => surface.blit(&fallback),
                Err(err) => debug!(%handle, %err, "screen re-copy failed, keeping seed"),
            }
        }
    }
}
