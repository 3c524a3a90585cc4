//! Windowing-system abstraction and capture primitives
//!
//! This module provides the seam between the OS-agnostic capture engine
//! and the platform that actually owns the windows:
//!
//! - `PixelSurface`: an owned RGBA buffer paired with the screen rect it
//!   was captured from
//! - `WindowSystem`: trait defining the window queries and pixel sources
//!   the engine needs
//! - `MockWindowSystem`: scriptable in-memory implementation for tests
//!   and development
//! - `GdiWindowSystem`: Windows implementation on GDI/DWM

use crate::{
    error::CaptureResult,
    model::{Rect, WindowHandle},
};

pub mod constants;
pub mod mock;
pub mod surface;

#[cfg(target_os = "windows")]
pub mod windows_backend;

pub use mock::{MockWindow, MockWindowSystem};
pub use surface::PixelSurface;
#[cfg(target_os = "windows")]
pub use windows_backend::GdiWindowSystem;

/// Capability trait over the windowing system that owns the targets
///
/// Everything the engine knows about windows flows through this trait:
/// geometry, ancestry, hit testing, and the two pixel sources the two-pass
/// renderer combines. Implementations answer from live windowing-system
/// state, so any call may observe a window that vanished a moment ago;
/// the fallible methods return errors for that and callers degrade rather
/// than retry.
///
/// Implementations must be `Send + Sync`; the engine itself serializes
/// captures (one per delivered key event) and takes no locks around trait
/// calls.
pub trait WindowSystem: Send + Sync {
    /// True if `handle` currently refers to a live window
    ///
    /// Liveness can change between any two calls; a `true` here is only a
    /// hint that a subsequent query is worth attempting.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// The window's full visual footprint, including compositor-drawn
    /// shadows and rounded-corner chrome
    ///
    /// # Errors
    ///
    /// Fails when the window is gone or the compositor does not report
    /// frame bounds; callers fall back to [`window_bounds`](Self::window_bounds).
    fn frame_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect>;

    /// The window's plain rectangle (client plus borders, no shadow)
    ///
    /// # Errors
    ///
    /// Fails when the window is gone.
    fn window_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect>;

    /// The window's interior drawable region, in screen coordinates
    ///
    /// # Errors
    ///
    /// Fails when the window is gone.
    fn client_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect>;

    /// Topmost window in `handle`'s parent chain, ignoring ownership
    ///
    /// A control nested in a dialog resolves to the dialog itself, never
    /// to the window that owns the dialog. `None` when the root cannot be
    /// determined.
    fn ancestor_root(&self, handle: WindowHandle) -> Option<WindowHandle>;

    /// Topmost window in `handle`'s combined parent and owner chain
    ///
    /// Distinct from [`ancestor_root`](Self::ancestor_root): a dialog's
    /// ancestor root is the dialog, while its owner root is the main
    /// window that owns it.
    fn owner_root(&self, handle: WindowHandle) -> Option<WindowHandle>;

    /// The window currently in the foreground, if any
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// The visible window under the given screen point, if any
    fn window_at_point(&self, x: i32, y: i32) -> Option<WindowHandle>;

    /// The window's title text, truncated at the windowing system's own
    /// buffer limit
    ///
    /// Returns an empty string for untitled or vanished windows.
    fn window_title(&self, handle: WindowHandle) -> String;

    /// The window's class name
    ///
    /// Returns an empty string when unavailable.
    fn window_class(&self, handle: WindowHandle) -> String;

    /// Renders the window's client content directly, bypassing the screen
    ///
    /// The returned surface is sized and positioned to the window's client
    /// bounds and contains the window's own pixels even when other
    /// surfaces occlude it on screen. This is the overlay pass of the
    /// renderer's occlusion fix.
    ///
    /// # Errors
    ///
    /// Fails when the window is gone, its client area is degenerate, or
    /// the windowing system refuses direct rendering (some window types
    /// never support it).
    fn render_client(&self, handle: WindowHandle) -> CaptureResult<PixelSurface>;

    /// Copies the literal current on-screen pixels for a screen region
    ///
    /// This is the seed pass of the renderer: it sees exactly what the
    /// user sees, chrome and shadows included, but also any occluding
    /// surface that happens to be in front.
    ///
    /// # Errors
    ///
    /// Fails for degenerate regions or when the screen cannot be read
    /// (resource exhaustion, remote sessions without a readable display).
    fn copy_screen_region(&self, region: Rect) -> CaptureResult<PixelSurface>;
}
