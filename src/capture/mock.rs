//! Mock windowing system for tests and development
//!
//! `MockWindowSystem` implements [`WindowSystem`] over a scriptable
//! in-memory desktop: a stack of colored fake windows on a solid
//! background. Screen copies composite the stack in z-order, so occlusion
//! behaves like the real thing, while direct client rendering always
//! returns a window's own content color, which is exactly the asymmetry
//! the two-pass renderer exists to exploit.
//!
//! Failure paths are scripted in the builder style: individual windows
//! can refuse direct client rendering, and the whole screen can refuse
//! copies, to drive the renderer's fallbacks in tests.

use std::collections::HashSet;

use image::Rgba;

use super::{PixelSurface, WindowSystem, constants::MAX_WINDOW_TEXT};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{Rect, WindowHandle},
};

/// One fake window on the mock desktop
///
/// A window paints its chrome color over its plain bounds and its content
/// color over its client area; a frame rect, when set, only widens what
/// the window reports as its visual footprint; the shadow margin itself
/// stays transparent on screen, like a real compositor shadow. Distinct
/// colors per window let tests identify exactly which surface produced
/// any given pixel.
#[derive(Debug, Clone)]
pub struct MockWindow {
    handle:  WindowHandle,
    title:   String,
    class:   String,
    frame:   Option<Rect>,
    bounds:  Rect,
    client:  Option<Rect>,
    parent:  Option<WindowHandle>,
    owner:   Option<WindowHandle>,
    chrome:  Rgba<u8>,
    content: Rgba<u8>,
    visible: bool,
}

impl MockWindow {
    /// Creates a visible window with the given handle and title
    ///
    /// Geometry defaults to an empty rect at the origin; set it with
    /// [`with_bounds`](Self::with_bounds) before using the window.
    pub fn new(handle: i64, title: impl Into<String>) -> Self {
        Self {
            handle:  WindowHandle::from_raw(handle),
            title:   title.into(),
            class:   String::new(),
            frame:   None,
            bounds:  Rect::new(0, 0, 0, 0),
            client:  None,
            parent:  None,
            owner:   None,
            chrome:  Rgba([128, 128, 128, 255]),
            content: Rgba([200, 200, 200, 255]),
            visible: true,
        }
    }

    /// Sets the plain window rectangle
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets compositor frame bounds (usually the plain rect inflated by a
    /// shadow margin); windows without this report no frame bounds
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Sets the client area in screen coordinates; defaults to the plain
    /// window rectangle
    pub fn with_client(mut self, client: Rect) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the window class name
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Sets the structural parent (ancestry, not ownership)
    pub fn with_parent(mut self, parent: WindowHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the owner window (ownership, not ancestry)
    pub fn with_owner(mut self, owner: WindowHandle) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Sets the chrome and client content colors
    pub fn with_colors(mut self, chrome: Rgba<u8>, content: Rgba<u8>) -> Self {
        self.chrome = chrome;
        self.content = content;
        self
    }

    /// Marks the window invisible (skipped by hit testing and screen
    /// composition, but still a live window)
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// The handle this window was created with
    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    /// The window's client content color
    pub fn content_color(&self) -> Rgba<u8> {
        self.content
    }

    /// The window's chrome color
    pub fn chrome_color(&self) -> Rgba<u8> {
        self.chrome
    }

    /// Client area: explicit client rect if set, plain bounds otherwise
    fn client_rect(&self) -> Rect {
        self.client.unwrap_or(self.bounds)
    }
}

/// Scriptable in-memory windowing system
///
/// Windows are kept in z-order: the first registered window is at the
/// bottom of the stack, the last on top. Screen composition and hit
/// testing respect that order, so tests can stage occlusion simply by
/// registering the occluder after the target.
#[derive(Debug)]
pub struct MockWindowSystem {
    windows:            Vec<MockWindow>,
    screen:             Rect,
    desktop:            Rgba<u8>,
    foreground:         Option<WindowHandle>,
    fail_client_render: HashSet<WindowHandle>,
    fail_screen_copy:   bool,
}

impl MockWindowSystem {
    /// Creates an empty 1920x1080 desktop with a dark background
    pub fn new() -> Self {
        Self {
            windows:            Vec::new(),
            screen:             Rect::new(0, 0, 1920, 1080),
            desktop:            Rgba([24, 24, 24, 255]),
            foreground:         None,
            fail_client_render: HashSet::new(),
            fail_screen_copy:   false,
        }
    }

    /// Replaces the screen rect
    pub fn with_screen(mut self, screen: Rect) -> Self {
        self.screen = screen;
        self
    }

    /// Replaces the desktop background color
    pub fn with_desktop_color(mut self, color: Rgba<u8>) -> Self {
        self.desktop = color;
        self
    }

    /// Registers a window on top of the current stack
    pub fn with_window(mut self, window: MockWindow) -> Self {
        self.windows.push(window);
        self
    }

    /// Sets the foreground window
    ///
    /// The handle is not validated, so tests can point the foreground at
    /// a window that no longer exists and exercise the stale-handle path.
    pub fn with_foreground(mut self, handle: WindowHandle) -> Self {
        self.foreground = Some(handle);
        self
    }

    /// Makes direct client rendering fail for one window
    pub fn with_client_render_failure(mut self, handle: WindowHandle) -> Self {
        self.fail_client_render.insert(handle);
        self
    }

    /// Makes every screen copy fail
    pub fn with_screen_copy_failure(mut self) -> Self {
        self.fail_screen_copy = true;
        self
    }

    /// Looks up a registered window
    pub fn window(&self, handle: WindowHandle) -> Option<&MockWindow> {
        self.windows.iter().find(|w| w.handle == handle)
    }

    fn live(&self, handle: WindowHandle) -> CaptureResult<&MockWindow> {
        self.window(handle)
            .ok_or(CaptureError::WindowGone { handle })
    }
}

impl Default for MockWindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSystem for MockWindowSystem {
    fn is_window(&self, handle: WindowHandle) -> bool {
        self.window(handle).is_some()
    }

    fn frame_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        let window = self.live(handle)?;
        window.frame.ok_or_else(|| CaptureError::SurfaceUnavailable {
            reason: format!("window {handle} reports no compositor frame bounds"),
        })
    }

    fn window_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        Ok(self.live(handle)?.bounds)
    }

    fn client_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        Ok(self.live(handle)?.client_rect())
    }

    fn ancestor_root(&self, handle: WindowHandle) -> Option<WindowHandle> {
        let mut current = self.window(handle)?;
        while let Some(parent) = current.parent.and_then(|p| self.window(p)) {
            current = parent;
        }
        Some(current.handle)
    }

    fn owner_root(&self, handle: WindowHandle) -> Option<WindowHandle> {
        let mut current = self.ancestor_root(handle)?;
        loop {
            let window = self.window(current)?;
            match window.owner.filter(|o| self.is_window(*o)) {
                Some(owner) => current = self.ancestor_root(owner)?,
                None => return Some(current),
            }
        }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.foreground
    }

    fn window_at_point(&self, x: i32, y: i32) -> Option<WindowHandle> {
        if !self.screen.contains(x, y) {
            return None;
        }
        self.windows
            .iter()
            .rev()
            .find(|w| w.visible && w.bounds.contains(x, y))
            .map(|w| w.handle)
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        self.window(handle)
            .map(|w| w.title.chars().take(MAX_WINDOW_TEXT).collect())
            .unwrap_or_default()
    }

    fn window_class(&self, handle: WindowHandle) -> String {
        self.window(handle)
            .map(|w| w.class.chars().take(MAX_WINDOW_TEXT).collect())
            .unwrap_or_default()
    }

    fn render_client(&self, handle: WindowHandle) -> CaptureResult<PixelSurface> {
        if self.fail_client_render.contains(&handle) {
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!("direct client rendering refused for window {handle}"),
            });
        }

        let window = self.live(handle)?;
        let client = window.client_rect();
        if client.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  client.width(),
                height: client.height(),
            });
        }

        // Direct rendering sees the window's own pixels, never an occluder's
        PixelSurface::filled(client, window.content)
    }

    fn copy_screen_region(&self, region: Rect) -> CaptureResult<PixelSurface> {
        if self.fail_screen_copy {
            return Err(CaptureError::SurfaceUnavailable {
                reason: "screen is not readable".to_string(),
            });
        }

        if region.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  region.width(),
                height: region.height(),
            });
        }

        // Composite the stack bottom-to-top; whatever ends up on top in
        // screen space is what a screen copy observes.
        let mut screen = PixelSurface::filled(region, self.desktop)?;
        for window in &self.windows {
            if !window.visible {
                continue;
            }
            if let Ok(chrome) = PixelSurface::filled(window.bounds, window.chrome) {
                screen.blit(&chrome);
            }
            if let Ok(content) = PixelSurface::filled(window.client_rect(), window.content) {
                screen.blit(&content);
            }
        }
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const GRAY: Rgba<u8> = Rgba([90, 90, 90, 255]);

    fn two_window_desktop() -> MockWindowSystem {
        MockWindowSystem::new()
            .with_window(
                MockWindow::new(1, "Editor")
                    .with_bounds(Rect::new(100, 100, 500, 400))
                    .with_colors(GRAY, RED),
            )
            .with_window(
                MockWindow::new(2, "Player")
                    .with_bounds(Rect::new(300, 200, 700, 600))
                    .with_colors(GRAY, GREEN),
            )
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let ws = two_window_desktop();

        // Overlap region belongs to the later-registered window
        assert_eq!(ws.window_at_point(350, 250), Some(WindowHandle::from_raw(2)));
        // Region covered only by the first window
        assert_eq!(ws.window_at_point(150, 150), Some(WindowHandle::from_raw(1)));
        // Empty desktop
        assert_eq!(ws.window_at_point(1800, 1000), None);
    }

    #[test]
    fn test_hit_test_skips_hidden_windows() {
        let ws = MockWindowSystem::new().with_window(
            MockWindow::new(1, "Ghost")
                .with_bounds(Rect::new(0, 0, 100, 100))
                .hidden(),
        );

        assert!(ws.is_window(WindowHandle::from_raw(1)));
        assert_eq!(ws.window_at_point(50, 50), None);
    }

    #[test]
    fn test_hit_test_clipped_to_screen() {
        let ws = MockWindowSystem::new()
            .with_screen(Rect::new(0, 0, 100, 100))
            .with_window(MockWindow::new(1, "Wide").with_bounds(Rect::new(-50, -50, 200, 200)));

        assert_eq!(ws.window_at_point(50, 50), Some(WindowHandle::from_raw(1)));
        // The window extends past the screen, but nothing is hit there
        assert_eq!(ws.window_at_point(150, 50), None);
    }

    #[test]
    fn test_screen_copy_composites_in_z_order() {
        let ws = two_window_desktop();
        let screen = ws.copy_screen_region(Rect::new(0, 0, 800, 700)).unwrap();

        // Overlap shows the top window's content
        assert_eq!(screen.pixel_at_screen(350, 250), Some(GREEN));
        // Non-overlapped part of the bottom window survives
        assert_eq!(screen.pixel_at_screen(150, 150), Some(RED));
        // Desktop elsewhere
        assert_eq!(screen.pixel_at_screen(10, 10), Some(Rgba([24, 24, 24, 255])));
    }

    #[test]
    fn test_render_client_ignores_occlusion() {
        let ws = two_window_desktop();

        // Window 1 is occluded by window 2 on screen, but direct rendering
        // still yields its own content everywhere.
        let surface = ws.render_client(WindowHandle::from_raw(1)).unwrap();
        assert_eq!(surface.bounds(), Rect::new(100, 100, 500, 400));
        assert_eq!(surface.pixel_at_screen(350, 250), Some(RED));
    }

    #[test]
    fn test_client_render_failure_injection() {
        let ws = two_window_desktop().with_client_render_failure(WindowHandle::from_raw(1));

        let result = ws.render_client(WindowHandle::from_raw(1));
        assert!(matches!(result, Err(CaptureError::SurfaceUnavailable { .. })));

        // The other window is unaffected
        assert!(ws.render_client(WindowHandle::from_raw(2)).is_ok());
    }

    #[test]
    fn test_frame_bounds_only_when_scripted() {
        let ws = MockWindowSystem::new().with_window(
            MockWindow::new(1, "Framed")
                .with_bounds(Rect::new(10, 10, 110, 110))
                .with_frame(Rect::new(2, 2, 118, 118)),
        );

        assert_eq!(
            ws.frame_bounds(WindowHandle::from_raw(1)).unwrap(),
            Rect::new(2, 2, 118, 118)
        );

        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, "Plain").with_bounds(Rect::new(10, 10, 110, 110)));
        assert!(ws.frame_bounds(WindowHandle::from_raw(1)).is_err());
        assert_eq!(
            ws.window_bounds(WindowHandle::from_raw(1)).unwrap(),
            Rect::new(10, 10, 110, 110)
        );
    }

    #[test]
    fn test_ancestry_and_ownership_are_distinct() {
        let main = WindowHandle::from_raw(10);
        let dialog = WindowHandle::from_raw(20);
        let button = WindowHandle::from_raw(21);

        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(10, "Main").with_bounds(Rect::new(0, 0, 800, 600)))
            .with_window(
                MockWindow::new(20, "Save As")
                    .with_bounds(Rect::new(200, 200, 600, 500))
                    .with_owner(main),
            )
            .with_window(
                MockWindow::new(21, "OK")
                    .with_bounds(Rect::new(400, 440, 480, 470))
                    .with_parent(dialog),
            );

        // The button's parent chain ends at the dialog, not the owner
        assert_eq!(ws.ancestor_root(button), Some(dialog));
        // The owner chain continues through to the main window
        assert_eq!(ws.owner_root(button), Some(main));
        // A window with no owner is its own owner root
        assert_eq!(ws.owner_root(main), Some(main));
    }

    #[test]
    fn test_unknown_handle_everywhere() {
        let ws = two_window_desktop();
        let stale = WindowHandle::from_raw(0xdead);

        assert!(!ws.is_window(stale));
        assert!(ws.window_bounds(stale).is_err());
        assert!(ws.client_bounds(stale).is_err());
        assert_eq!(ws.ancestor_root(stale), None);
        assert_eq!(ws.owner_root(stale), None);
        assert_eq!(ws.window_title(stale), "");
        assert!(matches!(
            ws.render_client(stale),
            Err(CaptureError::WindowGone { .. })
        ));
    }

    #[test]
    fn test_title_truncated_at_text_limit() {
        let long = "x".repeat(MAX_WINDOW_TEXT + 50);
        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, long).with_bounds(Rect::new(0, 0, 10, 10)));

        assert_eq!(
            ws.window_title(WindowHandle::from_raw(1)).len(),
            MAX_WINDOW_TEXT
        );
    }

    #[test]
    fn test_screen_copy_failure_injection() {
        let ws = two_window_desktop().with_screen_copy_failure();
        let result = ws.copy_screen_region(Rect::new(0, 0, 100, 100));
        assert!(matches!(result, Err(CaptureError::SurfaceUnavailable { .. })));
    }

    #[test]
    fn test_chrome_painted_outside_client() {
        let ws = MockWindowSystem::new().with_window(
            MockWindow::new(1, "Chrome")
                .with_bounds(Rect::new(0, 0, 100, 100))
                .with_client(Rect::new(8, 30, 92, 92))
                .with_colors(BLUE, RED),
        );

        let screen = ws.copy_screen_region(Rect::new(0, 0, 100, 100)).unwrap();
        // Title-bar band is chrome
        assert_eq!(screen.pixel_at_screen(50, 10), Some(BLUE));
        // Interior is content
        assert_eq!(screen.pixel_at_screen(50, 50), Some(RED));
    }
}
