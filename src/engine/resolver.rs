//! Capture target resolution
//!
//! Maps the raw window that received a key event to the top-level window
//! worth capturing, and, when a union capture was requested, hunts for
//! a plausible background window to composite behind it. Resolution never
//! fails; it degrades to "best available root" and finally to `None`,
//! which turns the whole capture into a no-op.

use tracing::debug;

use crate::{
    capture::{WindowSystem, constants::BACKGROUND_PROBE_OFFSETS},
    model::{CaptureRequest, Rect, WindowHandle},
};

/// Resolves a key event's originating window into a capture request
///
/// The primary target is the origin's ancestry root (so a control inside
/// a dialog resolves to the dialog, not the dialog's owner), falling back
/// to the foreground window when the origin is missing, stale, or
/// rootless. With `union_requested`, a background window is searched for
/// as well; failing that search only downgrades the capture to
/// single-window mode.
pub(crate) fn resolve(
    ws: &dyn WindowSystem,
    origin: Option<WindowHandle>,
    union_requested: bool,
) -> Option<CaptureRequest> {
    let primary = resolve_primary(ws, origin)?;
    let background = if union_requested {
        resolve_background(ws, primary)
    } else {
        None
    };
    Some(CaptureRequest {
        primary,
        background,
    })
}

fn resolve_primary(ws: &dyn WindowSystem, origin: Option<WindowHandle>) -> Option<WindowHandle> {
    if let Some(origin) = origin {
        if ws.is_window(origin) {
            if let Some(root) = ws.ancestor_root(origin) {
                return Some(root);
            }
            debug!(%origin, "origin window has no ancestry root, trying foreground");
        } else {
            debug!(%origin, "origin handle is stale, trying foreground");
        }
    }
    ws.foreground_window()
}

/// Best-effort background discovery for a union capture
///
/// Probes a handful of points just above the primary root's top edge: for
/// a child window floating over its owner, the owner's title bar is
/// usually exposed there. The first visible window whose own root differs
/// from the primary wins. When every probe misses, the primary's owner
/// window is used; when there is no distinct owner either, the capture
/// stays single-window.
fn resolve_background(ws: &dyn WindowSystem, primary: WindowHandle) -> Option<WindowHandle> {
    let bounds = visual_bounds(ws, primary)?;
    let center_x = (bounds.left + bounds.right) / 2;

    for offset in BACKGROUND_PROBE_OFFSETS {
        let probe_y = bounds.top - offset;
        let Some(hit) = ws.window_at_point(center_x, probe_y) else {
            continue;
        };
        let Some(root) = ws.ancestor_root(hit) else {
            continue;
        };
        if root != primary {
            debug!(%root, offset, "background found by probing above the top edge");
            return Some(root);
        }
    }

    match ws.owner_root(primary) {
        Some(owner) if owner != primary => {
            debug!(%owner, "background probes missed, using owner window");
            Some(owner)
        }
        _ => {
            debug!("no background window found, degrading to single-window capture");
            None
        }
    }
}

fn visual_bounds(ws: &dyn WindowSystem, handle: WindowHandle) -> Option<Rect> {
    ws.frame_bounds(handle)
        .or_else(|_| ws.window_bounds(handle))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{MockWindow, MockWindowSystem};

    fn h(raw: i64) -> WindowHandle {
        WindowHandle::from_raw(raw)
    }

    #[test]
    fn test_control_resolves_to_its_dialog() {
        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, "Main").with_bounds(Rect::new(0, 0, 800, 600)))
            .with_window(
                MockWindow::new(2, "Save As")
                    .with_bounds(Rect::new(200, 200, 600, 500))
                    .with_owner(h(1)),
            )
            .with_window(
                MockWindow::new(3, "OK")
                    .with_bounds(Rect::new(300, 440, 380, 470))
                    .with_parent(h(2)),
            );

        let req = resolve(&ws, Some(h(3)), false).unwrap();
        // The dialog, not the owning main window
        assert_eq!(req.primary, h(2));
        assert_eq!(req.background, None);
    }

    #[test]
    fn test_stale_origin_falls_back_to_foreground() {
        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, "Main").with_bounds(Rect::new(0, 0, 800, 600)))
            .with_foreground(h(1));

        let req = resolve(&ws, Some(h(0xbad)), false).unwrap();
        assert_eq!(req.primary, h(1));
    }

    #[test]
    fn test_no_origin_no_foreground_is_none() {
        let ws = MockWindowSystem::new();
        assert_eq!(resolve(&ws, None, false), None);
        assert_eq!(resolve(&ws, Some(h(9)), true), None);
    }

    #[test]
    fn test_background_found_by_probe() {
        // Owner peeks out 40px above the dialog's top edge
        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, "Main").with_bounds(Rect::new(100, 100, 900, 700)))
            .with_window(
                MockWindow::new(2, "Prefs").with_bounds(Rect::new(250, 140, 750, 660)),
            );

        let req = resolve(&ws, Some(h(2)), true).unwrap();
        assert_eq!(req.primary, h(2));
        assert_eq!(req.background, Some(h(1)));
    }

    #[test]
    fn test_probe_skips_own_root() {
        // A control's own dialog sits above the probe points; the probes
        // must not report the primary as its own background.
        let ws = MockWindowSystem::new().with_window(
            MockWindow::new(1, "Lone").with_bounds(Rect::new(100, 100, 500, 400)),
        );

        let req = resolve(&ws, Some(h(1)), true).unwrap();
        assert_eq!(req.background, None);
    }

    #[test]
    fn test_probe_uses_frame_bounds_when_present() {
        // Frame bounds hang 8px above the plain rect; probing from the
        // plain rect's top would land inside the primary's own shadow.
        let ws = MockWindowSystem::new()
            .with_window(MockWindow::new(1, "Back").with_bounds(Rect::new(0, 0, 600, 500)))
            .with_window(
                MockWindow::new(2, "Front")
                    .with_bounds(Rect::new(200, 60, 400, 300))
                    .with_frame(Rect::new(192, 52, 408, 308)),
            );

        let req = resolve(&ws, Some(h(2)), true).unwrap();
        assert_eq!(req.background, Some(h(1)));
    }

    #[test]
    fn test_owner_fallback_when_probes_miss() {
        // Nothing visible above the dialog, but it has an owner
        let ws = MockWindowSystem::new()
            .with_window(
                MockWindow::new(1, "Main")
                    .with_bounds(Rect::new(0, 300, 800, 900))
                    .hidden(),
            )
            .with_window(
                MockWindow::new(2, "Dialog")
                    .with_bounds(Rect::new(100, 400, 700, 800))
                    .with_owner(h(1)),
            );

        let req = resolve(&ws, Some(h(2)), true).unwrap();
        assert_eq!(req.background, Some(h(1)));
    }

    #[test]
    fn test_union_degrades_to_single_window() {
        let ws = MockWindowSystem::new().with_window(
            MockWindow::new(1, "Lonely").with_bounds(Rect::new(500, 500, 900, 800)),
        );

        let req = resolve(&ws, Some(h(1)), true).unwrap();
        assert_eq!(req.primary, h(1));
        assert_eq!(req.background, None);
    }
}
