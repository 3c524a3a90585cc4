//! Data models and type definitions for keysnap
//!
//! This module defines the core types shared across the engine:
//! window handles and screen-space geometry, the abstract key event the
//! host delivers, the capture request produced by target resolution, and
//! the engine's immutable configuration snapshot.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a window surface owned by the windowing system
///
/// The engine never owns a window's lifetime; it only reads geometry and
/// content through the handle, and every read must tolerate the window
/// having vanished in the meantime. The raw value is whatever the backing
/// [`WindowSystem`](crate::capture::WindowSystem) uses natively (an HWND
/// on Windows, an arbitrary id in the mock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(i64);

impl WindowHandle {
    /// Wraps a raw windowing-system id
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw windowing-system id
    pub fn as_raw(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Axis-aligned integer bounding box in screen coordinates
///
/// Follows the windowing-system convention of `{left, top, right, bottom}`
/// with exclusive right/bottom edges. Any rect used to size a pixel buffer
/// must satisfy `right > left && bottom > top`; callers check
/// [`is_degenerate()`](Rect::is_degenerate) before allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left:   i32,
    pub top:    i32,
    pub right:  i32,
    pub bottom: i32,
}

impl Rect {
    /// Creates a rect from its four edges
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rect from an origin and a size
    pub fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Width in pixels (may be zero or negative for degenerate rects)
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels (may be zero or negative for degenerate rects)
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True if this rect cannot size a pixel buffer
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Smallest rect containing both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left:   self.left.min(other.left),
            top:    self.top.min(other.top),
            right:  self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// True if the point lies inside the rect (right/bottom exclusive)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Virtual key code of a keyboard event
///
/// Values follow the host platform's virtual-key numbering; the engine
/// only ever compares them for equality against the configured capture
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// F11, the default capture key (VK_F11)
    pub const F11: KeyCode = KeyCode(0x7A);
}

/// Whether a key event is a press or a release
///
/// Captures trigger on release only, so holding the key does not fire a
/// burst of captures from auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Abstract keyboard event delivered by the host's hook mechanism
///
/// The engine does not install hooks itself; whatever intercepts global
/// input translates its native event into this struct and hands it to
/// [`CaptureEngine::on_key_event`](crate::engine::CaptureEngine::on_key_event).
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// Virtual key code of the event
    pub key:        KeyCode,
    /// Press or release
    pub state:      KeyState,
    /// The window (often a child control) that received the key, if any
    pub origin:     Option<WindowHandle>,
    /// Ambient shift-modifier state at event time
    pub shift_held: bool,
}

impl KeyEvent {
    /// Convenience constructor for a key-release event
    pub fn released(key: KeyCode, origin: Option<WindowHandle>, shift_held: bool) -> Self {
        Self {
            key,
            state: KeyState::Released,
            origin,
            shift_held,
        }
    }
}

/// The window(s) a single capture operation will render
///
/// Produced once per qualifying key event by target resolution and
/// immutable for the remainder of the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    /// The window whose snapshot was requested (foreground of a union capture)
    pub primary:    WindowHandle,
    /// Optional second window composited behind the primary
    pub background: Option<WindowHandle>,
}

/// Immutable engine configuration snapshot
///
/// The engine holds the current snapshot behind a lock and replaces it
/// wholesale on [`configure()`](crate::engine::CaptureEngine::configure);
/// an in-flight capture keeps using the snapshot it read at the start of
/// the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Base directory for output files
    pub output_dir:  PathBuf,
    /// Key that triggers a capture on release
    pub capture_key: KeyCode,
}

impl CaptureConfig {
    /// Creates a config with the default capture key (F11)
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir:  output_dir.into(),
            capture_key: KeyCode::F11,
        }
    }

    /// Replaces the capture key
    pub fn with_capture_key(mut self, key: KeyCode) -> Self {
        self.capture_key = key;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_handle_round_trip() {
        let handle = WindowHandle::from_raw(0x00af_10c2);
        assert_eq!(handle.as_raw(), 0x00af_10c2);
        assert_eq!(handle.to_string(), "0xaf10c2");
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(10, 20, 110, 220);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 200);
        assert!(!rect.is_degenerate());
    }

    #[test]
    fn test_rect_from_origin_size() {
        let rect = Rect::from_origin_size(-5, 7, 30, 40);
        assert_eq!(rect, Rect::new(-5, 7, 25, 47));
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0, 0, 0, 10).is_degenerate());
        assert!(Rect::new(0, 0, 10, 0).is_degenerate());
        assert!(Rect::new(10, 10, 0, 0).is_degenerate());
        assert!(!Rect::new(0, 0, 1, 1).is_degenerate());
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, -20, 200, 80);
        assert_eq!(a.union(&b), Rect::new(0, -20, 200, 100));

        // Union with a contained rect is the outer rect
        let inner = Rect::new(10, 10, 90, 90);
        assert_eq!(a.union(&inner), a);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 9));
        assert!(!rect.contains(-1, 5));
    }

    #[test]
    fn test_key_event_released() {
        let event = KeyEvent::released(KeyCode::F11, Some(WindowHandle::from_raw(7)), true);
        assert_eq!(event.key, KeyCode::F11);
        assert_eq!(event.state, KeyState::Released);
        assert_eq!(event.origin, Some(WindowHandle::from_raw(7)));
        assert!(event.shift_held);
    }

    #[test]
    fn test_capture_config_defaults() {
        let config = CaptureConfig::new("/tmp/shots");
        assert_eq!(config.capture_key, KeyCode::F11);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/shots"));

        let config = config.with_capture_key(KeyCode(0x79));
        assert_eq!(config.capture_key, KeyCode(0x79));
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = CaptureConfig::new("/srv/captures").with_capture_key(KeyCode(0x7B));
        let json = serde_json::to_string(&config).unwrap();
        let back: CaptureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rect_serde_round_trip() {
        let rect = Rect::new(-8, -8, 808, 608);
        let json = serde_json::to_string(&rect).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
