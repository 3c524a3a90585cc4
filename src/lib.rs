//! keysnap: hotkey-triggered window capture and compositing engine
//!
//! keysnap turns a key release into a lossless PNG snapshot of the window
//! that received it. It resolves the true top-level target from whatever
//! child control got the key, renders the window with a two-pass strategy
//! that survives occlusion while keeping the compositor-drawn chrome, can
//! composite a child window over the window behind it into one union
//! image, and writes the result under a human-readable, collision-free
//! filename.
//!
//! The crate does not install global hooks and owns no windows: the host
//! delivers abstract [`KeyEvent`]s to a [`CaptureEngine`], and all window
//! access goes through the [`WindowSystem`](capture::WindowSystem) trait.
//! A GDI/DWM implementation is provided on Windows; the scriptable
//! [`MockWindowSystem`](capture::MockWindowSystem) backs tests and
//! development on every platform.
//!
//! ```
//! use std::sync::Arc;
//!
//! use keysnap::{
//!     CaptureConfig, CaptureEngine, KeyCode, KeyEvent, Rect,
//!     capture::{MockWindow, MockWindowSystem},
//! };
//!
//! let desktop = MockWindowSystem::new()
//!     .with_window(MockWindow::new(1, "My App").with_bounds(Rect::new(0, 0, 800, 600)));
//!
//! let dir = tempfile::tempdir().unwrap();
//! let engine = CaptureEngine::new(Arc::new(desktop), CaptureConfig::new(dir.path()));
//!
//! engine.on_key_event(&KeyEvent::released(KeyCode::F11, Some(keysnap::WindowHandle::from_raw(1)), false));
//! assert!(dir.path().join("My App.png").exists());
//! ```

pub mod capture;
pub mod engine;
pub mod error;
pub mod model;
pub mod util;

pub use capture::{MockWindowSystem, PixelSurface, WindowSystem};
#[cfg(target_os = "windows")]
pub use capture::GdiWindowSystem;
pub use engine::CaptureEngine;
pub use error::{CaptureError, CaptureResult};
pub use model::{CaptureConfig, CaptureRequest, KeyCode, KeyEvent, KeyState, Rect, WindowHandle};
