//! Centralized capture constants.
//!
//! This module consolidates the fixed values the engine's heuristics and
//! naming rules depend on. Centralizing them keeps the background-window
//! probe replaceable and makes the filename rules auditable in one place.

use image::Rgba;

/// Vertical probe offsets, in pixels, used to discover a background window.
///
/// When a union capture is requested, the resolver probes points this many
/// pixels above the horizontal center of the primary root's top edge and
/// takes the first visible window whose own root differs from the primary's.
/// The values assume the owner window's title bar peeks out above the child;
/// they are window-manager dependent and strictly best-effort, which is why
/// the probe falls back to the owner chain when every offset misses.
pub const BACKGROUND_PROBE_OFFSETS: [i32; 3] = [6, 14, 24];

/// Fill color for union-area slivers covered by neither surface.
///
/// Only visible when the union of the two window bounds is not fully tiled
/// by the windows themselves (e.g. an L-shaped union).
pub const UNION_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Maximum window text length read from a backend, in code units.
///
/// Matches the fixed buffer size used for window-text queries on the
/// windowing system. Longer titles are silently truncated; truncation is
/// accepted, not an error.
pub const MAX_WINDOW_TEXT: usize = 256;

/// Basename used when a window has neither a title nor a class name.
pub const FALLBACK_BASENAME: &str = "window";

/// Characters that may not appear in an output filename.
///
/// The union of characters rejected by the filesystems the engine targets;
/// each occurrence is replaced with `_`.
pub const ILLEGAL_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Extension appended to every output file.
pub const OUTPUT_EXTENSION: &str = "png";

/// MIME type used to resolve the output encoder from the registry.
pub const PNG_MIME: &str = "image/png";
