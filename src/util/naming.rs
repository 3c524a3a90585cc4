//! Output filename derivation
//!
//! Turns a window into a human-readable, filesystem-safe, collision-free
//! output path: title text first, class name when the title is empty, a
//! fixed generic name when both are, with filesystem-illegal characters
//! replaced and a `-N` suffix probed against the existing directory
//! contents until the path is free.

use std::path::{Path, PathBuf};

use crate::{
    capture::{
        WindowSystem,
        constants::{FALLBACK_BASENAME, ILLEGAL_FILENAME_CHARS, OUTPUT_EXTENSION},
    },
    model::WindowHandle,
};

/// Replaces filesystem-illegal characters with `_`
///
/// Falls back to the generic basename when the input is empty, so the
/// result is always usable as a filename component.
pub fn sanitize_name(raw: &str) -> String {
    if raw.is_empty() {
        return FALLBACK_BASENAME.to_string();
    }
    raw.chars()
        .map(|c| {
            if ILLEGAL_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Derives the output basename for a window
///
/// Prefers the window title, then the class name, then the generic
/// fallback, sanitized for the filesystem. Text is already truncated at
/// the windowing system's own buffer limit by the backend; truncation is
/// accepted, not an error.
pub fn window_basename(ws: &dyn WindowSystem, handle: WindowHandle) -> String {
    let title = ws.window_title(handle);
    let name = if title.is_empty() {
        ws.window_class(handle)
    } else {
        title
    };
    sanitize_name(&name)
}

/// Allocates a collision-free output path under `dir`
///
/// The first free candidate wins: `<basename>.png`, then
/// `<basename>-1.png`, `<basename>-2.png`, and so on. The check is
/// against current filesystem state only; the engine serializes captures,
/// so no atomicity against concurrent allocators is needed.
pub fn allocate(dir: &Path, basename: &str) -> PathBuf {
    let candidate = dir.join(format!("{basename}.{OUTPUT_EXTENSION}"));
    if !candidate.exists() {
        return candidate;
    }

    let mut index = 1u32;
    loop {
        let candidate = dir.join(format!("{basename}-{index}.{OUTPUT_EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}
