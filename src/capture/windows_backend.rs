//! Windows implementation of [`WindowSystem`] on GDI and DWM
//!
//! This backend answers window queries through Win32 and produces pixels
//! two ways, matching the renderer's two passes:
//!
//! - **Screen copies**: `BitBlt` from the screen DC. Sees exactly what is
//!   on screen, including DWM-drawn shadows and rounded corners, but also
//!   any occluding window.
//! - **Direct client rendering**: `PrintWindow` with `PW_CLIENTONLY`,
//!   which asks the window to paint itself into a memory DC regardless of
//!   what covers it on screen.
//!
//! Extended bounds come from `DwmGetWindowAttribute(DWMWA_EXTENDED_FRAME_BOUNDS)`;
//! windows that predate DWM frame reporting fail that query and the
//! renderer falls back to the plain `GetWindowRect` rectangle.
//!
//! GDI objects are wrapped in small RAII guards so every early return
//! releases its DCs and bitmaps.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::ptr;

use image::RgbaImage;
use windows_sys::Win32::{
    Foundation::{HWND, POINT, RECT},
    Graphics::{
        Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute},
        Gdi::{
            BITMAPINFO, BITMAPINFOHEADER, BitBlt, ClientToScreen, CreateCompatibleBitmap,
            CreateCompatibleDC, DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, HBITMAP,
            HDC, ReleaseDC, SRCCOPY, SelectObject,
        },
    },
    UI::WindowsAndMessaging::{
        GA_ROOT, GA_ROOTOWNER, GetAncestor, GetClassNameW, GetClientRect, GetForegroundWindow,
        GetWindowRect, GetWindowTextW, IsWindow, PW_CLIENTONLY, PrintWindow, WindowFromPoint,
    },
};

use super::{PixelSurface, WindowSystem, constants::MAX_WINDOW_TEXT};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{Rect, WindowHandle},
};

/// Windows GDI/DWM windowing system
///
/// Stateless; every call goes straight to Win32. Construct once and share
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct GdiWindowSystem {
    _private: (),
}

impl GdiWindowSystem {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

fn hwnd_of(handle: WindowHandle) -> HWND {
    handle.as_raw() as isize as HWND
}

fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle::from_raw(hwnd as isize as i64)
}

fn rect_of(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

/// Reads UTF-16 window text through `read` into a fixed 256-unit buffer.
///
/// The buffer size is the windowing API's own practical limit for titles
/// and class names; longer text is silently truncated by the API.
fn read_window_text(read: impl FnOnce(*mut u16, i32) -> i32) -> String {
    let mut buffer = [0u16; MAX_WINDOW_TEXT];
    let copied = read(buffer.as_mut_ptr(), buffer.len() as i32);
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buffer[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

/// Screen DC released on drop
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> CaptureResult<Self> {
        // SAFETY: a null HWND requests the DC for the whole screen
        let dc = unsafe { GetDC(ptr::null_mut()) };
        if dc.is_null() {
            return Err(CaptureError::SurfaceUnavailable {
                reason: "GetDC(NULL) returned no screen device context".to_string(),
            });
        }
        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by GetDC(NULL)
        unsafe { ReleaseDC(ptr::null_mut(), self.0) };
    }
}

/// Memory DC with a compatible bitmap selected into it, torn down in
/// reverse order on drop
struct MemoryCanvas {
    dc:     HDC,
    bitmap: HBITMAP,
    old:    *mut core::ffi::c_void,
}

impl MemoryCanvas {
    fn create(screen: &ScreenDc, width: i32, height: i32) -> CaptureResult<Self> {
        // SAFETY: screen.0 is a live DC for the lifetime of this call
        let dc = unsafe { CreateCompatibleDC(screen.0) };
        if dc.is_null() {
            return Err(CaptureError::SurfaceUnavailable {
                reason: "CreateCompatibleDC failed".to_string(),
            });
        }

        // SAFETY: screen.0 is a live DC; dimensions were validated positive
        let bitmap = unsafe { CreateCompatibleBitmap(screen.0, width, height) };
        if bitmap.is_null() {
            // SAFETY: dc was just created above
            unsafe { DeleteDC(dc) };
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!("CreateCompatibleBitmap({width}x{height}) failed"),
            });
        }

        // SAFETY: dc and bitmap are both live and unselected
        let old = unsafe { SelectObject(dc, bitmap as _) };
        Ok(Self { dc, bitmap, old })
    }

    /// Reads the bitmap out as a top-down RGBA buffer.
    ///
    /// GDI hands back BGRA scanlines with an undefined alpha byte, so the
    /// channels are swizzled and alpha forced opaque.
    fn read_pixels(&self, width: i32, height: i32) -> CaptureResult<RgbaImage> {
        let mut info: BITMAPINFO = unsafe { std::mem::zeroed() };
        info.bmiHeader = BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            // Negative height requests top-down scanline order
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: 0, // BI_RGB
            ..unsafe { std::mem::zeroed() }
        };

        let mut raw = vec![0u8; width as usize * height as usize * 4];
        // SAFETY: the bitmap is width x height at 32bpp and raw is sized to
        // exactly that; the bitmap is not selected into any other DC
        let lines = unsafe {
            GetDIBits(
                self.dc,
                self.bitmap,
                0,
                height as u32,
                raw.as_mut_ptr().cast(),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if lines != height {
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!("GetDIBits returned {lines} of {height} scanlines"),
            });
        }

        for px in raw.chunks_exact_mut(4) {
            px.swap(0, 2);
            px[3] = 0xFF;
        }

        RgbaImage::from_raw(width as u32, height as u32, raw).ok_or_else(|| {
            CaptureError::SurfaceUnavailable {
                reason: "pixel buffer did not match bitmap dimensions".to_string(),
            }
        })
    }
}

impl Drop for MemoryCanvas {
    fn drop(&mut self) {
        // SAFETY: restores the original selection, then frees the objects
        // this canvas created, in reverse creation order
        unsafe {
            SelectObject(self.dc, self.old);
            DeleteObject(self.bitmap as _);
            DeleteDC(self.dc);
        }
    }
}

impl WindowSystem for GdiWindowSystem {
    fn is_window(&self, handle: WindowHandle) -> bool {
        // SAFETY: IsWindow tolerates stale and null handles
        unsafe { IsWindow(hwnd_of(handle)) != 0 }
    }

    fn frame_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        if !self.is_window(handle) {
            return Err(CaptureError::WindowGone { handle });
        }

        let mut rect = RECT {
            left:   0,
            top:    0,
            right:  0,
            bottom: 0,
        };
        // SAFETY: rect outlives the call and cbAttribute matches its size
        let hr = unsafe {
            DwmGetWindowAttribute(
                hwnd_of(handle),
                DWMWA_EXTENDED_FRAME_BOUNDS as u32,
                (&raw mut rect).cast(),
                std::mem::size_of::<RECT>() as u32,
            )
        };
        if hr != 0 {
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!("DwmGetWindowAttribute failed with HRESULT {hr:#010x}"),
            });
        }
        Ok(rect_of(rect))
    }

    fn window_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        let mut rect = RECT {
            left:   0,
            top:    0,
            right:  0,
            bottom: 0,
        };
        // SAFETY: rect outlives the call
        if unsafe { GetWindowRect(hwnd_of(handle), &mut rect) } == 0 {
            return Err(CaptureError::WindowGone { handle });
        }
        Ok(rect_of(rect))
    }

    fn client_bounds(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        let mut client = RECT {
            left:   0,
            top:    0,
            right:  0,
            bottom: 0,
        };
        // SAFETY: client outlives the call
        if unsafe { GetClientRect(hwnd_of(handle), &mut client) } == 0 {
            return Err(CaptureError::WindowGone { handle });
        }

        // GetClientRect is origin-relative; translate to screen coordinates
        let mut origin = POINT { x: 0, y: 0 };
        // SAFETY: origin outlives the call
        if unsafe { ClientToScreen(hwnd_of(handle), &mut origin) } == 0 {
            return Err(CaptureError::WindowGone { handle });
        }

        Ok(Rect::from_origin_size(
            origin.x,
            origin.y,
            client.right - client.left,
            client.bottom - client.top,
        ))
    }

    fn ancestor_root(&self, handle: WindowHandle) -> Option<WindowHandle> {
        // SAFETY: GetAncestor tolerates stale handles and returns null
        let root = unsafe { GetAncestor(hwnd_of(handle), GA_ROOT) };
        (!root.is_null()).then(|| handle_of(root))
    }

    fn owner_root(&self, handle: WindowHandle) -> Option<WindowHandle> {
        // SAFETY: as above
        let root = unsafe { GetAncestor(hwnd_of(handle), GA_ROOTOWNER) };
        (!root.is_null()).then(|| handle_of(root))
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: no arguments; returns null when no window has focus
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_null()).then(|| handle_of(hwnd))
    }

    fn window_at_point(&self, x: i32, y: i32) -> Option<WindowHandle> {
        // SAFETY: plain value argument
        let hwnd = unsafe { WindowFromPoint(POINT { x, y }) };
        (!hwnd.is_null()).then(|| handle_of(hwnd))
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        // SAFETY: the closure passes a valid buffer of the stated length
        read_window_text(|buf, len| unsafe { GetWindowTextW(hwnd_of(handle), buf, len) })
    }

    fn window_class(&self, handle: WindowHandle) -> String {
        // SAFETY: as above
        read_window_text(|buf, len| unsafe { GetClassNameW(hwnd_of(handle), buf, len) })
    }

    fn render_client(&self, handle: WindowHandle) -> CaptureResult<PixelSurface> {
        let client = self.client_bounds(handle)?;
        if client.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  client.width(),
                height: client.height(),
            });
        }

        let screen = ScreenDc::acquire()?;
        let canvas = MemoryCanvas::create(&screen, client.width(), client.height())?;

        // SAFETY: canvas.dc is a live memory DC sized to the client area
        let ok = unsafe { PrintWindow(hwnd_of(handle), canvas.dc, PW_CLIENTONLY) };
        if ok == 0 {
            return Err(CaptureError::SurfaceUnavailable {
                reason: format!("PrintWindow refused to render window {handle}"),
            });
        }

        let pixels = canvas.read_pixels(client.width(), client.height())?;
        PixelSurface::from_image(pixels, client)
    }

    fn copy_screen_region(&self, region: Rect) -> CaptureResult<PixelSurface> {
        if region.is_degenerate() {
            return Err(CaptureError::DegenerateBounds {
                width:  region.width(),
                height: region.height(),
            });
        }

        let screen = ScreenDc::acquire()?;
        let canvas = MemoryCanvas::create(&screen, region.width(), region.height())?;

        // SAFETY: both DCs are live; the blit reads the screen at the
        // region's origin into the canvas at (0, 0)
        let ok = unsafe {
            BitBlt(
                canvas.dc,
                0,
                0,
                region.width(),
                region.height(),
                screen.0,
                region.left,
                region.top,
                SRCCOPY,
            )
        };
        if ok == 0 {
            return Err(CaptureError::SurfaceUnavailable {
                reason: "BitBlt from the screen failed".to_string(),
            });
        }

        let pixels = canvas.read_pixels(region.width(), region.height())?;
        PixelSurface::from_image(pixels, region)
    }
}
