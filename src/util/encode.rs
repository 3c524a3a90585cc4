//! Surface encoders and MIME-keyed encoder lookup
//!
//! The engine never hardcodes an encoding path; it asks an
//! [`EncoderRegistry`] for the encoder advertising the MIME type it
//! wants and aborts the capture when none is registered. The default
//! registry carries a single lossless PNG encoder built on the `image`
//! crate.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    capture::{PixelSurface, constants::PNG_MIME},
    error::{CaptureError, CaptureResult},
};

/// A capability that can persist a pixel surface to a file
///
/// Implementations advertise exactly one MIME type; the registry matches
/// on it verbatim.
pub trait SurfaceEncoder: Send + Sync {
    /// The MIME type this encoder produces
    fn mime_type(&self) -> &'static str;

    /// Encodes `surface` and writes it to `path` in a single call
    ///
    /// # Errors
    ///
    /// [`CaptureError::IoError`] if the file cannot be created,
    /// [`CaptureError::EncodingFailed`] if the codec rejects the surface.
    fn encode_to_file(&self, surface: &PixelSurface, path: &Path) -> CaptureResult<()>;
}

/// Lossless PNG encoder
///
/// Uses default compression with adaptive per-scanline filtering, the
/// usual balance between encoding speed and file size for screenshots.
#[derive(Debug, Default)]
pub struct PngFileEncoder;

impl PngFileEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceEncoder for PngFileEncoder {
    fn mime_type(&self) -> &'static str {
        PNG_MIME
    }

    fn encode_to_file(&self, surface: &PixelSurface, path: &Path) -> CaptureResult<()> {
        let file = File::create(path)?;
        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            CompressionType::Default,
            FilterType::Adaptive,
        );

        encoder
            .write_image(
                surface.image().as_raw(),
                surface.width(),
                surface.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CaptureError::EncodingFailed {
                mime:   PNG_MIME.to_string(),
                reason: e.to_string(),
            })
    }
}

/// The set of available encoders, queried by MIME type
///
/// The Rust face of "enumerate the installed image encoders and pick the
/// one whose advertised MIME type matches": hosts can register additional
/// encoders, and a lookup miss is an environment problem surfaced as
/// [`CaptureError::EncoderUnavailable`] by the caller.
#[derive(Default)]
pub struct EncoderRegistry {
    encoders: Vec<Box<dyn SurfaceEncoder>>,
}

impl EncoderRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            encoders: Vec::new(),
        }
    }

    /// Creates a registry with the stock PNG encoder registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PngFileEncoder::new()));
        registry
    }

    /// Adds an encoder; later registrations win on MIME-type ties
    pub fn register(&mut self, encoder: Box<dyn SurfaceEncoder>) {
        self.encoders.push(encoder);
    }

    /// Finds the encoder advertising `mime`, if any
    pub fn find(&self, mime: &str) -> Option<&dyn SurfaceEncoder> {
        self.encoders
            .iter()
            .rev()
            .find(|e| e.mime_type() == mime)
            .map(|e| e.as_ref())
    }

    /// MIME types currently registered, for diagnostics
    pub fn mime_types(&self) -> Vec<&'static str> {
        self.encoders.iter().map(|e| e.mime_type()).collect()
    }
}

impl std::fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("mime_types", &self.mime_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::model::Rect;

    #[test]
    fn test_default_registry_resolves_png() {
        let registry = EncoderRegistry::with_defaults();
        let encoder = registry.find(PNG_MIME).expect("png encoder registered");
        assert_eq!(encoder.mime_type(), PNG_MIME);
    }

    #[test]
    fn test_unknown_mime_misses() {
        let registry = EncoderRegistry::with_defaults();
        assert!(registry.find("image/webp").is_none());
        assert!(EncoderRegistry::new().find(PNG_MIME).is_none());
    }

    #[test]
    fn test_png_round_trip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");

        let surface =
            PixelSurface::filled(Rect::new(0, 0, 40, 30), Rgba([250, 128, 7, 255])).unwrap();
        PngFileEncoder::new().encode_to_file(&surface, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (40, 30));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([250, 128, 7, 255]));
        assert_eq!(*decoded.get_pixel(39, 29), Rgba([250, 128, 7, 255]));
    }

    #[test]
    fn test_encode_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-subdir").join("shot.png");

        let surface = PixelSurface::new(Rect::new(0, 0, 4, 4)).unwrap();
        let result = PngFileEncoder::new().encode_to_file(&surface, &path);
        assert!(matches!(result, Err(CaptureError::IoError(_))));
    }

    #[test]
    fn test_later_registration_wins() {
        struct FakePng;
        impl SurfaceEncoder for FakePng {
            fn mime_type(&self) -> &'static str {
                PNG_MIME
            }
            fn encode_to_file(&self, _: &PixelSurface, _: &Path) -> CaptureResult<()> {
                Err(CaptureError::EncodingFailed {
                    mime:   PNG_MIME.to_string(),
                    reason: "fake".to_string(),
                })
            }
        }

        let mut registry = EncoderRegistry::with_defaults();
        registry.register(Box::new(FakePng));

        let surface = PixelSurface::new(Rect::new(0, 0, 2, 2)).unwrap();
        let result = registry
            .find(PNG_MIME)
            .unwrap()
            .encode_to_file(&surface, Path::new("/dev/null"));
        assert!(matches!(result, Err(CaptureError::EncodingFailed { .. })));
    }
}
