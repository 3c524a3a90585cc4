//! Capture orchestration
//!
//! `CaptureEngine` is the entry point the host's input hook talks to. Per
//! qualifying key event it sequences target resolution, one or two
//! surface renders, optional union compositing, filename allocation, and
//! encoding. It never lets a failure escape: a missed screenshot is
//! always preferred over disturbing the host process.
//!
//! The engine is synchronous and run-to-completion. It assumes the host's
//! event delivery serializes calls; it takes no locks around a capture
//! beyond the config-snapshot read at the start.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    capture::{PixelSurface, WindowSystem, constants::PNG_MIME},
    error::{CaptureError, CaptureResult},
    model::{CaptureConfig, CaptureRequest, KeyEvent, KeyState},
    util::{encode::EncoderRegistry, naming},
};

mod compositor;
mod renderer;
mod resolver;

/// Hotkey-triggered window capture engine
///
/// Construct once with a [`WindowSystem`] and an initial [`CaptureConfig`],
/// then feed it key events from whatever hook mechanism the host uses.
/// [`configure()`](Self::configure) may be called at any time to point
/// subsequent captures at a new output directory.
pub struct CaptureEngine {
    window_system: Arc<dyn WindowSystem>,
    config:        RwLock<Arc<CaptureConfig>>,
    encoders:      EncoderRegistry,
}

impl CaptureEngine {
    /// Creates an engine with the default encoder registry (PNG)
    pub fn new(window_system: Arc<dyn WindowSystem>, config: CaptureConfig) -> Self {
        Self {
            window_system,
            config: RwLock::new(Arc::new(config)),
            encoders: EncoderRegistry::with_defaults(),
        }
    }

    /// Replaces the encoder registry
    pub fn with_encoders(mut self, encoders: EncoderRegistry) -> Self {
        self.encoders = encoders;
        self
    }

    /// Returns the current configuration snapshot
    pub fn config(&self) -> Arc<CaptureConfig> {
        self.config.read().clone()
    }

    /// Points subsequent captures at a new output directory
    ///
    /// Replaces the whole configuration snapshot; the capture key carries
    /// over. Idempotent: configuring the same directory twice leaves the
    /// engine in the same state, with no accumulated side effects. An
    /// in-flight capture keeps the snapshot it read when it started.
    pub fn configure(&self, output_dir: impl Into<PathBuf>) {
        let output_dir = output_dir.into();
        let mut slot = self.config.write();
        let next = CaptureConfig {
            output_dir,
            capture_key: slot.capture_key,
        };
        info!(output_dir = %next.output_dir.display(), "capture output directory configured");
        *slot = Arc::new(next);
    }

    /// Handles one key event, capturing if it qualifies
    ///
    /// Only a release of the configured capture key triggers a capture;
    /// everything else is ignored, which also filters the auto-repeat
    /// presses of a held key. Never panics and never returns an error;
    /// every internal failure degrades to "no file written" with a log
    /// line.
    pub fn on_key_event(&self, event: &KeyEvent) {
        let config = self.config();
        if event.state != KeyState::Released || event.key != config.capture_key {
            return;
        }

        match self.capture(&config, event) {
            Ok(path) => info!(path = %path.display(), "window snapshot written"),
            Err(err @ CaptureError::EncoderUnavailable { .. }) => {
                warn!(%err, "capture aborted: {}", err.remediation_hint());
            }
            Err(err) => {
                debug!(%err, "capture skipped: {}", err.remediation_hint());
            }
        }
    }

    fn capture(&self, config: &CaptureConfig, event: &KeyEvent) -> CaptureResult<PathBuf> {
        let ws = self.window_system.as_ref();
        let request = resolver::resolve(ws, event.origin, event.shift_held)
            .ok_or(CaptureError::NoCaptureTarget)?;

        let surface = self.render_request(ws, request)?;

        let basename = naming::window_basename(ws, request.primary);
        let path = naming::allocate(&config.output_dir, &basename);

        let encoder = self
            .encoders
            .find(PNG_MIME)
            .ok_or_else(|| CaptureError::EncoderUnavailable {
                mime: PNG_MIME.to_string(),
            })?;
        encoder.encode_to_file(&surface, &path)?;
        Ok(path)
    }

    /// Renders the request, degrading a union capture to the primary
    /// alone when the background leg fails
    fn render_request(
        &self,
        ws: &dyn WindowSystem,
        request: CaptureRequest,
    ) -> CaptureResult<PixelSurface> {
        let foreground = renderer::render(ws, request.primary)?;

        let Some(bg_handle) = request.background else {
            return Ok(foreground);
        };

        let background = match renderer::render(ws, bg_handle) {
            Ok(surface) => surface,
            Err(err) => {
                debug!(background = %bg_handle, %err, "background render failed, capturing primary alone");
                return Ok(foreground);
            }
        };

        match compositor::compose(background, foreground) {
            Ok(composite) => Ok(composite),
            Err(err) => {
                debug!(%err, "compositing failed, capturing primary alone");
                renderer::render(ws, request.primary)
            }
        }
    }
}

impl std::fmt::Debug for CaptureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureEngine")
            .field("config", &self.config())
            .field("encoders", &self.encoders)
            .finish()
    }
}
