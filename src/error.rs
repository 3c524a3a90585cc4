//! Error types for window capture operations
//!
//! Every failure the engine can hit maps to one `CaptureError` variant.
//! None of them escape [`CaptureEngine::on_key_event`](crate::engine::CaptureEngine::on_key_event):
//! the orchestrator logs and degrades instead. The typed variants let
//! intermediate layers decide which fallback applies and give the logs
//! something better than a bare `None`.

use crate::model::WindowHandle;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error type for window capture operations
///
/// Each variant carries enough context to log a useful degradation message
/// and provides a short next-step suggestion through
/// [`remediation_hint()`](CaptureError::remediation_hint).
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Target window vanished or never existed
    ///
    /// Windows can close between target resolution and rendering; this is
    /// an expected race, not a bug.
    #[error("window {handle} is gone or was never a live window")]
    WindowGone {
        /// The stale handle
        handle: WindowHandle,
    },

    /// A rectangle used to size a pixel buffer has zero or negative area
    #[error("degenerate capture bounds {width}x{height}")]
    DegenerateBounds {
        /// Computed width (may be <= 0)
        width:  i32,
        /// Computed height (may be <= 0)
        height: i32,
    },

    /// A pixel surface could not be produced
    ///
    /// Covers allocation failure in the windowing system, failed screen
    /// copies, and failed direct client rendering.
    #[error("pixel surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// Reason for the failure
        reason: String,
    },

    /// No encoder is registered for the requested MIME type
    #[error("no encoder registered for MIME type '{mime}'")]
    EncoderUnavailable {
        /// The MIME type that failed to resolve
        mime: String,
    },

    /// Image encoding failed
    #[error("failed to encode image as {mime}: {reason}")]
    EncodingFailed {
        /// MIME type of the encoder that failed
        mime:   String,
        /// Reason for the encoding failure
        reason: String,
    },

    /// Target resolution produced no capturable window
    ///
    /// Happens when the originating handle is invalid and the
    /// foreground-window fallback also comes up empty.
    #[error("no capture target could be resolved")]
    NoCaptureTarget,

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CaptureError {
    /// Returns a short next-step suggestion for this error
    ///
    /// Used in degradation log lines so a host integrator reading the logs
    /// knows whether a missed capture needs action or was a benign race.
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::WindowGone { .. } => {
                "The window closed before it could be rendered. Nothing to fix; the next key \
                 event is an independent attempt."
            }
            CaptureError::DegenerateBounds { .. } => {
                "The window reported zero or negative bounds, usually because it is minimized \
                 or mid-animation. Restore the window and trigger the capture again."
            }
            CaptureError::SurfaceUnavailable { .. } => {
                "The windowing system refused to produce pixels. Check available graphics \
                 resources; on remote sessions the screen may not be readable at all."
            }
            CaptureError::EncoderUnavailable { .. } => {
                "No encoder advertises the requested MIME type. Register one on the engine's \
                 EncoderRegistry; the default registry provides image/png."
            }
            CaptureError::EncodingFailed { .. } => {
                "The encoder rejected the surface. Verify the output directory is writable and \
                 the surface dimensions are sane."
            }
            CaptureError::NoCaptureTarget => {
                "Neither the originating window nor the foreground window resolved to a \
                 capturable root. Focus a window before triggering the capture key."
            }
            CaptureError::IoError(_) => {
                "An I/O error occurred. Check the output directory exists, file permissions, \
                 and disk space."
            }
        }
    }
}
