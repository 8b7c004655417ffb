// ABOUTME: Error types for terminal preview with user-friendly messages
// ABOUTME: Every variant is recoverable; a failed preview never aborts the host program

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("no supported terminal preview protocol detected")]
    NoProtocolDetected,

    #[error("empty image data")]
    EmptyBitmap,

    #[error("failed to write to terminal: {0}")]
    WriteFailed(#[from] io::Error),

    #[error("renderer {program} could not be started: {source}")]
    SubprocessUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("renderer {program} failed ({status})")]
    SubprocessFailed { program: String, status: ExitStatus },
}

impl PreviewError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            PreviewError::NoProtocolDetected => Some(
                "Run inside Kitty, Ghostty, WezTerm, iTerm2 or a Sixel terminal, or set SIXEL_PREVIEW=1",
            ),
            PreviewError::SubprocessUnavailable { .. } => {
                Some("Install img2sixel (libsixel) or chafa and make sure it is on PATH")
            }
            PreviewError::SubprocessFailed { .. } => {
                Some("Run with PREVIEW_DEBUG=1 to see which renderers were tried")
            }
            _ => None,
        }
    }

    /// Plain terminals legitimately have no protocol; callers should not treat it as a fault
    pub fn is_expected(&self) -> bool {
        matches!(self, PreviewError::NoProtocolDetected)
    }
}
