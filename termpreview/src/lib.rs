// ABOUTME: Terminal inline-image preview over Kitty graphics, OSC-1337 inline files and Sixel
// ABOUTME: Detects terminal capabilities and falls back through protocols until one delivers

pub mod constants;
pub mod detection;
pub mod env;
pub mod error;
pub mod orchestrator;
pub mod protocols;
pub mod trace;
pub mod types;

pub use detection::TerminalCapabilities;
pub use env::EnvSnapshot;
pub use error::PreviewError;
pub use orchestrator::{PreviewOrchestrator, PreviewSettings};
pub use protocols::{
    InlineTransmitter, KittyPlacement, KittyTransmitter, RendererCommand, RendererOutput,
    SixelSettings, SixelTransmitter, Transmitter,
};
pub use trace::{LogTrace, NoopTrace, RecordingTrace, TraceEvent, TraceSink};
pub use types::{Bitmap, BitmapEncoding, PreviewOutcome, Protocol};

/// Preview a bitmap on stdout with default settings, tracing when PREVIEW_DEBUG is set
pub fn preview(bitmap: &Bitmap) -> PreviewOutcome {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    PreviewOrchestrator::for_terminal().preview(bitmap, &mut out)
}
