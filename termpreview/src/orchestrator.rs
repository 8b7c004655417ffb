// ABOUTME: Preview orchestrator choosing a protocol from detected capabilities
// ABOUTME: Walks Kitty > inline > Sixel, falling back on failure and tracing every transition

use crate::detection::TerminalCapabilities;
use crate::env::EnvSnapshot;
use crate::error::PreviewError;
use crate::protocols::{
    InlineTransmitter, KittyPlacement, KittyTransmitter, RendererOutput, SixelSettings,
    SixelTransmitter, Transmitter,
};
use crate::trace::{LogTrace, TraceEvent, TraceSink};
use crate::types::{Bitmap, PreviewOutcome, Protocol};
use std::io::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Used when KITTY_PREVIEW_COLS / KITTY_PREVIEW_ROWS are unset or invalid
    pub placement: KittyPlacement,
    pub sixel: SixelSettings,
}

pub struct PreviewOrchestrator<S: TraceSink = LogTrace> {
    settings: PreviewSettings,
    trace: S,
}

impl PreviewOrchestrator<LogTrace> {
    /// Default settings for previews written to this process's stdout: Sixel
    /// renderers inherit the terminal, tracing follows PREVIEW_DEBUG
    pub fn for_terminal() -> Self {
        let mut settings = PreviewSettings::default();
        settings.sixel.output = RendererOutput::Inherit;
        Self::new(settings, LogTrace::from_env())
    }
}

impl<S: TraceSink> PreviewOrchestrator<S> {
    pub fn new(settings: PreviewSettings, trace: S) -> Self {
        Self { settings, trace }
    }

    pub fn trace(&self) -> &S {
        &self.trace
    }

    /// Probe the process environment and show the bitmap with the best available protocol
    pub fn preview(&self, bitmap: &Bitmap, out: &mut dyn Write) -> PreviewOutcome {
        self.preview_in(&EnvSnapshot::capture(), bitmap, out)
    }

    /// Same as [`preview`](Self::preview) against an explicit environment snapshot
    pub fn preview_in(
        &self,
        env: &EnvSnapshot,
        bitmap: &Bitmap,
        out: &mut dyn Write,
    ) -> PreviewOutcome {
        let capabilities = TerminalCapabilities::detect_from(env);
        self.preview_with(env, &capabilities, bitmap, out)
    }

    /// Skip detection and use the given capabilities, e.g. a forced protocol
    pub fn preview_with_capabilities(
        &self,
        capabilities: &TerminalCapabilities,
        bitmap: &Bitmap,
        out: &mut dyn Write,
    ) -> PreviewOutcome {
        self.preview_with(&EnvSnapshot::capture(), capabilities, bitmap, out)
    }

    fn preview_with(
        &self,
        env: &EnvSnapshot,
        capabilities: &TerminalCapabilities,
        bitmap: &Bitmap,
        out: &mut dyn Write,
    ) -> PreviewOutcome {
        let kitty = KittyTransmitter::new(self.settings.placement.with_env_overrides(env));
        let inline = InlineTransmitter;
        let sixel = SixelTransmitter::new(self.settings.sixel.clone());

        self.run_chain(capabilities, &[&kitty, &inline, &sixel], bitmap, out)
    }

    /// Try candidates in protocol priority order. A candidate is skipped when its
    /// capability is off; each protocol is attempted at most once; the first
    /// success wins; otherwise the last failure is returned.
    pub fn run_chain(
        &self,
        capabilities: &TerminalCapabilities,
        candidates: &[&dyn Transmitter],
        bitmap: &Bitmap,
        out: &mut dyn Write,
    ) -> PreviewOutcome {
        self.trace.record(&TraceEvent::Probed(capabilities.clone()));

        if !capabilities.supported() {
            return self.exhausted(PreviewError::NoProtocolDetected);
        }

        let mut last_error = None;
        for protocol in Protocol::PRIORITY {
            if !capabilities.supports(protocol) {
                self.trace.record(&TraceEvent::Skipped(protocol));
                continue;
            }
            let Some(transmitter) = candidates.iter().find(|t| t.protocol() == protocol) else {
                self.trace.record(&TraceEvent::Skipped(protocol));
                continue;
            };

            self.trace.record(&TraceEvent::Attempting(protocol));
            match transmitter.send(bitmap, out) {
                Ok(()) => {
                    self.trace.record(&TraceEvent::Delivered(protocol));
                    return PreviewOutcome::Delivered(protocol);
                }
                Err(err) => {
                    self.trace.record(&TraceEvent::AttemptFailed {
                        protocol,
                        message: err.to_string(),
                    });
                    last_error = Some(err);
                }
            }
        }

        self.exhausted(last_error.unwrap_or(PreviewError::NoProtocolDetected))
    }

    fn exhausted(&self, err: PreviewError) -> PreviewOutcome {
        self.trace.record(&TraceEvent::Exhausted(err.to_string()));
        PreviewOutcome::Failed(err)
    }
}
