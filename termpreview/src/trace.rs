// ABOUTME: Diagnostic trace events emitted by the preview orchestrator
// ABOUTME: Sinks are injected at construction; the log-backed sink is silent unless enabled

use crate::detection::TerminalCapabilities;
use crate::env::EnvSnapshot;
use crate::types::Protocol;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Probed(TerminalCapabilities),
    Skipped(Protocol),
    Attempting(Protocol),
    AttemptFailed { protocol: Protocol, message: String },
    Delivered(Protocol),
    Exhausted(String),
}

pub trait TraceSink {
    fn record(&self, event: &TraceEvent);
}

/// Forwards events to the `log` facade under the `termpreview` target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace {
    enabled: bool,
}

impl LogTrace {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled when PREVIEW_DEBUG is "1" or "true"
    pub fn from_env() -> Self {
        Self::new(EnvSnapshot::capture().debug_enabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TraceSink for LogTrace {
    fn record(&self, event: &TraceEvent) {
        if !self.enabled {
            return;
        }

        match event {
            TraceEvent::Probed(caps) => log::debug!(
                target: "termpreview",
                "probe: terminal={} kitty={} inline={} sixel={}",
                caps.terminal_name,
                caps.kitty,
                caps.inline,
                caps.sixel
            ),
            TraceEvent::Skipped(protocol) => {
                log::debug!(target: "termpreview", "{}: not capable, skipping", protocol)
            }
            TraceEvent::Attempting(protocol) => {
                log::debug!(target: "termpreview", "{}: attempting", protocol)
            }
            TraceEvent::AttemptFailed { protocol, message } => {
                log::debug!(target: "termpreview", "{}: failed: {}", protocol, message)
            }
            TraceEvent::Delivered(protocol) => {
                log::debug!(target: "termpreview", "{}: delivered", protocol)
            }
            TraceEvent::Exhausted(reason) => {
                log::debug!(target: "termpreview", "exhausted: {}", reason)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn record(&self, _event: &TraceEvent) {}
}

/// Keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Protocols in the order they were attempted
    pub fn attempted(&self) -> Vec<Protocol> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TraceEvent::Attempting(protocol) => Some(protocol),
                _ => None,
            })
            .collect()
    }
}

impl TraceSink for RecordingTrace {
    fn record(&self, event: &TraceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &T {
    fn record(&self, event: &TraceEvent) {
        (**self).record(event)
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn record(&self, event: &TraceEvent) {
        (**self).record(event)
    }
}
