// ABOUTME: Integration tests for the public preview API
// ABOUTME: Drives the orchestrator with environment snapshots and in-memory writers

use std::io::{self, Write};
use termpreview::{
    Bitmap, EnvSnapshot, PreviewError, PreviewOrchestrator, PreviewOutcome, PreviewSettings,
    Protocol, RecordingTrace, TraceEvent,
};

/// Refuses anything that looks like a Kitty graphics command
struct NoKittyWriter {
    written: Vec<u8>,
}

impl Write for NoKittyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.starts_with(b"\x1b_G") {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "no kitty here"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn orchestrator() -> PreviewOrchestrator<RecordingTrace> {
    PreviewOrchestrator::new(PreviewSettings::default(), RecordingTrace::new())
}

fn sample_png() -> Bitmap {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend((0..5000u32).map(|i| (i % 256) as u8));
    Bitmap::png(data)
}

#[test]
fn test_kitty_terminal_gets_chunked_sequences() {
    let env = EnvSnapshot::from_pairs([("KITTY_WINDOW_ID", "3"), ("KITTY_PREVIEW_COLS", "64")]);
    let orchestrator = orchestrator();
    let mut out = Vec::new();

    let outcome = orchestrator.preview_in(&env, &sample_png(), &mut out);
    assert_eq!(outcome.protocol(), Some(Protocol::Kitty));

    // 5008 bytes encode to 6680 base64 characters: two chunks
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("\x1b_G").count(), 2);
    assert!(text.starts_with("\x1b_Ga=T,f=100,t=d,q=2,c=64,r=20,m=1;"));
    assert!(text.contains("\x1b\\\x1b_Gm=0;"));
    assert!(text.ends_with("\x1b\\\n"));

    assert_eq!(orchestrator.trace().attempted(), vec![Protocol::Kitty]);
}

#[test]
fn test_iterm_terminal_gets_inline_sequence() {
    let env = EnvSnapshot::from_pairs([("TERM_PROGRAM", "iTerm.app")]);
    let bitmap = sample_png();
    let mut out = Vec::new();

    let outcome = orchestrator().preview_in(&env, &bitmap, &mut out);
    assert!(outcome.is_delivered());

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(&format!("\x1b]1337;File=inline=1;size={}:", bitmap.len())));
    assert!(text.ends_with(&format!("\x07{}", "\n".repeat(20))));
}

#[test]
fn test_kitty_write_failure_falls_back_to_inline() {
    let env = EnvSnapshot::from_pairs([("TERM", "xterm-kitty"), ("TERM_PROGRAM", "WezTerm")]);
    let orchestrator = orchestrator();
    let mut out = NoKittyWriter {
        written: Vec::new(),
    };

    let outcome = orchestrator.preview_in(&env, &sample_png(), &mut out);
    assert_eq!(outcome.protocol(), Some(Protocol::Inline));
    assert!(out.written.starts_with(b"\x1b]1337;File=inline=1;"));

    let events = orchestrator.trace().events();
    assert!(events.iter().any(|event| matches!(
        event,
        TraceEvent::AttemptFailed {
            protocol: Protocol::Kitty,
            ..
        }
    )));
    assert_eq!(
        orchestrator.trace().attempted(),
        vec![Protocol::Kitty, Protocol::Inline]
    );
}

#[test]
fn test_plain_terminal_reports_no_protocol() {
    let env = EnvSnapshot::from_pairs([("TERM", "xterm-256color")]);
    let orchestrator = orchestrator();
    let mut out = Vec::new();

    match orchestrator.preview_in(&env, &sample_png(), &mut out) {
        PreviewOutcome::Failed(err) => {
            assert!(matches!(err, PreviewError::NoProtocolDetected));
            assert!(err.is_expected());
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(out.is_empty());
    assert!(orchestrator.trace().attempted().is_empty());
}

#[test]
fn test_empty_bitmap_writes_nothing() {
    let env = EnvSnapshot::from_pairs([("TERM_PROGRAM", "vscode")]);
    let mut out = Vec::new();

    let outcome = orchestrator().preview_in(&env, &Bitmap::png(Vec::new()), &mut out);
    assert!(matches!(
        outcome.into_result(),
        Err(PreviewError::EmptyBitmap)
    ));
    assert!(out.is_empty());
}
