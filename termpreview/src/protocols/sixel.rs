// ABOUTME: Sixel output delegated to external renderer processes (img2sixel, then chafa)
// ABOUTME: Pipes the PNG to each candidate in turn; its stdout is copied or handed the terminal

use super::inline::write_inline;
use super::{Transmitter, write_blank_lines};
use crate::constants::{layout, renderers};
use crate::error::PreviewError;
use crate::types::{Bitmap, Protocol};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// External program that reads an image on stdin and writes terminal graphics to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl RendererCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn img2sixel() -> Self {
        Self::new(renderers::IMG2SIXEL, renderers::IMG2SIXEL_ARGS.iter().copied())
    }

    pub fn chafa() -> Self {
        Self::new(renderers::CHAFA, renderers::CHAFA_ARGS.iter().copied())
    }
}

/// Where a renderer's stdout goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RendererOutput {
    /// Captured through a pipe and copied into the transmitter's writer
    #[default]
    Piped,
    /// The renderer writes straight to this process's stdout, so it can size
    /// itself from the terminal. Only valid when the writer is stdout.
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SixelSettings {
    /// Tried in order until one exits successfully
    pub renderers: Vec<RendererCommand>,
    /// Emit the OSC-1337 sequence when every renderer fails
    pub inline_last_resort: bool,
    pub output: RendererOutput,
}

impl Default for SixelSettings {
    fn default() -> Self {
        Self {
            renderers: vec![RendererCommand::img2sixel(), RendererCommand::chafa()],
            inline_last_resort: true,
            output: RendererOutput::Piped,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SixelTransmitter {
    settings: SixelSettings,
}

impl SixelTransmitter {
    pub fn new(settings: SixelSettings) -> Self {
        Self { settings }
    }
}

impl Transmitter for SixelTransmitter {
    fn protocol(&self) -> Protocol {
        Protocol::Sixel
    }

    fn send(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<(), PreviewError> {
        if bitmap.is_empty() {
            return Err(PreviewError::EmptyBitmap);
        }

        let mut last_error = None;
        for renderer in &self.settings.renderers {
            log::debug!(
                "sixel: trying {} for {} bytes",
                renderer.program,
                bitmap.len()
            );
            let rendered = match self.settings.output {
                RendererOutput::Piped => run_renderer(renderer, bitmap.as_bytes(), out),
                RendererOutput::Inherit => run_renderer_inherited(renderer, bitmap.as_bytes(), out),
            };
            match rendered {
                Ok(()) => {
                    log::debug!("sixel: {} succeeded", renderer.program);
                    write_blank_lines(out, layout::TRAILING_BLANK_LINES)?;
                    out.flush()?;
                    return Ok(());
                }
                Err(err) => {
                    log::debug!("sixel: {} failed: {}", renderer.program, err);
                    last_error = Some(err);
                }
            }
        }

        if self.settings.inline_last_resort {
            // Best effort; many terminals silently ignore it
            log::debug!("sixel: all renderers failed, writing inline sequence");
            return write_inline(bitmap.as_bytes(), out);
        }

        Err(last_error.unwrap_or_else(|| PreviewError::SubprocessUnavailable {
            program: "sixel renderer".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no renderers configured"),
        }))
    }
}

/// Run one renderer to completion. Blocks until the child exits; there is no timeout.
fn run_renderer(
    renderer: &RendererCommand,
    data: &[u8],
    out: &mut dyn Write,
) -> Result<(), PreviewError> {
    let unavailable = |source: io::Error| PreviewError::SubprocessUnavailable {
        program: renderer.program.clone(),
        source,
    };

    let mut child = Command::new(&renderer.program)
        .args(&renderer.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(unavailable)?;

    let (Some(mut stdin), Some(mut stdout)) = (child.stdin.take(), child.stdout.take()) else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(unavailable(io::Error::other("renderer pipes unavailable")));
    };

    // Feed stdin from a separate thread so a renderer that streams output
    // before draining its input cannot deadlock against us
    let copied = thread::scope(|scope| {
        scope.spawn(move || {
            // A renderer may exit without reading everything; its exit status decides
            let _ = stdin.write_all(data);
        });
        let copied = io::copy(&mut stdout, &mut *out);
        if copied.is_err() {
            // Unblocks the feeder before the scope joins it
            let _ = child.kill();
        }
        copied
    });

    if let Err(err) = copied {
        let _ = child.wait();
        return Err(PreviewError::WriteFailed(err));
    }

    let status = child.wait().map_err(unavailable)?;
    check_status(renderer, status)
}

/// Run one renderer with the terminal as its stdout. `out` is flushed first so
/// earlier buffered output lands before the renderer's.
fn run_renderer_inherited(
    renderer: &RendererCommand,
    data: &[u8],
    out: &mut dyn Write,
) -> Result<(), PreviewError> {
    out.flush()?;

    let unavailable = |source: io::Error| PreviewError::SubprocessUnavailable {
        program: renderer.program.clone(),
        source,
    };

    let mut child = Command::new(&renderer.program)
        .args(&renderer.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(unavailable)?;

    // Nothing to drain on our side, so feeding stdin inline cannot deadlock
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(data);
    }

    let status = child.wait().map_err(unavailable)?;
    check_status(renderer, status)
}

fn check_status(renderer: &RendererCommand, status: ExitStatus) -> Result<(), PreviewError> {
    if !status.success() {
        return Err(PreviewError::SubprocessFailed {
            program: renderer.program.clone(),
            status,
        });
    }
    Ok(())
}
