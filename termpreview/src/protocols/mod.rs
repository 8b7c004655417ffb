// ABOUTME: Transmitter implementations for terminal inline image protocols
// ABOUTME: Each transmitter frames a PNG bitmap for one protocol and writes it to a terminal stream

use crate::error::PreviewError;
use crate::types::{Bitmap, Protocol};
use std::io::Write;

pub trait Transmitter {
    /// Protocol this transmitter speaks
    fn protocol(&self) -> Protocol;

    /// Write the bitmap to the terminal stream; an empty bitmap fails before any output
    fn send(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<(), PreviewError>;
}

pub mod inline;
pub mod kitty;
pub mod sixel;

pub use inline::InlineTransmitter;
pub use kitty::{KittyPlacement, KittyTransmitter};
pub use sixel::{RendererCommand, RendererOutput, SixelSettings, SixelTransmitter};

/// Push the cursor below an image whose rendered height is unknown
pub(crate) fn write_blank_lines(out: &mut dyn Write, count: usize) -> Result<(), PreviewError> {
    out.write_all("\n".repeat(count).as_bytes())?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_blank_lines() {
        let mut out = Vec::new();
        write_blank_lines(&mut out, 3).unwrap();
        assert_eq!(out, b"\n\n\n");
    }

    #[test]
    fn test_write_blank_lines_reports_write_failure() {
        let mut out = test_support::FailingWriter::failing_after(0);
        let err = write_blank_lines(&mut out, 2).unwrap_err();
        assert!(matches!(err, PreviewError::WriteFailed(_)));
    }
}
