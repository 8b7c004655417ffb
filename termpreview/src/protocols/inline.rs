// ABOUTME: OSC-1337 inline image protocol (iTerm2 style) implementation
// ABOUTME: Sends the whole PNG as one base64 File sequence, then pads the cursor below it

use super::{Transmitter, write_blank_lines};
use crate::constants::{inline, layout};
use crate::error::PreviewError;
use crate::types::{Bitmap, Protocol};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::io::Write;

/// `ESC ] 1337 ; File=inline=1;size=<raw bytes> : <base64> BEL`
pub fn encode_sequence(data: &[u8]) -> String {
    // size is the decoded length, not the base64 length
    format!(
        "{}inline=1;size={}:{}{}",
        inline::OSC_FILE_START,
        data.len(),
        STANDARD.encode(data),
        inline::BEL
    )
}

/// Emit the inline sequence and the trailing padding; shared with the Sixel last resort
pub(crate) fn write_inline(data: &[u8], out: &mut dyn Write) -> Result<(), PreviewError> {
    out.write_all(encode_sequence(data).as_bytes())?;
    // The protocol does not report the rendered height
    write_blank_lines(out, layout::TRAILING_BLANK_LINES)?;
    out.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InlineTransmitter;

impl Transmitter for InlineTransmitter {
    fn protocol(&self) -> Protocol {
        Protocol::Inline
    }

    fn send(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<(), PreviewError> {
        if bitmap.is_empty() {
            return Err(PreviewError::EmptyBitmap);
        }

        log::debug!("inline: sending {} bytes", bitmap.len());
        write_inline(bitmap.as_bytes(), out)
    }
}
