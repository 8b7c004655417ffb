// ABOUTME: Kitty terminal graphics protocol implementation
// ABOUTME: Handles base64 encoding, 4096-char chunking and placement sizing for Kitty graphics

use super::Transmitter;
use crate::constants::{env_vars, kitty};
use crate::env::EnvSnapshot;
use crate::error::PreviewError;
use crate::types::{Bitmap, Protocol};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::io::{self, Write};

/// Cell area the image is scaled into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KittyPlacement {
    pub cols: u32,
    pub rows: u32,
}

impl Default for KittyPlacement {
    fn default() -> Self {
        Self {
            cols: kitty::DEFAULT_COLS,
            rows: kitty::DEFAULT_ROWS,
        }
    }
}

impl KittyPlacement {
    /// Apply KITTY_PREVIEW_COLS / KITTY_PREVIEW_ROWS; non-positive or unparsable values are ignored
    pub fn with_env_overrides(self, env: &EnvSnapshot) -> Self {
        Self {
            cols: env
                .positive_u32(env_vars::KITTY_PREVIEW_COLS)
                .unwrap_or(self.cols),
            rows: env
                .positive_u32(env_vars::KITTY_PREVIEW_ROWS)
                .unwrap_or(self.rows),
        }
    }
}

/// One slice of the base64 payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmissionChunk<'a> {
    pub payload: &'a str,
    pub more: bool,
}

impl TransmissionChunk<'_> {
    fn m_value(&self) -> u8 {
        u8::from(self.more)
    }
}

/// Split base64 text into protocol-sized chunks, flagging all but the last with `more`
pub fn chunk_payload(encoded: &str) -> impl Iterator<Item = TransmissionChunk<'_>> {
    let total = encoded.len();
    (0..total)
        .step_by(kitty::CHUNK_SIZE)
        .map(move |start| {
            let end = (start + kitty::CHUNK_SIZE).min(total);
            TransmissionChunk {
                // base64 is ASCII, so byte offsets are char boundaries
                payload: &encoded[start..end],
                more: end < total,
            }
        })
}

/// Build every control sequence for a bitmap, in transmission order
pub fn encode_sequences(data: &[u8], placement: KittyPlacement) -> Vec<String> {
    let base64_data = STANDARD.encode(data);

    chunk_payload(&base64_data)
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                // a=T transmit+display, f=100 PNG, t=d direct payload, q=2 suppress replies
                format!(
                    "{}a=T,f=100,t=d,q=2,c={},r={},m={};{}{}",
                    kitty::APC_START,
                    placement.cols,
                    placement.rows,
                    chunk.m_value(),
                    chunk.payload,
                    kitty::ST
                )
            } else {
                // Continuation chunks carry only the m key
                format!(
                    "{}m={};{}{}",
                    kitty::APC_START,
                    chunk.m_value(),
                    chunk.payload,
                    kitty::ST
                )
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct KittyTransmitter {
    placement: KittyPlacement,
}

impl KittyTransmitter {
    pub fn new(placement: KittyPlacement) -> Self {
        Self { placement }
    }
}

impl Transmitter for KittyTransmitter {
    fn protocol(&self) -> Protocol {
        Protocol::Kitty
    }

    fn send(&self, bitmap: &Bitmap, out: &mut dyn Write) -> Result<(), PreviewError> {
        if bitmap.is_empty() {
            return Err(PreviewError::EmptyBitmap);
        }

        log::debug!(
            "kitty: sending {} bytes at {}x{} cells",
            bitmap.len(),
            self.placement.cols,
            self.placement.rows
        );

        let sequences = encode_sequences(bitmap.as_bytes(), self.placement);
        let last = sequences.len().saturating_sub(1);
        // A completed m=1 chunk leaves the terminal waiting for more
        let mut transfer_open = false;

        for (i, sequence) in sequences.iter().enumerate() {
            let more = i < last;
            if let Err((sent, err)) = write_sequence(out, sequence.as_bytes()) {
                close_interrupted(out, sent > 0, transfer_open || (sent > 0 && more));
                return Err(PreviewError::WriteFailed(err));
            }
            transfer_open = more;
        }

        // Move the cursor below the image area
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

/// Write one control sequence, reporting how many bytes went out before a failure
fn write_sequence(out: &mut dyn Write, bytes: &[u8]) -> Result<(), (usize, io::Error)> {
    let mut sent = 0;
    while sent < bytes.len() {
        match out.write(&bytes[sent..]) {
            Ok(0) => {
                return Err((
                    sent,
                    io::Error::new(io::ErrorKind::WriteZero, "terminal accepted no bytes"),
                ));
            }
            Ok(n) => sent += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err((sent, err)),
        }
    }
    Ok(())
}

/// Best-effort cleanup after a failed write so later output is not swallowed
/// by an open APC string or an unfinished chunked transfer
fn close_interrupted(out: &mut dyn Write, sequence_open: bool, transfer_open: bool) {
    if sequence_open {
        let _ = out.write_all(kitty::ST.as_bytes());
    }
    if transfer_open {
        let _ = out.write_all(format!("{}m=0;{}", kitty::APC_START, kitty::ST).as_bytes());
    }
    let _ = out.flush();
}
