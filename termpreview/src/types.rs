// ABOUTME: Core value types shared by the probe, transmitters and orchestrator
// ABOUTME: Bitmap buffers, protocol identifiers and preview outcomes

use crate::error::PreviewError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BitmapEncoding {
    Png,
}

/// Encoded image bytes handed to the preview subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    data: Vec<u8>,
    encoding: BitmapEncoding,
}

impl Bitmap {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            data,
            encoding: BitmapEncoding::Png,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn encoding(&self) -> BitmapEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Terminal graphics protocols, declared in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Kitty,
    Inline,
    Sixel,
}

impl Protocol {
    pub const PRIORITY: [Protocol; 3] = [Protocol::Kitty, Protocol::Inline, Protocol::Sixel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Kitty => "kitty",
            Protocol::Inline => "inline",
            Protocol::Sixel => "sixel",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum PreviewOutcome {
    /// Image reached the terminal through this protocol
    Delivered(Protocol),
    /// Every candidate failed, or none was available
    Failed(PreviewError),
}

impl PreviewOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PreviewOutcome::Delivered(_))
    }

    pub fn protocol(&self) -> Option<Protocol> {
        match self {
            PreviewOutcome::Delivered(protocol) => Some(*protocol),
            PreviewOutcome::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Protocol, PreviewError> {
        match self {
            PreviewOutcome::Delivered(protocol) => Ok(protocol),
            PreviewOutcome::Failed(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_accessors() {
        let bitmap = Bitmap::png(vec![1, 2, 3]);
        assert_eq!(bitmap.len(), 3);
        assert!(!bitmap.is_empty());
        assert_eq!(bitmap.as_bytes(), &[1, 2, 3]);
        assert_eq!(bitmap.encoding(), BitmapEncoding::Png);
        assert!(Bitmap::png(Vec::new()).is_empty());
    }

    #[test]
    fn test_protocol_priority_matches_ordering() {
        let mut sorted = Protocol::PRIORITY;
        sorted.sort();
        assert_eq!(sorted, Protocol::PRIORITY);
        assert_eq!(Protocol::PRIORITY[0], Protocol::Kitty);
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Kitty.to_string(), "kitty");
        assert_eq!(Protocol::Inline.to_string(), "inline");
        assert_eq!(Protocol::Sixel.to_string(), "sixel");
    }

    #[test]
    fn test_protocol_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Protocol::Inline).unwrap(), "\"inline\"");
        assert_eq!(
            serde_json::to_string(&Protocol::PRIORITY).unwrap(),
            r#"["kitty","inline","sixel"]"#
        );
    }

    #[test]
    fn test_outcome_conversions() {
        let delivered = PreviewOutcome::Delivered(Protocol::Sixel);
        assert!(delivered.is_delivered());
        assert_eq!(delivered.protocol(), Some(Protocol::Sixel));
        assert_eq!(delivered.into_result().unwrap(), Protocol::Sixel);

        let failed = PreviewOutcome::Failed(PreviewError::EmptyBitmap);
        assert!(!failed.is_delivered());
        assert_eq!(failed.protocol(), None);
        assert!(matches!(
            failed.into_result(),
            Err(PreviewError::EmptyBitmap)
        ));
    }
}
