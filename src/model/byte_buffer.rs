//! Immutable view over the loaded binary payload.

use std::sync::Arc;

/// Fixed-length byte payload shared by every snapshot of a viewing session.
///
/// Cloning is cheap (reference counted). The contents are never mutated in
/// place; a reload replaces the whole buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Arc<[u8]>,
}

impl ByteBuffer {
    /// Wrap owned bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Number of bytes (`N`).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Random-access lookup. `None` outside `[0, N)`.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Full byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes of one grid row for the given column count.
    ///
    /// The last row may be shorter than `columns`. Returns an empty slice for
    /// rows past the end or when `columns` is zero.
    pub fn row(&self, row: usize, columns: usize) -> &[u8] {
        if columns == 0 {
            return &[];
        }
        let start = row.saturating_mul(columns);
        if start >= self.len() {
            return &[];
        }
        let end = start.saturating_add(columns).min(self.len());
        &self.bytes[start..end]
    }

    /// Number of grid rows needed to show every byte.
    pub fn row_count(&self, columns: usize) -> usize {
        if columns == 0 {
            0
        } else {
            self.len().div_ceil(columns)
        }
    }

    /// Clamp an index into `[0, N)`. Returns `None` for an empty buffer.
    pub fn clamp_index(&self, index: i64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let last = (self.len() - 1) as i64;
        Some(index.clamp(0, last) as usize)
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

/// Printable classification used by the text column: visible ASCII glyphs.
///
/// Space and control characters are not printable.
pub fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic()
}

/// Classification of a byte for the text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// `0x00`.
    Null,
    /// Visible ASCII (`0x21..=0x7E`).
    Printable,
    /// Space and control characters below `0x7F`.
    NonPrintable,
    /// `0x7F` and above.
    Higher,
}

/// Classify a byte.
pub fn classify(byte: u8) -> ByteClass {
    match byte {
        0x00 => ByteClass::Null,
        b if is_printable(b) => ByteClass::Printable,
        0x7F..=0xFF => ByteClass::Higher,
        _ => ByteClass::NonPrintable,
    }
}
