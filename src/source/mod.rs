//! Byte payload sources.
//!
//! Loads the buffer to view from a file or from piped stdin, either as raw
//! bytes or as hex-encoded text.

use crate::model::error::InputError;
use crate::model::ByteBuffer;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing::info;

/// Where the payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read a file once.
    File(PathBuf),
    /// Read piped stdin to EOF.
    Stdin,
}

/// How the payload is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// Bytes as-is.
    #[default]
    Raw,
    /// Hex digit pairs; whitespace anywhere is ignored.
    Hex,
}

/// Pick the input source.
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is given and stdin is a terminal,
/// so the viewer never blocks waiting for keyboard input.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(path)),
        None if std::io::stdin().is_terminal() => Err(InputError::NoInput),
        None => Ok(InputSource::Stdin),
    }
}

/// Read and decode the whole payload.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` for a missing file, `InputError::Io`
/// for read failures and `InputError::InvalidHex` for malformed hex input.
pub fn load_buffer(source: &InputSource, encoding: PayloadEncoding) -> Result<ByteBuffer, InputError> {
    let bytes = match source {
        InputSource::File(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound { path: path.clone() });
            }
            std::fs::read(path)?
        }
        InputSource::Stdin => read_all(std::io::stdin().lock())?,
    };
    let bytes = decode_payload(bytes, encoding)?;
    info!(len = bytes.len(), ?source, "Loaded payload");
    Ok(ByteBuffer::from(bytes))
}

/// Drain a reader.
pub fn read_all(mut reader: impl Read) -> Result<Vec<u8>, InputError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Apply the payload encoding.
pub fn decode_payload(bytes: Vec<u8>, encoding: PayloadEncoding) -> Result<Vec<u8>, InputError> {
    match encoding {
        PayloadEncoding::Raw => Ok(bytes),
        PayloadEncoding::Hex => decode_hex_payload(&bytes),
    }
}

/// Decode hex text, ignoring whitespace.
///
/// Error positions count hex digits after whitespace removal.
pub fn decode_hex_payload(text: &[u8]) -> Result<Vec<u8>, InputError> {
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => InputError::InvalidHex {
            position: index,
            reason: format!("Invalid character {c:?}"),
        },
        other => InputError::InvalidHex {
            position: digits.len(),
            reason: other.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_payload_passes_through() {
        let bytes = decode_payload(vec![0, 255, 7], PayloadEncoding::Raw).unwrap();
        assert_eq!(bytes, vec![0, 255, 7]);
    }

    #[test]
    fn hex_payload_ignores_whitespace() {
        let bytes = decode_hex_payload(b"00 ff\n41\t42\r\n").unwrap();
        assert_eq!(bytes, vec![0x00, 0xFF, 0x41, 0x42]);
    }

    #[test]
    fn hex_payload_reports_bad_digit_position() {
        let err = decode_hex_payload(b"00 1z").unwrap_err();
        match err {
            InputError::InvalidHex { position, .. } => assert_eq!(position, 3),
            other => panic!("expected InvalidHex, got {other:?}"),
        }
    }

    #[test]
    fn hex_payload_rejects_odd_length() {
        let err = decode_hex_payload(b"abc").unwrap_err();
        assert!(matches!(err, InputError::InvalidHex { position: 3, .. }));
    }

    #[test]
    fn read_all_drains_reader() {
        let bytes = read_all(std::io::Cursor::new(vec![1u8, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("hexgrid-definitely-missing.bin");
        let err = load_buffer(&InputSource::File(path.clone()), PayloadEncoding::Raw).unwrap_err();
        match err {
            InputError::FileNotFound { path: reported } => assert_eq!(reported, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn file_payload_loads() {
        let path = std::env::temp_dir().join(format!("hexgrid-source-{}.hex", std::process::id()));
        std::fs::write(&path, "de ad be ef").unwrap();
        let buffer = load_buffer(&InputSource::File(path.clone()), PayloadEncoding::Hex).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(buffer.as_slice(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn explicit_file_wins_over_stdin() {
        let source = detect_input_source(Some(PathBuf::from("x.bin"))).unwrap();
        assert_eq!(source, InputSource::File(PathBuf::from("x.bin")));
    }
}
