//! Error types for hexgrid.
//!
//! The viewer engine itself has no error returns: invalid queries, corrupt
//! persisted state and out-of-range indices all degrade to an empty or default
//! state. The types here cover the shell around it, where failures are real:
//! reading the input payload, talking to persistent storage and the terminal.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Startup failures before the terminal is taken over
//!   - [`InputError`] - Reading or decoding the byte payload
//! - [`StorageError`] - Reading or writing persisted history/settings
//!
//! Terminal failures are `crate::view::TuiError`.
//!
//! # Recovery Strategy
//!
//! Input errors are fatal: there is nothing to view. Storage errors are never
//! fatal; the session logs them and continues with defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Domain-specific errors convert via `From`, so `?` composes across layers.
///
/// # Examples
///
/// ```no_run
/// use hexgrid::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     let _bytes = read_payload()?;
///     Ok(())
/// }
/// # fn read_payload() -> Result<Vec<u8>, InputError> { Ok(Vec::new()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read or decode the payload.
    ///
    /// **Recovery**: Display error and exit; the viewer has nothing to show.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),
}

/// Errors encountered when loading the byte payload from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use hexgrid::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.bin")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.bin"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Hex-encoded input contained something other than hex digit pairs.
    ///
    /// `position` counts hex digits after whitespace removal, so it points at
    /// the offending digit in the compacted text.
    #[error("Invalid hex input at digit {position}: {reason}")]
    InvalidHex {
        /// Position of the first bad digit.
        position: usize,
        /// Decoder message.
        reason: String,
    },

    /// No file argument was given and stdin is a terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexgrid::model::error::InputError;
    ///
    /// let msg = InputError::NoInput.to_string();
    /// assert!(msg.contains("file path or pipe data to stdin"));
    /// ```
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by persistent storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure reading or writing a key.
    #[error("Storage IO error for key '{key}': {source}")]
    Io {
        /// Storage key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        /// Storage key being written.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/missing.bin"),
        };
        let msg = err.to_string();
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/missing.bin"));
    }

    #[test]
    fn input_error_invalid_hex_display() {
        let err = InputError::InvalidHex {
            position: 7,
            reason: "Invalid character 'z'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("digit 7"));
        assert!(msg.contains("'z'"));
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn storage_error_io_names_key() {
        let err = StorageError::Io {
            key: "hexgrid.history".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("hexgrid.history"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn app_error_from_input_error() {
        let app_err: AppError = InputError::NoInput.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("No input source"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
        assert!(msg.contains("gone"));
    }
}
