//! Domain model types (pure).
//!
//! All types in this module are pure data with no I/O.

pub mod byte_buffer;
pub mod codec;
pub mod error;
pub mod key_action;

// Re-export for convenience
pub use byte_buffer::{classify, is_printable, ByteBuffer, ByteClass};
pub use codec::{GlyphSet, HigherEncoding, LowerEncoding};
pub use error::{AppError, InputError, StorageError};
pub use key_action::KeyAction;
