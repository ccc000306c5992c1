use std::fmt;
use std::io;

use thiserror::Error;

use crate::value::Kind;

/// Broad classification of a [`BencodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input violates the bencode grammar.
    Format,
    /// The input ended strictly inside a value.
    TruncatedInput,
    /// The operation is not valid in the current state.
    State,
    /// The underlying byte source or sink failed.
    Transport,
}

/// What the decoder was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    /// The first byte of a value (`i`, `l`, `d` or a digit).
    Value,
    /// The first byte of a value or the `e` closing a list or dictionary.
    ValueOrEnd,
    /// A decimal digit.
    Digit,
    /// A decimal digit or a leading `-`.
    DigitOrMinus,
    /// A decimal digit or the `e` ending an integer.
    DigitOrEnd,
    /// A decimal digit or the `:` ending a string length.
    DigitOrColon,
    /// The remaining payload bytes of a byte string.
    StringBytes,
    /// A byte string used as a dictionary key.
    Key,
    /// The value belonging to a dictionary key.
    DictValue,
    /// Nothing: the input should have ended.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Expected::Value => "start of value",
            Expected::ValueOrEnd => "start of value or 'e'",
            Expected::Digit => "digit",
            Expected::DigitOrMinus => "digit or '-'",
            Expected::DigitOrEnd => "digit or 'e'",
            Expected::DigitOrColon => "digit or ':'",
            Expected::StringBytes => "string bytes",
            Expected::Key => "byte string key",
            Expected::DictValue => "dictionary value",
            Expected::EndOfInput => "end of input",
        };
        f.write_str(s)
    }
}

/// Errors raised while decoding or encoding bencode.
///
/// Offsets are absolute byte positions in the coordinate space of the
/// decoder's source or the encoder's sink. `position` is where the
/// offending byte or condition was met, `start` is where the innermost
/// enclosing value began.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("expected {expected} at byte {position}, found {} (value starting at byte {start})", byte_repr(.found))]
    Format {
        position: u64,
        start: u64,
        expected: Expected,
        found: u8,
    },

    #[error("integer out of range at byte {position} (value starting at byte {start})")]
    IntegerOverflow { position: u64, start: u64 },

    #[error("non-canonical integer at byte {position} (value starting at byte {start})")]
    NonCanonicalInteger { position: u64, start: u64 },

    #[error("string length {len} exceeds maximum {max} at byte {position} (value starting at byte {start})")]
    LengthExceedsLimit {
        position: u64,
        start: u64,
        len: u64,
        max: u64,
    },

    #[error("duplicate dictionary key at byte {position} (dictionary starting at byte {start})")]
    DuplicateKey { position: u64, start: u64 },

    #[error("nesting deeper than {limit} levels at byte {position}")]
    NestingTooDeep { position: u64, limit: usize },

    #[error("trailing data at byte {position}")]
    TrailingData { position: u64 },

    #[error("unexpected end of input at byte {position}, expected {expected} (value starting at byte {start})")]
    Truncated {
        position: u64,
        start: u64,
        expected: Expected,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("io error at byte {position} (value starting at byte {start}): {source}")]
    Transport {
        position: u64,
        start: u64,
        #[source]
        source: io::Error,
    },
}

impl BencodeError {
    /// Returns the broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BencodeError::Format { .. }
            | BencodeError::IntegerOverflow { .. }
            | BencodeError::NonCanonicalInteger { .. }
            | BencodeError::LengthExceedsLimit { .. }
            | BencodeError::DuplicateKey { .. }
            | BencodeError::NestingTooDeep { .. }
            | BencodeError::TrailingData { .. } => ErrorKind::Format,
            BencodeError::Truncated { .. } => ErrorKind::TruncatedInput,
            BencodeError::State(_) => ErrorKind::State,
            BencodeError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Byte offset at which the failure was detected.
    pub fn position(&self) -> Option<u64> {
        match self {
            BencodeError::Format { position, .. }
            | BencodeError::IntegerOverflow { position, .. }
            | BencodeError::NonCanonicalInteger { position, .. }
            | BencodeError::LengthExceedsLimit { position, .. }
            | BencodeError::DuplicateKey { position, .. }
            | BencodeError::NestingTooDeep { position, .. }
            | BencodeError::TrailingData { position }
            | BencodeError::Truncated { position, .. }
            | BencodeError::Transport { position, .. } => Some(*position),
            BencodeError::State(_) => None,
        }
    }

    /// Byte offset at which the enclosing value started.
    pub fn start(&self) -> Option<u64> {
        match self {
            BencodeError::Format { start, .. }
            | BencodeError::IntegerOverflow { start, .. }
            | BencodeError::NonCanonicalInteger { start, .. }
            | BencodeError::LengthExceedsLimit { start, .. }
            | BencodeError::DuplicateKey { start, .. }
            | BencodeError::Truncated { start, .. }
            | BencodeError::Transport { start, .. } => Some(*start),
            BencodeError::NestingTooDeep { position, .. } => Some(*position),
            BencodeError::TrailingData { .. } | BencodeError::State(_) => None,
        }
    }

    pub(crate) fn transport(position: u64, start: u64, source: io::Error) -> Self {
        BencodeError::Transport {
            position,
            start,
            source,
        }
    }
}

/// An operation was attempted that the target does not support in its
/// current state or shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("instance is closed")]
    Closed,

    #[error("end of input was already reported")]
    EndOfInput,

    #[error("instance failed earlier and cannot be reused")]
    Failed,

    #[error("expected {expected}, found {found}")]
    WrongVariant { expected: Kind, found: Kind },

    #[error("expected list or dictionary, found {found}")]
    NotContainer { found: Kind },

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

fn byte_repr(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", *byte as char)
    } else {
        format!("0x{:02X}", byte)
    }
}
