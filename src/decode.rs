use bytes::Bytes;
use std::collections::BTreeMap;
use std::io;
use tracing::{debug, trace};

use super::error::{BencodeError, Expected, StateError};
use super::io::{ByteSource, SliceSource};
use super::position::{Children, NodeId, PositionTable, Range, Slot};
use super::value::{Dict, Kind, List, Value};

/// Default limit on nested lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Policy for a key that appears twice in one dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// The later occurrence overwrites the earlier one.
    #[default]
    LastWins,
    /// The later occurrence is a format error.
    Reject,
}

/// Decoder limits and strictness settings.
///
/// # Examples
///
/// ```
/// use bencode_io::{DecodeOptions, Decoder, DuplicateKeys, SliceSource};
///
/// let options = DecodeOptions::default()
///     .with_max_depth(8)
///     .with_duplicate_keys(DuplicateKeys::Reject);
/// let mut decoder = Decoder::with_options(SliceSource::new(&b"d1:ai1e1:ai2ee"[..]), options);
/// assert!(decoder.read().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Values nested deeper than this are rejected.
    pub max_depth: usize,
    /// Longest byte string accepted.
    pub max_string_len: usize,
    /// Reject integers with leading zeros and `-0`.
    pub canonical_integers: bool,
    /// What to do when a dictionary repeats a key.
    pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_len: usize::MAX,
            canonical_integers: true,
            duplicate_keys: DuplicateKeys::LastWins,
        }
    }
}

impl DecodeOptions {
    /// Sets the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the longest byte string accepted.
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    /// Sets whether non-canonical integers such as `i03e` are rejected.
    pub fn with_canonical_integers(mut self, canonical: bool) -> Self {
        self.canonical_integers = canonical;
        self
    }

    /// Sets the policy for repeated dictionary keys.
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

/// A top-level value together with its handle in the decoder's
/// [`PositionTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub value: Value,
    pub id: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Exhausted,
    Failed,
    Closed,
}

/// Streaming bencode decoder.
///
/// Each call to [`Decoder::read`] yields the next top-level value, or
/// `Ok(None)` once the source is exhausted at a value boundary. Asking again
/// after that is a [`StateError::EndOfInput`]. A decoder that returned an error
/// stays failed.
///
/// All operations take `&mut self`; a decoder shared between threads needs
/// external synchronization.
///
/// # Examples
///
/// ```
/// use bencode_io::{Decoder, Range, SliceSource, Value};
///
/// let mut decoder = Decoder::new(SliceSource::new(&b"i1e4:spam"[..]));
///
/// let first = decoder.read().unwrap().unwrap();
/// assert_eq!(first.value, Value::Integer(1));
///
/// let second = decoder.read().unwrap().unwrap();
/// assert_eq!(second.value.as_str(), Some("spam"));
/// assert_eq!(decoder.positions().range(second.id), Some(Range::new(3, 9)));
///
/// assert!(decoder.read().unwrap().is_none());
/// assert!(decoder.read().is_err());
/// ```
#[derive(Debug)]
pub struct Decoder<S> {
    source: Option<S>,
    positions: PositionTable,
    options: DecodeOptions,
    state: State,
    closed_at: u64,
}

impl<S: ByteSource> Decoder<S> {
    /// Creates a decoder over `source` with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    /// Creates a decoder over `source` with the given options.
    pub fn with_options(source: S, options: DecodeOptions) -> Self {
        Self {
            source: Some(source),
            positions: PositionTable::new(),
            options,
            state: State::Ready,
            closed_at: 0,
        }
    }

    /// Decodes the next top-level value.
    ///
    /// Lists and dictionaries are decoded recursively. Returns `Ok(None)` when
    /// the source holds no further bytes.
    pub fn read(&mut self) -> Result<Option<Decoded>, BencodeError> {
        match self.state {
            State::Ready => {}
            State::Exhausted => return Err(StateError::EndOfInput.into()),
            State::Failed => return Err(StateError::Failed.into()),
            State::Closed => return Err(StateError::Closed.into()),
        }
        let Some(source) = self.source.as_mut() else {
            return Err(StateError::Closed.into());
        };

        let mut parser = Parser {
            source,
            positions: &mut self.positions,
            options: &self.options,
        };

        match parser.top_level() {
            Ok(Some((value, id))) => {
                if let Some(range) = self.positions.range(id) {
                    trace!(
                        start = range.start,
                        end = range.end,
                        kind = %value.kind(),
                        "decoded value"
                    );
                }
                Ok(Some(Decoded { value, id }))
            }
            Ok(None) => {
                self.state = State::Exhausted;
                debug!(position = self.position(), "end of input");
                Ok(None)
            }
            Err(e) => {
                self.state = State::Failed;
                debug!(error = %e, "decode failed");
                Err(e)
            }
        }
    }

    /// Decodes every remaining top-level value.
    pub fn read_all(&mut self) -> Result<Vec<Decoded>, BencodeError> {
        let mut out = Vec::new();
        while let Some(decoded) = self.read()? {
            out.push(decoded);
        }
        Ok(out)
    }

    /// Number of bytes consumed from the source.
    pub fn position(&self) -> u64 {
        self.source
            .as_ref()
            .map_or(self.closed_at, |s| s.position())
    }

    /// Byte ranges of every value decoded so far.
    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Releases the source. Further reads fail with [`StateError::Closed`];
    /// recorded positions stay available.
    pub fn close(&mut self) {
        if let Some(source) = self.source.take() {
            self.closed_at = source.position();
            debug!(position = self.closed_at, "decoder closed");
        }
        self.state = State::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Returns the source, or `None` once closed.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn into_positions(self) -> PositionTable {
        self.positions
    }
}

struct Parser<'a, S> {
    source: &'a mut S,
    positions: &'a mut PositionTable,
    options: &'a DecodeOptions,
}

impl<S: ByteSource> Parser<'_, S> {
    fn top_level(&mut self) -> Result<Option<(Value, NodeId)>, BencodeError> {
        let start = self.position();
        match self.next_byte(start)? {
            None => Ok(None),
            Some(b'e') => Err(BencodeError::Format {
                position: start,
                start,
                expected: Expected::Value,
                found: b'e',
            }),
            Some(first) => self.value(first, start, 0).map(Some),
        }
    }

    fn position(&self) -> u64 {
        self.source.position()
    }

    fn next_byte(&mut self, start: u64) -> Result<Option<u8>, BencodeError> {
        let position = self.position();
        self.source
            .next_byte()
            .map_err(|e| BencodeError::transport(position, start, e))
    }

    /// Reads a byte that must exist because the value begun at `start` is
    /// still open. Returns the byte with its offset.
    fn expect_byte(&mut self, start: u64, expected: Expected) -> Result<(u64, u8), BencodeError> {
        let position = self.position();
        match self.next_byte(start)? {
            Some(b) => Ok((position, b)),
            None => Err(BencodeError::Truncated {
                position,
                start,
                expected,
            }),
        }
    }

    fn value(
        &mut self,
        first: u8,
        start: u64,
        depth: usize,
    ) -> Result<(Value, NodeId), BencodeError> {
        if depth > self.options.max_depth {
            return Err(BencodeError::NestingTooDeep {
                position: start,
                limit: self.options.max_depth,
            });
        }

        match first {
            b'i' => {
                let i = self.integer(start)?;
                Ok(self.finish(Value::Integer(i), start, Children::Leaf))
            }
            b'0'..=b'9' => {
                let b = self.string(first, start)?;
                Ok(self.finish(Value::Bytes(b), start, Children::Leaf))
            }
            b'l' => self.list(start, depth),
            b'd' => self.dict(start, depth),
            other => Err(BencodeError::Format {
                position: start,
                start,
                expected: Expected::Value,
                found: other,
            }),
        }
    }

    fn finish(&mut self, value: Value, start: u64, children: Children) -> (Value, NodeId) {
        let range = Range::new(start, self.position());
        let id = self.positions.record(value.kind(), range, children);
        (value, id)
    }

    fn integer(&mut self, start: u64) -> Result<i64, BencodeError> {
        let (mut at, mut b) = self.expect_byte(start, Expected::DigitOrMinus)?;
        let negative = b == b'-';
        if negative {
            (at, b) = self.expect_byte(start, Expected::Digit)?;
        }
        if !b.is_ascii_digit() {
            return Err(BencodeError::Format {
                position: at,
                start,
                expected: if negative {
                    Expected::Digit
                } else {
                    Expected::DigitOrMinus
                },
                found: b,
            });
        }

        let leading_zero = b == b'0';
        let first_at = at;
        let mut value: i64 = 0;
        loop {
            let digit = i64::from(b - b'0');
            // Accumulate on the negative side so i64::MIN stays representable.
            value = value
                .checked_mul(10)
                .and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                })
                .ok_or(BencodeError::IntegerOverflow { position: at, start })?;

            (at, b) = self.expect_byte(start, Expected::DigitOrEnd)?;
            if b == b'e' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(BencodeError::Format {
                    position: at,
                    start,
                    expected: Expected::DigitOrEnd,
                    found: b,
                });
            }
            if leading_zero && self.options.canonical_integers {
                return Err(BencodeError::NonCanonicalInteger {
                    position: first_at,
                    start,
                });
            }
        }

        if negative && value == 0 && self.options.canonical_integers {
            return Err(BencodeError::NonCanonicalInteger {
                position: first_at,
                start,
            });
        }
        Ok(value)
    }

    fn string(&mut self, first: u8, start: u64) -> Result<Bytes, BencodeError> {
        let mut len = u64::from(first - b'0');
        loop {
            let (at, b) = self.expect_byte(start, Expected::DigitOrColon)?;
            if b == b':' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(BencodeError::Format {
                    position: at,
                    start,
                    expected: Expected::DigitOrColon,
                    found: b,
                });
            }
            len = len.saturating_mul(10).saturating_add(u64::from(b - b'0'));
        }

        let max = self.options.max_string_len as u64;
        if len > max {
            return Err(BencodeError::LengthExceedsLimit {
                position: start,
                start,
                len,
                max,
            });
        }

        let payload_at = self.position();
        self.source.read_exact(len as usize).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                BencodeError::Truncated {
                    position: self.source.position(),
                    start,
                    expected: Expected::StringBytes,
                }
            } else {
                BencodeError::transport(payload_at, start, e)
            }
        })
    }

    /// Parses the next element of the container begun at `start`, or returns
    /// `None` on its terminating `e`.
    fn child(&mut self, start: u64, depth: usize) -> Result<Option<(Value, NodeId)>, BencodeError> {
        let (at, b) = self.expect_byte(start, Expected::ValueOrEnd)?;
        if b == b'e' {
            return Ok(None);
        }
        if !starts_value(b) {
            return Err(BencodeError::Format {
                position: at,
                start,
                expected: Expected::ValueOrEnd,
                found: b,
            });
        }
        self.value(b, at, depth).map(Some)
    }

    fn list(&mut self, start: u64, depth: usize) -> Result<(Value, NodeId), BencodeError> {
        let mut list = List::new();
        let mut ids = Vec::new();
        while let Some((value, id)) = self.child(start, depth + 1)? {
            list.push(value);
            ids.push(id);
        }
        Ok(self.finish(Value::List(list), start, Children::List(ids)))
    }

    fn dict(&mut self, start: u64, depth: usize) -> Result<(Value, NodeId), BencodeError> {
        let mut dict = Dict::new();
        let mut slots = BTreeMap::new();
        loop {
            let (key_at, b) = self.expect_byte(start, Expected::Key)?;
            if b == b'e' {
                break;
            }
            if !b.is_ascii_digit() {
                return Err(BencodeError::Format {
                    position: key_at,
                    start,
                    expected: Expected::Key,
                    found: b,
                });
            }
            let key = self.string(b, key_at)?;
            let key_range = Range::new(key_at, self.position());
            let key_id = self.positions.record(Kind::Bytes, key_range, Children::Leaf);

            let (value_at, b) = self.expect_byte(start, Expected::DictValue)?;
            if !starts_value(b) {
                return Err(BencodeError::Format {
                    position: value_at,
                    start,
                    expected: Expected::DictValue,
                    found: b,
                });
            }
            let (value, value_id) = self.value(b, value_at, depth + 1)?;

            if self.options.duplicate_keys == DuplicateKeys::Reject && dict.contains(&key) {
                return Err(BencodeError::DuplicateKey {
                    position: key_at,
                    start,
                });
            }
            slots.insert(
                key.clone(),
                Slot {
                    key: key_id,
                    value: value_id,
                },
            );
            dict.insert(key, value);
        }
        Ok(self.finish(Value::Dict(dict), start, Children::Dict(slots)))
    }
}

fn starts_value(b: u8) -> bool {
    matches!(b, b'i' | b'l' | b'd' | b'0'..=b'9')
}

/// Decodes a buffer holding exactly one bencode value.
///
/// # Errors
///
/// Empty input is [`BencodeError::Truncated`]; bytes after the value are
/// [`BencodeError::TrailingData`].
///
/// # Examples
///
/// ```
/// use bencode_io::{decode, Value};
///
/// assert_eq!(decode(b"i56789e").unwrap(), Value::Integer(56789));
/// assert!(decode(b"i42eextra").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut decoder = Decoder::new(SliceSource::copy_from(data));
    let Some(decoded) = decoder.read()? else {
        return Err(BencodeError::Truncated {
            position: 0,
            start: 0,
            expected: Expected::Value,
        });
    };

    let position = decoder.position();
    if position != data.len() as u64 {
        return Err(BencodeError::TrailingData { position });
    }
    Ok(decoded.value)
}

/// Decodes every value in a buffer holding zero or more concatenated values.
pub fn decode_all(data: &[u8]) -> Result<Vec<Value>, BencodeError> {
    let mut decoder = Decoder::new(SliceSource::copy_from(data));
    let decoded = decoder.read_all()?;
    Ok(decoded.into_iter().map(|d| d.value).collect())
}
