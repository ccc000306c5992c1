use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

use super::error::{BencodeError, StateError};
use super::io::{ByteSink, MemorySink, WriterSink};
use super::position::{Children, NodeId, PositionTable, Range, Slot};
use super::value::{Kind, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Failed,
    Closed,
}

/// Streaming bencode encoder.
///
/// Values are written depth-first in canonical form: dictionary entries
/// always come out in ascending key order. Every value written, nested
/// values and dictionary keys included, is recorded in the encoder's
/// [`PositionTable`].
///
/// A sink failure aborts the write and leaves the encoder failed; it must not
/// be reused. All operations take `&mut self`; share between threads only
/// behind external synchronization, and do not mutate a value while it is
/// being written.
///
/// # Examples
///
/// ```
/// use bencode_io::{Dict, Encoder, MemorySink, Range, Value};
///
/// let doc: Value = Dict::new().with("spam", "eggs").with("cow", "moo").into();
///
/// let mut encoder = Encoder::new(MemorySink::new());
/// let id = encoder.write(&doc).unwrap();
/// assert_eq!(encoder.positions().range(id), Some(Range::new(0, 24)));
///
/// let sink = encoder.into_inner().unwrap();
/// assert_eq!(sink.as_slice(), b"d3:cow3:moo4:spam4:eggse");
/// ```
#[derive(Debug)]
pub struct Encoder<K: ByteSink> {
    sink: Option<K>,
    positions: PositionTable,
    state: State,
    closed_at: u64,
}

impl<K: ByteSink> Encoder<K> {
    /// Creates an encoder writing to `sink`.
    pub fn new(sink: K) -> Self {
        Self {
            sink: Some(sink),
            positions: PositionTable::new(),
            state: State::Ready,
            closed_at: 0,
        }
    }

    /// Writes one top-level value and returns its handle in
    /// [`Encoder::positions`].
    pub fn write(&mut self, value: &Value) -> Result<NodeId, BencodeError> {
        match self.state {
            State::Ready => {}
            State::Failed => return Err(StateError::Failed.into()),
            State::Closed => return Err(StateError::Closed.into()),
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(StateError::Closed.into());
        };

        let mut serializer = Serializer {
            sink,
            positions: &mut self.positions,
        };
        match serializer.value(value) {
            Ok(id) => {
                if let Some(range) = self.positions.range(id) {
                    trace!(
                        start = range.start,
                        end = range.end,
                        kind = %value.kind(),
                        "encoded value"
                    );
                }
                Ok(id)
            }
            Err(e) => {
                self.state = State::Failed;
                debug!(error = %e, "encode failed");
                Err(e)
            }
        }
    }

    /// Number of bytes written to the sink.
    pub fn position(&self) -> u64 {
        self.sink.as_ref().map_or(self.closed_at, |s| s.position())
    }

    /// Byte ranges of every value written so far.
    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    /// Flushes the sink. A failed flush leaves the encoder failed.
    pub fn flush(&mut self) -> Result<(), BencodeError> {
        let Some(sink) = self.sink.as_mut() else {
            return Err(StateError::Closed.into());
        };
        let position = sink.position();
        sink.flush().map_err(|e| {
            self.state = State::Failed;
            BencodeError::transport(position, position, e)
        })
    }

    /// Flushes and releases the sink. Further writes fail with
    /// [`StateError::Closed`]; recorded positions stay available.
    ///
    /// The sink is released even when the final flush fails.
    pub fn close(&mut self) -> Result<(), BencodeError> {
        let Some(mut sink) = self.sink.take() else {
            self.state = State::Closed;
            return Ok(());
        };
        self.state = State::Closed;
        self.closed_at = sink.position();
        debug!(position = self.closed_at, "encoder closed");
        let position = self.closed_at;
        sink.flush().map_err(|e| BencodeError::transport(position, position, e))
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    pub fn sink(&self) -> Option<&K> {
        self.sink.as_ref()
    }

    /// Returns the sink, or `None` if the encoder was closed.
    pub fn into_inner(mut self) -> Option<K> {
        self.sink.take()
    }

    pub fn into_positions(mut self) -> PositionTable {
        std::mem::take(&mut self.positions)
    }
}

struct Serializer<'a, K> {
    sink: &'a mut K,
    positions: &'a mut PositionTable,
}

impl<K: ByteSink> Serializer<'_, K> {
    fn value(&mut self, value: &Value) -> Result<NodeId, BencodeError> {
        let start = self.sink.position();
        let children = match value {
            Value::Integer(i) => {
                self.write(start, format!("i{}e", i).as_bytes())?;
                Children::Leaf
            }
            Value::Bytes(b) => {
                self.string(start, b)?;
                Children::Leaf
            }
            Value::List(l) => {
                self.write(start, b"l")?;
                let mut ids = Vec::with_capacity(l.len());
                for item in l {
                    ids.push(self.value(item)?);
                }
                self.write(start, b"e")?;
                Children::List(ids)
            }
            Value::Dict(d) => {
                self.write(start, b"d")?;
                let mut slots = BTreeMap::new();
                for (key, val) in d {
                    let key_start = self.sink.position();
                    self.string(key_start, key)?;
                    let key_range = Range::new(key_start, self.sink.position());
                    let key_id = self.positions.record(Kind::Bytes, key_range, Children::Leaf);
                    let value_id = self.value(val)?;
                    slots.insert(
                        key.clone(),
                        Slot {
                            key: key_id,
                            value: value_id,
                        },
                    );
                }
                self.write(start, b"e")?;
                Children::Dict(slots)
            }
        };
        let range = Range::new(start, self.sink.position());
        Ok(self.positions.record(value.kind(), range, children))
    }

    fn string(&mut self, start: u64, data: &[u8]) -> Result<(), BencodeError> {
        self.write(start, format!("{}:", data.len()).as_bytes())?;
        self.write(start, data)
    }

    /// Writes `data` as part of the value begun at `start`.
    fn write(&mut self, start: u64, data: &[u8]) -> Result<(), BencodeError> {
        let position = self.sink.position();
        self.sink
            .write_all(data)
            .map_err(|e| BencodeError::transport(position, start, e))
    }
}

impl<K: ByteSink> Drop for Encoder<K> {
    fn drop(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.flush() {
                debug!(error = %e, "flush on drop failed");
            }
        }
    }
}

/// Encodes a bencode value to a byte vector.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted lexicographically)
///
/// # Examples
///
/// ```
/// use bencode_io::{encode, Dict, List, Value};
///
/// assert_eq!(encode(&Value::Integer(42)).unwrap(), b"i42e");
/// assert_eq!(encode(&Value::string("hello")).unwrap(), b"5:hello");
///
/// let list: Value = List::new().with(1).with("two").into();
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
///
/// let dict: Value = Dict::new().with("b", 2).with("a", 1).into();
/// assert_eq!(encode(&dict).unwrap(), b"d1:ai1e1:bi2ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    encode_all(std::slice::from_ref(value))
}

/// Encodes several values back to back into one buffer.
pub fn encode_all(values: &[Value]) -> Result<Vec<u8>, BencodeError> {
    let mut encoder = Encoder::new(MemorySink::new());
    for value in values {
        encoder.write(value)?;
    }
    Ok(encoder
        .into_inner()
        .map(|sink| sink.into_bytes().to_vec())
        .unwrap_or_default())
}

/// Encodes `value` straight into `writer`, returning the number of bytes written.
pub fn encode_to<W: Write>(value: &Value, writer: W) -> Result<u64, BencodeError> {
    let mut encoder = Encoder::new(WriterSink::new(writer));
    encoder.write(value)?;
    let written = encoder.position();
    encoder.close()?;
    Ok(written)
}
