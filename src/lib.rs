//! Bencode decoding and encoding with byte-range provenance.
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use bencode_io::{decode, Value};
//!
//! let value = decode(b"i42e").unwrap();
//! assert_eq!(value.as_integer(), Ok(42));
//!
//! let value = decode(b"l4:spami42ee").unwrap();
//! assert_eq!(value.count(), Ok(2));
//!
//! let value = decode(b"d3:foo3:bare").unwrap();
//! let foo = value.get(b"foo").unwrap().unwrap();
//! assert_eq!(foo.as_str(), Some("bar"));
//! ```
//!
//! ## Encoding bencode data
//!
//! Dictionaries always come out with their keys in ascending byte order,
//! however they were built:
//!
//! ```
//! use bencode_io::{encode, Dict, List, Value};
//!
//! let doc: Value = Dict::new()
//!     .with("title", "Hello World!")
//!     .with("number", 56789)
//!     .with("entries", List::new().with("Entry 1").with(1234))
//!     .into();
//!
//! assert_eq!(
//!     encode(&doc).unwrap(),
//!     b"d7:entriesl7:Entry 1i1234ee6:numberi56789e5:title12:Hello World!e"
//! );
//! ```
//!
//! ## Tracking where values live
//!
//! [`Decoder`] and [`Encoder`] record the `[start, end)` byte range of every
//! value they process in a [`PositionTable`]:
//!
//! ```
//! use bencode_io::{Decoder, Range, SliceSource};
//!
//! let mut decoder = Decoder::new(SliceSource::new(&b"l4:spam4:eggse"[..]));
//! let list = decoder.read().unwrap().unwrap();
//!
//! let positions = decoder.positions();
//! let eggs = positions.child(list.id, 1).unwrap();
//! assert_eq!(positions.range(eggs), Some(Range::new(7, 13)));
//! ```
//!
//! # Error Handling
//!
//! Every [`BencodeError`] falls into one [`ErrorKind`]:
//!
//! - [`ErrorKind::Format`] - The input violates the grammar
//! - [`ErrorKind::TruncatedInput`] - Input ended inside a value
//! - [`ErrorKind::State`] - Closed instance, wrong variant, or reading past the end
//! - [`ErrorKind::Transport`] - The byte source or sink failed
//!
//! Grammar and truncation errors carry the offset of the offending byte and
//! the offset where the enclosing value started.
//!
//! # Nesting
//!
//! Lists and dictionaries are decoded recursively. The depth is bounded by
//! [`DecodeOptions::max_depth`] (default [`DEFAULT_MAX_DEPTH`]) so hostile
//! input cannot exhaust the stack.

mod decode;
mod encode;
mod error;
pub mod io;
mod position;
mod print;
mod value;
mod visit;

pub use decode::{
    decode, decode_all, DecodeOptions, Decoded, Decoder, DuplicateKeys, DEFAULT_MAX_DEPTH,
};
pub use encode::{encode, encode_all, encode_to, Encoder};
pub use error::{BencodeError, ErrorKind, Expected, StateError};
pub use io::{BufferSink, ByteSink, ByteSource, MemorySink, ReaderSource, SliceSource, WriterSink};
pub use position::{NodeId, PositionTable, Range};
pub use print::Printer;
pub use value::{Dict, Kind, List, Value};
pub use visit::Visitor;

#[cfg(test)]
mod tests;
