//! Byte-range provenance for decoded and encoded values.
//!
//! Every [`Decoder`](crate::Decoder) and [`Encoder`](crate::Encoder) owns a
//! [`PositionTable`]. Each value it processes, nested values and dictionary
//! keys included, is given a [`NodeId`] and a `[start, end)` [`Range`] in the
//! byte coordinates of that instance. Identity comes from the handle, not from
//! the value's content: two equal values read by the same decoder get two
//! distinct entries.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt;

use crate::value::Kind;

/// Handle to one entry of a [`PositionTable`].
///
/// Ids are assigned in processing order and are only meaningful for the table
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A half-open `[start, end)` span of byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered; zero for an inverted range.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `offset` falls inside `[start, end)`.
    pub fn contains(&self, offset: u64) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Children {
    Leaf,
    List(Vec<NodeId>),
    Dict(BTreeMap<Bytes, Slot>),
}

/// Key and value handles of one dictionary entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub(crate) key: NodeId,
    pub(crate) value: NodeId,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: Kind,
    range: Range,
    children: Children,
}

/// Record of where each processed value lives in the byte stream.
///
/// The table is read-only from the outside; only the owning decoder or
/// encoder inserts into it. Entries survive closing the owner.
///
/// # Examples
///
/// ```
/// use bencode_io::{Decoder, Range, SliceSource};
///
/// let mut decoder = Decoder::new(SliceSource::new(&b"d3:cow3:mooe"[..]));
/// let doc = decoder.read().unwrap().unwrap();
/// let table = decoder.positions();
///
/// assert_eq!(table.range(doc.id), Some(Range::new(0, 12)));
/// let moo = table.value_of(doc.id, b"cow").unwrap();
/// assert_eq!(table.range(moo), Some(Range::new(6, 11)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    entries: Vec<Entry>,
}

impl PositionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, kind: Kind, range: Range, children: Children) -> NodeId {
        let id = NodeId(self.entries.len());
        self.entries.push(Entry {
            kind,
            range,
            children,
        });
        id
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Byte range of `id`, or `None` if this table never issued it.
    pub fn range(&self, id: NodeId) -> Option<Range> {
        self.entries.get(id.0).map(|e| e.range)
    }

    pub fn kind(&self, id: NodeId) -> Option<Kind> {
        self.entries.get(id.0).map(|e| e.kind)
    }

    /// Handle of the `index`-th element of the list `id`.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.entries.get(id.0)?.children {
            Children::List(items) => items.get(index).copied(),
            _ => None,
        }
    }

    /// Handle of the value stored under `key` in the dictionary `id`.
    pub fn value_of(&self, id: NodeId, key: &[u8]) -> Option<NodeId> {
        self.slot(id, key).map(|s| s.value)
    }

    /// Handle of the key string `key` in the dictionary `id`.
    pub fn key_of(&self, id: NodeId, key: &[u8]) -> Option<NodeId> {
        self.slot(id, key).map(|s| s.key)
    }

    /// All entries in processing order: children before their parents,
    /// top-level values in the order they were read or written.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Kind, Range)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i), e.kind, e.range))
    }

    fn slot(&self, id: NodeId, key: &[u8]) -> Option<&Slot> {
        match &self.entries.get(id.0)?.children {
            Children::Dict(slots) => slots.get(key),
            _ => None,
        }
    }
}
