use bytes::Bytes;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::StateError;

/// The four shapes a bencode value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Bytes,
    List,
    Dict,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Integer => "integer",
            Kind::Bytes => "byte string",
            Kind::List => "list",
            Kind::Dict => "dictionary",
        })
    }
}

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// The `is_*` predicates are the discriminators; the typed accessors fail with
/// [`StateError::WrongVariant`] when called on the wrong kind.
///
/// # Examples
///
/// ```
/// use bencode_io::{Dict, List, Value};
///
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list: Value = List::new().with(1).with("two").into();
///
/// assert_eq!(int.as_integer(), Ok(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.count(), Ok(2));
/// assert!(string.as_integer().is_err());
///
/// let doc: Value = Dict::new().with("spam", "eggs").into();
/// assert!(doc.contains(b"spam").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(List),
    /// A dictionary with byte string keys, enumerated in ascending key order.
    Dict(Dict),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Returns which of the four shapes this value has.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    /// Returns `true` if this is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if this is a byte string.
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Returns `true` if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` if this is a dictionary.
    pub fn is_dict(&self) -> bool {
        matches!(self, Value::Dict(_))
    }

    /// Returns the integer, or `WrongVariant` if this is not an integer.
    pub fn as_integer(&self) -> Result<i64, StateError> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.wrong_variant(Kind::Integer)),
        }
    }

    /// Returns the raw bytes of a byte string.
    pub fn as_bytes(&self) -> Result<&Bytes, StateError> {
        match self {
            Value::Bytes(b) => Ok(b),
            _ => Err(self.wrong_variant(Kind::Bytes)),
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencode_io::Value;
    ///
    /// assert_eq!(Value::string("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(&b"\xff\xfe"[..]).as_str(), None);
    /// assert_eq!(Value::Integer(42).as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the list, or `WrongVariant` if this is not a list.
    pub fn as_list(&self) -> Result<&List, StateError> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(self.wrong_variant(Kind::List)),
        }
    }

    /// Returns a mutable reference to the list.
    pub fn as_list_mut(&mut self) -> Result<&mut List, StateError> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(self.wrong_variant(Kind::List)),
        }
    }

    /// Returns the dictionary, or `WrongVariant` if this is not a dictionary.
    pub fn as_dict(&self) -> Result<&Dict, StateError> {
        match self {
            Value::Dict(d) => Ok(d),
            _ => Err(self.wrong_variant(Kind::Dict)),
        }
    }

    /// Returns a mutable reference to the dictionary.
    pub fn as_dict_mut(&mut self) -> Result<&mut Dict, StateError> {
        match self {
            Value::Dict(d) => Ok(d),
            _ => Err(self.wrong_variant(Kind::Dict)),
        }
    }

    /// Consumes the value and returns the list, if it is one.
    pub fn into_list(self) -> Result<List, StateError> {
        match self {
            Value::List(l) => Ok(l),
            other => Err(other.wrong_variant(Kind::List)),
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    ///
    /// This avoids cloning the dictionary when you need ownership.
    pub fn into_dict(self) -> Result<Dict, StateError> {
        match self {
            Value::Dict(d) => Ok(d),
            other => Err(other.wrong_variant(Kind::Dict)),
        }
    }

    /// Returns the list element at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencode_io::{decode, StateError};
    ///
    /// let value = decode(b"l4:spam4:eggse").unwrap();
    /// assert_eq!(value.at(1).unwrap().as_str(), Some("eggs"));
    /// assert_eq!(value.at(2), Err(StateError::IndexOutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&Value, StateError> {
        let list = self.as_list()?;
        list.get(index).ok_or(StateError::IndexOutOfRange {
            index,
            len: list.len(),
        })
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `Ok(None)` if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencode_io::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").unwrap().and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), Ok(None));
    /// ```
    pub fn get(&self, key: &[u8]) -> Result<Option<&Value>, StateError> {
        Ok(self.as_dict()?.get(key))
    }

    /// Number of elements of a list or entries of a dictionary.
    pub fn count(&self) -> Result<usize, StateError> {
        match self {
            Value::List(l) => Ok(l.len()),
            Value::Dict(d) => Ok(d.len()),
            other => Err(StateError::NotContainer {
                found: other.kind(),
            }),
        }
    }

    /// Whether a dictionary holds `key`.
    pub fn contains(&self, key: &[u8]) -> Result<bool, StateError> {
        Ok(self.as_dict()?.contains(key))
    }

    fn wrong_variant(&self, expected: Kind) -> StateError {
        StateError::WrongVariant {
            expected,
            found: self.kind(),
        }
    }
}

/// An ordered sequence of values.
///
/// Mutators taking an `Option<Value>` treat `None` as "absent": [`List::set`]
/// removes the element, [`List::insert`] and [`List::append`] do nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` and returns the list, for building nested documents.
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.items.push(value.into());
        self
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Replaces the element at `index`, or removes it when `value` is `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencode_io::{List, Value};
    ///
    /// let mut list = List::new().with(1).with(2).with(3);
    /// list.set(0, Some(Value::Integer(10))).unwrap();
    /// list.set(1, None).unwrap();
    /// assert_eq!(list, List::new().with(10).with(3));
    /// assert!(list.set(5, None).is_err());
    /// ```
    pub fn set(&mut self, index: usize, value: Option<Value>) -> Result<(), StateError> {
        self.check_index(index, self.items.len())?;
        match value {
            Some(v) => self.items[index] = v,
            None => {
                self.items.remove(index);
            }
        }
        Ok(())
    }

    /// Inserts `value` before `index`; `None` leaves the list unchanged.
    pub fn insert(&mut self, index: usize, value: Option<Value>) -> Result<(), StateError> {
        if let Some(v) = value {
            self.check_index(index, self.items.len() + 1)?;
            self.items.insert(index, v);
        }
        Ok(())
    }

    /// Appends `value`; `None` leaves the list unchanged.
    pub fn append(&mut self, value: Option<Value>) {
        if let Some(v) = value {
            self.items.push(v);
        }
    }

    /// Appends `value` to the end of the list.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value, StateError> {
        self.check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<(), StateError> {
        if index < bound {
            Ok(())
        } else {
            Err(StateError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl From<List> for Vec<Value> {
    fn from(list: List) -> Self {
        list.items
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A mapping from byte string keys to values.
///
/// Entries are kept in ascending lexicographic byte order of the key, so
/// iteration (and therefore encoding) is always canonical. A key never maps
/// to an absent value: [`Dict::set`] with `None` removes the key.
///
/// # Examples
///
/// ```
/// use bencode_io::{Dict, Value};
///
/// let mut dict = Dict::new().with("spam", "eggs").with("cow", "moo");
/// let keys: Vec<&[u8]> = dict.keys().map(|k| k.as_ref()).collect();
/// assert_eq!(keys, vec![&b"cow"[..], &b"spam"[..]]);
///
/// dict.set("cow", None);
/// assert!(!dict.contains(b"cow"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: BTreeMap<Bytes, Value>,
}

impl Dict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry and returns the dictionary, for building nested documents.
    pub fn with(mut self, key: impl Into<Bytes>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, or removes `key` when `value` is `None`.
    /// Returns the previous value.
    pub fn set(&mut self, key: impl Into<Bytes>, value: Option<Value>) -> Option<Value> {
        let key = key.into();
        match value {
            Some(v) => self.entries.insert(key, v),
            None => self.entries.remove(&key),
        }
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &[u8]) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, Bytes, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, Bytes, Value> {
        self.entries.values()
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Bytes, Value> {
        self.entries.iter()
    }
}

impl From<BTreeMap<Bytes, Value>> for Dict {
    fn from(entries: BTreeMap<Bytes, Value>) -> Self {
        Self { entries }
    }
}

impl From<Dict> for BTreeMap<Bytes, Value> {
    fn from(dict: Dict) -> Self {
        dict.entries
    }
}

impl FromIterator<(Bytes, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Bytes, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dict {
    type Item = (Bytes, Value);
    type IntoIter = btree_map::IntoIter<Bytes, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Bytes, &'a Value);
    type IntoIter = btree_map::Iter<'a, Bytes, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Integer(i64::from(i))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(List::from(l))
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(Dict::from(d))
    }
}
