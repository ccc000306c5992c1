//! Per-variant dispatch over a [`Value`].

use bytes::Bytes;

use crate::value::{Dict, List, Value};

/// A consumer acting on each kind of value.
///
/// [`Value::accept`] matches on the variant and calls the corresponding
/// method; implementors recurse into lists and dictionaries themselves by
/// calling `accept` on the children.
///
/// # Examples
///
/// ```
/// use bencode_io::{decode, Dict, List, Visitor};
/// use bytes::Bytes;
///
/// struct Sum(i64);
///
/// impl Visitor for Sum {
///     type Error = std::convert::Infallible;
///
///     fn visit_integer(&mut self, value: i64) -> Result<(), Self::Error> {
///         self.0 += value;
///         Ok(())
///     }
///     fn visit_bytes(&mut self, _: &Bytes) -> Result<(), Self::Error> {
///         Ok(())
///     }
///     fn visit_list(&mut self, list: &List) -> Result<(), Self::Error> {
///         list.iter().try_for_each(|v| v.accept(self))
///     }
///     fn visit_dict(&mut self, dict: &Dict) -> Result<(), Self::Error> {
///         dict.values().try_for_each(|v| v.accept(self))
///     }
/// }
///
/// let mut sum = Sum(0);
/// decode(b"d1:ai1e1:bli2ei3eee").unwrap().accept(&mut sum).unwrap();
/// assert_eq!(sum.0, 6);
/// ```
pub trait Visitor {
    type Error;

    fn visit_integer(&mut self, value: i64) -> Result<(), Self::Error>;
    fn visit_bytes(&mut self, value: &Bytes) -> Result<(), Self::Error>;
    fn visit_list(&mut self, list: &List) -> Result<(), Self::Error>;
    fn visit_dict(&mut self, dict: &Dict) -> Result<(), Self::Error>;
}

impl Value {
    /// Dispatches to the `visitor` method matching this value's kind.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Value::Integer(i) => visitor.visit_integer(*i),
            Value::Bytes(b) => visitor.visit_bytes(b),
            Value::List(l) => visitor.visit_list(l),
            Value::Dict(d) => visitor.visit_dict(d),
        }
    }
}
