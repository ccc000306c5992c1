//! Indented, human-readable rendering of value trees.

use bytes::Bytes;
use std::fmt::{self, Write};

use crate::position::{NodeId, PositionTable};
use crate::value::{Dict, List, Value};
use crate::visit::Visitor;

/// Renders a value as an indented tree, one node per line.
///
/// Byte strings are shown as `<N bytes>` unless [`Printer::dump_strings`] is
/// set, in which case their content is printed with non-printable bytes
/// escaped. Given a [`PositionTable`] and the value's [`NodeId`], each node is
/// annotated with the byte range it occupied.
///
/// # Examples
///
/// ```
/// use bencode_io::{Decoder, Printer, SliceSource};
///
/// let mut decoder = Decoder::new(SliceSource::new(&b"d3:cow3:moo4:spaml1:a1:bee"[..]));
/// let doc = decoder.read().unwrap().unwrap();
///
/// let text = Printer::new()
///     .dump_strings(true)
///     .with_positions(decoder.positions())
///     .render(&doc.value, Some(doc.id));
///
/// assert_eq!(
///     text,
///     "{  @[0, 26)\n  \"cow\": \"moo\"  @[6, 11)\n  \"spam\": [  @[17, 25)\n    \"a\"  @[18, 21)\n    \"b\"  @[21, 24)\n  ]\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Printer<'a> {
    prefix: String,
    indent: String,
    dump_strings: bool,
    positions: Option<&'a PositionTable>,
}

impl Default for Printer<'_> {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            indent: "  ".to_string(),
            dump_strings: false,
            positions: None,
        }
    }
}

impl<'a> Printer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text written at the start of every line.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Text repeated once per nesting level.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn dump_strings(mut self, dump: bool) -> Self {
        self.dump_strings = dump;
        self
    }

    pub fn with_positions(mut self, positions: &'a PositionTable) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Renders `value` to a string. `id` is its handle in the attached
    /// position table, if any.
    pub fn render(&self, value: &Value, id: Option<NodeId>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, value, id);
        out
    }

    pub fn write_to<W: Write + ?Sized>(
        &self,
        out: &mut W,
        value: &Value,
        id: Option<NodeId>,
    ) -> fmt::Result {
        let mut render = Render {
            printer: self,
            out,
            depth: 0,
            node: id,
            key: None,
        };
        value.accept(&mut render)
    }
}

struct Render<'p, 'a, W: ?Sized> {
    printer: &'p Printer<'a>,
    out: &'p mut W,
    depth: usize,
    node: Option<NodeId>,
    key: Option<Bytes>,
}

impl<W: Write + ?Sized> Render<'_, '_, W> {
    fn begin_line(&mut self) -> fmt::Result {
        self.out.write_str(&self.printer.prefix)?;
        for _ in 0..self.depth {
            self.out.write_str(&self.printer.indent)?;
        }
        if let Some(key) = self.key.take() {
            write!(self.out, "\"{}\": ", key.escape_ascii())?;
        }
        Ok(())
    }

    fn end_line(&mut self, node: Option<NodeId>) -> fmt::Result {
        let range = node.zip(self.printer.positions).and_then(|(id, t)| t.range(id));
        if let Some(range) = range {
            write!(self.out, "  @{}", range)?;
        }
        self.out.write_char('\n')
    }

    fn close(&mut self, bracket: char) -> fmt::Result {
        self.begin_line()?;
        self.out.write_char(bracket)?;
        self.out.write_char('\n')
    }
}

impl<W: Write + ?Sized> Visitor for Render<'_, '_, W> {
    type Error = fmt::Error;

    fn visit_integer(&mut self, value: i64) -> fmt::Result {
        self.begin_line()?;
        write!(self.out, "{}", value)?;
        self.end_line(self.node)
    }

    fn visit_bytes(&mut self, value: &Bytes) -> fmt::Result {
        self.begin_line()?;
        if self.printer.dump_strings {
            write!(self.out, "\"{}\"", value.escape_ascii())?;
        } else {
            write!(self.out, "<{} bytes>", value.len())?;
        }
        self.end_line(self.node)
    }

    fn visit_list(&mut self, list: &List) -> fmt::Result {
        let node = self.node;
        self.begin_line()?;
        if list.is_empty() {
            self.out.write_str("[]")?;
            return self.end_line(node);
        }
        self.out.write_char('[')?;
        self.end_line(node)?;

        let table = self.printer.positions;
        self.depth += 1;
        for (i, item) in list.iter().enumerate() {
            self.node = node.zip(table).and_then(|(id, t)| t.child(id, i));
            item.accept(self)?;
        }
        self.depth -= 1;
        self.close(']')
    }

    fn visit_dict(&mut self, dict: &Dict) -> fmt::Result {
        let node = self.node;
        self.begin_line()?;
        if dict.is_empty() {
            self.out.write_str("{}")?;
            return self.end_line(node);
        }
        self.out.write_char('{')?;
        self.end_line(node)?;

        let table = self.printer.positions;
        self.depth += 1;
        for (key, value) in dict {
            self.node = node.zip(table).and_then(|(id, t)| t.value_of(id, key));
            self.key = Some(key.clone());
            value.accept(self)?;
        }
        self.depth -= 1;
        self.close('}')
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new().write_to(f, self, None)
    }
}
