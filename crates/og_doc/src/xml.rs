//! XML text binding, built on `quick-xml`.
//!
//! Documents are written with two-space indentation. Nodes without text
//! and children are written self-closing:
//!
//! ```
//! use og_doc::Node;
//! use og_doc::xml::{parse_xml, to_xml};
//!
//! let farm = Node::new("farm")
//!     .with_child(Node::new("size").with_text("100"))
//!     .with_child(Node::null());
//!
//! let text = to_xml(&farm).unwrap();
//! assert_eq!(text, "<farm>\n  <size>100</size>\n  <null/>\n</farm>");
//! assert_eq!(parse_xml(&text).unwrap(), farm);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::DocError;
use crate::node::Node;
use crate::stream::NodeWriter;

fn xml_error(e: impl ToString) -> DocError {
    DocError::Xml(e.to_string())
}

// -----------------------------------------------------------------------------
// XmlWriter

/// A [`NodeWriter`] that streams indented XML into `W`.
///
/// The start tag of a node is held back until its first text or child
/// arrives, so that nodes without content can be written self-closing.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a writer with two-space indentation.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Returns the inner sink. Fails if nodes are still open.
    pub fn into_inner(self) -> Result<W, DocError> {
        if !self.open.is_empty() {
            return Err(DocError::Unclosed(self.open.len()));
        }
        Ok(self.writer.into_inner())
    }

    fn flush_pending(&mut self) -> Result<(), DocError> {
        if let Some(start) = self.pending.take() {
            self.writer
                .write_event(Event::Start(start))
                .map_err(xml_error)?;
        }
        Ok(())
    }
}

impl<W: Write> NodeWriter for XmlWriter<W> {
    fn open_node(&mut self, name: &str) -> Result<(), DocError> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(String::from(name)));
        self.open.push(String::from(name));
        Ok(())
    }

    fn write_attribute(&mut self, key: &str, value: &str) -> Result<(), DocError> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((key, value));
                Ok(())
            }
            None if self.open.is_empty() => Err(DocError::NoOpenNode),
            None => Err(DocError::AttributeAfterContent(String::from(key))),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<(), DocError> {
        if self.open.is_empty() {
            return Err(DocError::NoOpenNode);
        }
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    fn close_node(&mut self) -> Result<(), DocError> {
        let name = self.open.pop().ok_or(DocError::NoOpenNode)?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start)),
            None => self.writer.write_event(Event::End(BytesEnd::new(name))),
        }
        .map_err(xml_error)
    }
}

// -----------------------------------------------------------------------------
// Functions

/// Streams `node` into `writer`.
pub fn write_node<W: NodeWriter + ?Sized>(node: &Node, writer: &mut W) -> Result<(), DocError> {
    writer.open_node(node.name())?;
    for (key, value) in node.attributes() {
        writer.write_attribute(key, value)?;
    }
    if let Some(text) = node.text() {
        writer.write_text(text)?;
    }
    for child in node.children() {
        write_node(child, writer)?;
    }
    writer.close_node()
}

/// Renders `node` as indented XML text.
pub fn to_xml(node: &Node) -> Result<String, DocError> {
    let mut writer = XmlWriter::new(Vec::new());
    write_node(node, &mut writer)?;
    let bytes = writer.into_inner()?;
    String::from_utf8(bytes).map_err(xml_error)
}

fn start_node(start: &BytesStart<'_>) -> Result<Node, DocError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = Node::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?;
        node.set_attribute(key, value.into_owned());
    }
    Ok(node)
}

fn attach(stack: &mut [Open], root: &mut Option<Node>, node: Node) -> Result<(), DocError> {
    match stack.last_mut() {
        Some(parent) => parent.node.push_child(node),
        None if root.is_some() => return Err(DocError::MultipleRoots(String::from(node.name()))),
        None => *root = Some(node),
    }
    Ok(())
}

/// An element being parsed, with the raw text read inside it so far.
struct Open {
    node: Node,
    text: String,
}

impl Open {
    fn new(node: Node) -> Self {
        Self {
            node,
            text: String::new(),
        }
    }

    /// Text of a leaf element is kept as written. Around children it is
    /// indentation unless something other than whitespace is left.
    fn finish(mut self) -> Node {
        let text = if self.node.children().is_empty() {
            self.text.as_str()
        } else {
            self.text.trim()
        };
        if !text.is_empty() {
            self.node.push_text(text);
        }
        self.node
    }
}

/// Parses XML text into a [`Node`] tree.
///
/// Leaf text keeps its whitespace. Whitespace between tags is dropped.
/// Declarations, comments and processing instructions are ignored.
pub fn parse_xml(text: &str) -> Result<Node, DocError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Open> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Open::new(start_node(&start)?)),
            Event::Empty(start) => {
                let node = start_node(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(DocError::NoOpenNode)?.finish();
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                // Whitespace outside the root is not content.
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                stack.last_mut().ok_or(DocError::NoOpenNode)?.text.push_str(&text);
            }
            Event::Eof => break,
            other => log::trace!("skipping xml event {other:?}"),
        }
    }

    if !stack.is_empty() {
        return Err(DocError::Unclosed(stack.len()));
    }
    root.ok_or(DocError::Empty)
}

// -----------------------------------------------------------------------------
// Tests
