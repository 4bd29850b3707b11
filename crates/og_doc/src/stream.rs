use alloc::string::String;

use crate::error::DocError;

// -----------------------------------------------------------------------------
// NodeWriter

/// Streaming output of a document.
///
/// Calls must nest: every [`open_node`](Self::open_node) is matched by
/// one [`close_node`](Self::close_node). Attributes are written before
/// any text or child of their node.
pub trait NodeWriter {
    fn open_node(&mut self, name: &str) -> Result<(), DocError>;

    fn write_attribute(&mut self, key: &str, value: &str) -> Result<(), DocError>;

    fn write_text(&mut self, text: &str) -> Result<(), DocError>;

    fn close_node(&mut self) -> Result<(), DocError>;
}

impl<W: NodeWriter + ?Sized> NodeWriter for &mut W {
    #[inline]
    fn open_node(&mut self, name: &str) -> Result<(), DocError> {
        (**self).open_node(name)
    }

    #[inline]
    fn write_attribute(&mut self, key: &str, value: &str) -> Result<(), DocError> {
        (**self).write_attribute(key, value)
    }

    #[inline]
    fn write_text(&mut self, text: &str) -> Result<(), DocError> {
        (**self).write_text(text)
    }

    #[inline]
    fn close_node(&mut self) -> Result<(), DocError> {
        (**self).close_node()
    }
}

// -----------------------------------------------------------------------------
// NodeReader

/// Streaming input of a document, as a cursor.
///
/// The cursor starts above the root. [`next_node`](Self::next_node)
/// steps into the next child of the current node (the root, the first
/// time) and returns its name, or `None` once the children are
/// exhausted. [`leave_node`](Self::leave_node) returns to the parent,
/// skipping whatever children were not read.
pub trait NodeReader {
    fn next_node(&mut self) -> Result<Option<String>, DocError>;

    /// Returns attribute `key` of the current node.
    fn attribute(&self, key: &str) -> Option<&str>;

    /// Returns the text of the current node.
    fn text(&self) -> Option<&str>;

    fn leave_node(&mut self) -> Result<(), DocError>;
}

impl<R: NodeReader + ?Sized> NodeReader for &mut R {
    #[inline]
    fn next_node(&mut self) -> Result<Option<String>, DocError> {
        (**self).next_node()
    }

    #[inline]
    fn attribute(&self, key: &str) -> Option<&str> {
        (**self).attribute(key)
    }

    #[inline]
    fn text(&self) -> Option<&str> {
        (**self).text()
    }

    #[inline]
    fn leave_node(&mut self) -> Result<(), DocError> {
        (**self).leave_node()
    }
}
